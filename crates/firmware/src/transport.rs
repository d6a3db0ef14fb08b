//! Carries events from the scan loop to the host over USB-MIDI.
//!
//! The scan loop never waits on USB: events go into a bounded queue and a separate task turns them into USB-MIDI
//! Event Packets. When the queue is full the event is dropped.

use crate::UsbDriver;
use defmt::{info, panic, warn};
use embassy_futures::select::select;
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};
use embassy_usb::{UsbDevice, class::midi::MidiClass, driver::EndpointError};
use rekopi_lib::{
    configuration::MIDI_CHANNEL,
    midi::{Event, MidiSink},
};

const MIDI_QUEUE_DEPTH: usize = 32;
const CONSOLE_QUEUE_DEPTH: usize = 8;

type EventChannel<const N: usize> = Channel<CriticalSectionRawMutex, Event, N>;

/// Events waiting to be written to the MIDI endpoint.
static MIDI_EVENTS: EventChannel<MIDI_QUEUE_DEPTH> = Channel::new();

/// Events waiting to be echoed on the serial console.
pub static CONSOLE_EVENTS: EventChannel<CONSOLE_QUEUE_DEPTH> = Channel::new();

/// The scan loop's [`MidiSink`].
pub struct EventQueue;

impl MidiSink for EventQueue {
    fn send(&mut self, event: Event) {
        if MIDI_EVENTS.try_send(event).is_err() {
            warn!("MIDI queue full, dropped {}", event);
        }
        // the console is a courtesy; losing lines there is fine
        let _ = CONSOLE_EVENTS.try_send(event);
    }
}

#[doc(hidden)]
pub struct Disconnected {}

impl From<EndpointError> for Disconnected {
    fn from(val: EndpointError) -> Self {
        match val {
            EndpointError::BufferOverflow => panic!("Buffer overflow"),
            EndpointError::Disabled => Disconnected {},
        }
    }
}

/// Empties `channel` forever, for when no host is listening.
pub async fn discard<const N: usize>(channel: &EventChannel<N>) -> ! {
    loop {
        channel.receive().await;
    }
}

#[embassy_executor::task]
pub async fn usb_task(mut usb: UsbDevice<'static, UsbDriver>) -> ! {
    usb.run().await
}

#[embassy_executor::task]
pub async fn midi_task(mut class: MidiClass<'static, UsbDriver>) -> ! {
    loop {
        // events produced while unplugged are stale by the time a host shows up
        select(class.wait_connection(), discard(&MIDI_EVENTS)).await;
        info!("USB MIDI connected");
        let _ = forward_events(&mut class).await;
        info!("USB MIDI disconnected");
    }
}

/// Writes queued events to the host until the endpoint goes away.
async fn forward_events(class: &mut MidiClass<'static, UsbDriver>) -> Result<(), Disconnected> {
    loop {
        let event = MIDI_EVENTS.receive().await;
        class.write_packet(&event.usb_packet(MIDI_CHANNEL)).await?;
    }
}
