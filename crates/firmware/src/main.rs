//! REKOPI is [Embassy](https://embassy.dev)-based firmware for an eight-key USB-MIDI controller built around the
//! [Raspberry Pi Pico](https://www.raspberrypi.com/documentation/microcontrollers/pico-series.html).
//!
//! The panel has eight keys, a mode button, seven knobs behind a CD4051-style multiplexer and two knobs wired
//! straight to the ADC. Two seven-segment digits and eight LEDs, each on its own 74HC595 chain, show the active mode.
//! Everything the panel decides lives in `rekopi_lib`; this crate only wires the pins, runs the USB stack and
//! shuttles events to the host.
//!
//! Plugged in normally, the device reboots into the RP2040's USB mass-storage bootloader so new firmware can be
//! dropped onto it. Holding the key on GP15 while plugging in skips the drive and brings the device up as USB-MIDI
//! plus a serial console.

#![no_std]
#![no_main]

mod console;
mod knobs;
mod transport;

use crate::{knobs::Knobs, transport::EventQueue};
use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::{
    Peri, adc, bind_interrupts,
    gpio::{Input, Level, Output, Pin, Pull},
    peripherals::USB,
    usb,
};
use embassy_time::Delay;
use embassy_usb::{
    Builder,
    class::{
        cdc_acm::{CdcAcmClass, State},
        midi::MidiClass,
    },
};
use rekopi_lib::{
    boot::UsbPersonality,
    controller::{Controller, Panel},
    shifter::OutputShifter,
};
use static_cell::StaticCell;

#[cfg(feature = "defmt-rtt")]
use defmt_rtt as _;
#[cfg(not(feature = "panic-probe"))]
use panic_halt as _;
#[cfg(feature = "panic-probe")]
use panic_probe as _;

bind_interrupts!(
    #[doc(hidden)]
    struct Irqs {
        USBCTRL_IRQ => usb::InterruptHandler<USB>;
    }
);

type UsbDriver = usb::Driver<'static, USB>;

/// Builds a shift register chain from its latch, clock and data pins.
fn chain(
    latch: Peri<'static, impl Pin>,
    clock: Peri<'static, impl Pin>,
    data: Peri<'static, impl Pin>,
) -> OutputShifter<Output<'static>> {
    OutputShifter::new(
        Output::new(latch, Level::Low),
        Output::new(clock, Level::Low),
        Output::new(data, Level::Low),
    )
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Initializing REKOPI");
    let p = embassy_rp::init(Default::default());

    // GP15 is sampled once as the boot pin, then becomes multiplexer select line S0
    let mut gp15 = p.PIN_15;
    let personality = {
        let boot_pin = Input::new(gp15.reborrow(), Pull::Up);
        UsbPersonality::from_boot_pin(boot_pin.is_low())
    };
    info!("USB personality: {}", personality);
    if personality == UsbPersonality::MassStorage {
        embassy_rp::rom_data::reset_to_usb_boot(0, 0);
        loop {
            cortex_m::asm::wfi();
        }
    }

    let driver = usb::Driver::new(p.USB, Irqs);

    // per https://pid.codes, FOSS projects can apply to be listed under the vendor ID owned by InterBiometrics;
    // 0x0001 is its shared test product ID
    let mut config = embassy_usb::Config::new(0x1209, 0x0001);
    config.manufacturer = Some("TrungTauLua");
    config.product = Some("REKOPI MIDI Controller");
    config.max_power = 100;
    // MIDI and CDC-ACM together make a composite device, which needs interface association descriptors
    config.composite_with_iads = true;
    config.device_class = 0xEF;
    config.device_sub_class = 0x02;
    config.device_protocol = 0x01;

    static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
    static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
    static CONTROL_BUFFER: StaticCell<[u8; 64]> = StaticCell::new();
    static CDC_STATE: StaticCell<State<'static>> = StaticCell::new();

    let mut builder = Builder::new(
        driver,
        config,
        CONFIG_DESCRIPTOR.init([0; 256]),
        BOS_DESCRIPTOR.init([0; 256]),
        &mut [], // no msos descriptors
        CONTROL_BUFFER.init([0; 64]),
    );

    let midi = MidiClass::new(&mut builder, 1, 1, 64);
    let serial = CdcAcmClass::new(&mut builder, CDC_STATE.init(State::new()), 64);
    let usb = builder.build();

    unwrap!(spawner.spawn(transport::usb_task(usb)));
    unwrap!(spawner.spawn(transport::midi_task(midi)));
    unwrap!(spawner.spawn(console::console_task(serial)));

    let panel = Panel {
        keys: [
            Input::new(p.PIN_0, Pull::Up),
            Input::new(p.PIN_1, Pull::Up),
            Input::new(p.PIN_2, Pull::Up),
            Input::new(p.PIN_3, Pull::Up),
            Input::new(p.PIN_4, Pull::Up),
            Input::new(p.PIN_5, Pull::Up),
            Input::new(p.PIN_6, Pull::Up),
            Input::new(p.PIN_7, Pull::Up),
        ],
        mode_button: Input::new(p.PIN_8, Pull::Up),
        selector: [
            Output::new(gp15, Level::Low),
            Output::new(p.PIN_14, Level::Low),
            Output::new(p.PIN_13, Level::Low),
        ],
        left_digit: chain(p.PIN_9, p.PIN_10, p.PIN_11),
        right_digit: chain(p.PIN_16, p.PIN_17, p.PIN_18),
        leds: chain(p.PIN_19, p.PIN_20, p.PIN_21),
    };

    let mut knobs = Knobs::new(
        adc::Adc::new_blocking(p.ADC, adc::Config::default()),
        adc::Channel::new_pin(p.PIN_26, Pull::None),
        [
            adc::Channel::new_pin(p.PIN_27, Pull::None),
            adc::Channel::new_pin(p.PIN_28, Pull::None),
        ],
    );

    let mut controller = Controller::new(panel);
    let mut delay = Delay;
    controller.greet(&mut delay).await;

    info!("Scanning");
    controller.run(&mut knobs, &mut delay, &mut EventQueue).await
}
