//! Serial console: echoes every event the panel produces as a line of text, e.g. `CC 20 = 64`.

use crate::{
    UsbDriver,
    transport::{CONSOLE_EVENTS, Disconnected, discard},
};
use core::fmt::{self, Write};
use defmt::info;
use embassy_futures::select::select;
use embassy_usb::class::cdc_acm::CdcAcmClass;
use tinyvec::ArrayVec;

/// One line of console output; must fit a single full-speed bulk packet.
#[derive(Default)]
struct Line(ArrayVec<[u8; 64]>);

impl Write for Line {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for &byte in s.as_bytes() {
            if self.0.try_push(byte).is_some() {
                return Err(fmt::Error);
            }
        }
        Ok(())
    }
}

#[embassy_executor::task]
pub async fn console_task(mut class: CdcAcmClass<'static, UsbDriver>) -> ! {
    loop {
        select(class.wait_connection(), discard(&CONSOLE_EVENTS)).await;
        info!("Serial console connected");
        let _ = echo_events(&mut class).await;
        info!("Serial console disconnected");
    }
}

async fn echo_events(class: &mut CdcAcmClass<'static, UsbDriver>) -> Result<(), Disconnected> {
    loop {
        let event = CONSOLE_EVENTS.receive().await;
        let mut line = Line::default();
        if event.describe(&mut line).and_then(|_| line.write_str("\r\n")).is_err() {
            continue;
        }
        class.write_packet(&line.0).await?;
    }
}
