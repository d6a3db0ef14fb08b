//! The one decision taken before the scan loop starts: which USB interfaces the device exposes.

/// The set of USB interfaces presented to the host, fixed for as long as the device stays powered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsbPersonality {
    /// USB-MIDI for performing plus a serial console echoing every event.
    SerialMidi,
    /// A mass-storage drive for loading new firmware.
    MassStorage,
}

impl UsbPersonality {
    /// Chooses the personality from the boot pin, sampled once at power-up. The drive is exposed unless the
    /// control is held down, in which case the device comes up as [`UsbPersonality::SerialMidi`].
    pub fn from_boot_pin(pressed: bool) -> Self {
        if pressed {
            Self::SerialMidi
        } else {
            Self::MassStorage
        }
    }
}
