//! Logging macro which forwards to [`defmt`] when the `defmt` feature is enabled and compiles to nothing
//! otherwise, so the library builds and tests on the host.

#[cfg(feature = "defmt")]
macro_rules! info {
    ($($arg:tt)*) => { ::defmt::info!($($arg)*) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! info {
    ($($arg:tt)*) => {};
}
