//! Bus interface abstraction for the ADS1220 driver.

pub mod spi;

/// Abstraction over the low-level bus access required by the driver.
///
/// The ADS1220 protocol only needs a full-duplex exchange: every command,
/// register access and data read is a single frame clocked out while the
/// response is clocked in.
pub trait Ads1220Interface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Exchanges `buf` with the device in place.
    ///
    /// On return `buf` holds the bytes received while the original contents
    /// were sent; the length is unchanged.
    fn transfer(&mut self, buf: &mut [u8]) -> core::result::Result<(), Self::Error>;
}

impl<T> Ads1220Interface for &mut T
where
    T: Ads1220Interface + ?Sized,
{
    type Error = T::Error;

    fn transfer(&mut self, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        T::transfer(self, buf)
    }
}
