/// Source of holding-register words, e.g. a Modbus client.
///
/// Connection handling, timeouts and retries all live behind this trait; the
/// decoder only ever asks for `count` words starting at `address`.
pub trait RegisterTransport {
    type Error: std::error::Error + Send + Sync + 'static;

    fn read(&mut self, address: u32, count: u16) -> Result<Vec<u16>, Self::Error>;
}

impl<T: RegisterTransport + ?Sized> RegisterTransport for &mut T {
    type Error = T::Error;

    fn read(&mut self, address: u32, count: u16) -> Result<Vec<u16>, Self::Error> {
        (**self).read(address, count)
    }
}
