//! Blocking Modbus/TCP client used to feed the SunSpec decoder.

pub mod codec;
pub mod tcp;

pub use codec::{MbapCodec, ReadHoldingRegisters, Response};
pub use tcp::ModbusTcp;

/// Largest register count a single Read Holding Registers request may ask for.
pub const MAX_READ_COUNT: u16 = 125;

#[derive(Debug, thiserror::Error)]
pub enum ModbusError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no reply within {0:?}")]
    Timeout(std::time::Duration),

    #[error("connection closed by peer")]
    ConnectionClosed,

    #[error("device returned exception {code:#04x} for function {function:#04x}")]
    Exception { function: u8, code: u8 },

    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    #[error("unexpected function code {0:#04x}")]
    UnexpectedFunction(u8),

    #[error("address {0} is outside the 16-bit register space")]
    AddressOutOfRange(u32),

    #[error("cannot read {0} registers in one request (1..={max})", max = MAX_READ_COUNT)]
    InvalidCount(u16),
}
