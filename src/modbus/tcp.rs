use std::io::{ErrorKind, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use bytes::BytesMut;
use log::{debug, info, warn};
use tokio_util::codec::{Decoder, Encoder};

use super::codec::{MbapCodec, ReadHoldingRegisters, Response, READ_HOLDING_REGISTERS};
use super::{ModbusError, MAX_READ_COUNT};
use crate::sunspec::transport::RegisterTransport;

const READ_CHUNK: usize = 512;

/// Blocking Modbus/TCP client that only knows how to read holding registers.
///
/// Each request waits for its reply before returning; no retries are made.
pub struct ModbusTcp {
    stream: TcpStream,
    codec: MbapCodec,
    read_buf: BytesMut,
    unit_id: u8,
    transaction_id: u16,
    timeout: Duration,
}

impl ModbusTcp {
    pub fn connect(host: &str, port: u16, unit_id: u8, timeout: Duration) -> Result<Self, ModbusError> {
        info!("connecting to {}:{} (unit {})", host, port, unit_id);

        let mut last_err = None;
        for addr in (host, port).to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => return Self::from_stream(stream, unit_id, timeout),
                Err(err) => {
                    warn!("connection to {} failed: {}", addr, err);
                    last_err = Some(err);
                }
            }
        }

        Err(match last_err {
            Some(err) => err.into(),
            None => std::io::Error::new(
                ErrorKind::NotFound,
                format!("{} did not resolve to any address", host),
            )
            .into(),
        })
    }

    pub fn from_stream(stream: TcpStream, unit_id: u8, timeout: Duration) -> Result<Self, ModbusError> {
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;
        if let Err(err) = stream.set_nodelay(true) {
            warn!("failed to set TCP_NODELAY: {}", err);
        }

        if let Ok(peer) = stream.peer_addr() {
            info!("connected to {}", peer);
        }

        Ok(Self {
            stream,
            codec: MbapCodec,
            read_buf: BytesMut::with_capacity(READ_CHUNK),
            unit_id,
            transaction_id: 0,
            timeout,
        })
    }

    pub fn unit_id(&self) -> u8 {
        self.unit_id
    }

    pub fn read_holding_registers(&mut self, address: u16, count: u16) -> Result<Vec<u16>, ModbusError> {
        if count == 0 || count > MAX_READ_COUNT {
            return Err(ModbusError::InvalidCount(count));
        }

        self.transaction_id = self.transaction_id.wrapping_add(1);
        let request = ReadHoldingRegisters {
            transaction_id: self.transaction_id,
            unit_id: self.unit_id,
            address,
            count,
        };
        debug!("TX {:?}", request);

        let mut frame = BytesMut::new();
        self.codec.encode(request, &mut frame)?;
        self.stream.write_all(&frame).map_err(|err| self.io_error(err))?;

        let response = self.receive(request.transaction_id)?;
        debug!("RX {:?}", response);

        let header = response.header();
        if header.unit_id != self.unit_id {
            return Err(ModbusError::MalformedFrame(format!(
                "reply from unit {}, expected {}",
                header.unit_id, self.unit_id
            )));
        }

        match response {
            Response::Exception { function, code, .. } => Err(ModbusError::Exception { function, code }),
            Response::Registers { function, .. } if function != READ_HOLDING_REGISTERS => {
                Err(ModbusError::UnexpectedFunction(function))
            }
            Response::Registers { words, .. } if words.len() != usize::from(count) => {
                Err(ModbusError::MalformedFrame(format!(
                    "asked for {} registers, got {}",
                    count,
                    words.len()
                )))
            }
            Response::Registers { words, .. } => Ok(words),
        }
    }

    /// Waits for the reply to `transaction_id`. Replies to earlier requests
    /// that timed out are dropped; the whole wait is bounded by the timeout.
    fn receive(&mut self, transaction_id: u16) -> Result<Response, ModbusError> {
        let deadline = Instant::now() + self.timeout;
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            match self.codec.decode(&mut self.read_buf) {
                Ok(Some(response)) if response.header().transaction_id == transaction_id => {
                    return Ok(response);
                }
                Ok(Some(stale)) => {
                    debug!(
                        "dropping reply to transaction {} while waiting for {}",
                        stale.header().transaction_id,
                        transaction_id
                    );
                    continue;
                }
                Ok(None) => {}
                Err(err) => {
                    // framing is lost; start afresh with the next request
                    self.read_buf.clear();
                    return Err(err);
                }
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(ModbusError::Timeout(self.timeout));
            }
            self.stream.set_read_timeout(Some(remaining))?;

            let n = match self.stream.read(&mut chunk) {
                Ok(0) => return Err(ModbusError::ConnectionClosed),
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(self.io_error(err)),
            };
            self.read_buf.extend_from_slice(&chunk[..n]);
        }
    }

    fn io_error(&self, err: std::io::Error) -> ModbusError {
        match err.kind() {
            ErrorKind::WouldBlock | ErrorKind::TimedOut => ModbusError::Timeout(self.timeout),
            _ => ModbusError::Io(err),
        }
    }
}

impl RegisterTransport for ModbusTcp {
    type Error = ModbusError;

    /// Counts above [`MAX_READ_COUNT`] are split over several requests.
    fn read(&mut self, address: u32, count: u16) -> Result<Vec<u16>, Self::Error> {
        address
            .checked_add(u32::from(count.saturating_sub(1)))
            .filter(|&last| last <= u32::from(u16::MAX))
            .ok_or(ModbusError::AddressOutOfRange(address))?;

        let mut words = Vec::with_capacity(usize::from(count));
        let mut next = address;
        let mut left = count;
        while left > 0 {
            let chunk = left.min(MAX_READ_COUNT);
            // bounds checked above
            words.extend(self.read_holding_registers(next as u16, chunk)?);
            next += u32::from(chunk);
            left -= chunk;
        }

        Ok(words)
    }
}
