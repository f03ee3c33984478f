//! MBAP framing for Read Holding Registers (function 0x03).

use bytes::{BufMut, BytesMut};
use nom::multi::count;
use nom::number::complete::{be_u16, be_u8};
use nom::IResult;
use nom_derive::{Nom, Parse};
use tokio_util::codec::{Decoder, Encoder};

use super::ModbusError;

pub const READ_HOLDING_REGISTERS: u8 = 0x03;

/// transaction id, protocol id, length, unit id
const MBAP_HEADER_LEN: usize = 7;
const MAX_ADU_LEN: usize = 260;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Nom)]
#[nom(BigEndian)]
pub struct MbapHeader {
    pub transaction_id: u16,
    pub protocol_id: u16,
    /// Bytes following this field, unit id included.
    pub length: u16,
    pub unit_id: u8,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReadHoldingRegisters {
    pub transaction_id: u16,
    pub unit_id: u8,
    pub address: u16,
    pub count: u16,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Response {
    Registers {
        header: MbapHeader,
        function: u8,
        words: Vec<u16>,
    },
    Exception {
        header: MbapHeader,
        function: u8,
        code: u8,
    },
}

impl Response {
    pub fn header(&self) -> &MbapHeader {
        match self {
            Self::Registers { header, .. } | Self::Exception { header, .. } => header,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MbapCodec;

impl Encoder<ReadHoldingRegisters> for MbapCodec {
    type Error = ModbusError;

    fn encode(&mut self, request: ReadHoldingRegisters, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(MBAP_HEADER_LEN + 5);
        dst.put_u16(request.transaction_id);
        dst.put_u16(0);
        dst.put_u16(6); // unit id, function, address, count
        dst.put_u8(request.unit_id);
        dst.put_u8(READ_HOLDING_REGISTERS);
        dst.put_u16(request.address);
        dst.put_u16(request.count);

        Ok(())
    }
}

impl Decoder for MbapCodec {
    type Item = Response;
    type Error = ModbusError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < MBAP_HEADER_LEN {
            return Ok(None);
        }

        let (_, header) = MbapHeader::parse(&src[..MBAP_HEADER_LEN]).map_err(malformed)?;
        if header.protocol_id != 0 {
            return Err(ModbusError::MalformedFrame(format!(
                "protocol id {} is not Modbus",
                header.protocol_id
            )));
        }

        // the length field counts the unit id, so anything shorter than
        // unit id + function code cannot be a reply
        let frame_len = 6 + usize::from(header.length);
        if header.length < 2 || frame_len > MAX_ADU_LEN {
            return Err(ModbusError::MalformedFrame(format!(
                "length field {} out of range",
                header.length
            )));
        }

        if src.len() < frame_len {
            src.reserve(frame_len - src.len());
            return Ok(None);
        }

        let frame = src.split_to(frame_len);
        let (rest, response) = parse_pdu(header, &frame[MBAP_HEADER_LEN..]).map_err(malformed)?;
        if !rest.is_empty() {
            return Err(ModbusError::MalformedFrame(format!(
                "{} bytes left after pdu",
                rest.len()
            )));
        }

        Ok(Some(response))
    }
}

fn parse_pdu(header: MbapHeader, input: &[u8]) -> IResult<&[u8], Response> {
    let (input, function) = be_u8(input)?;
    if function & 0x80 != 0 {
        let (input, code) = be_u8(input)?;
        return Ok((
            input,
            Response::Exception {
                header,
                function: function & 0x7F,
                code,
            },
        ));
    }

    let (input, byte_count) = be_u8(input)?;
    if byte_count % 2 != 0 {
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }
    let (input, words) = count(be_u16, usize::from(byte_count / 2))(input)?;

    Ok((
        input,
        Response::Registers {
            header,
            function,
            words,
        },
    ))
}

fn malformed(err: nom::Err<nom::error::Error<&[u8]>>) -> ModbusError {
    ModbusError::MalformedFrame(format!("{:?}", err))
}
