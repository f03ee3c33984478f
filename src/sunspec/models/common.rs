use serde::Serialize;

use super::{Header, Model};
use crate::error::{Error, Result};
use crate::sunspec::buffer::RegisterBuffer;
use crate::sunspec::registry::{ModelFamily, RecordCommon};

/// "SunS" packed into two big-endian words.
pub const SUNSPEC_MAGIC: u32 = 0x5375_6E53;
pub const COMMON_MODEL_ID: u16 = 1;

/// SunSpec common block (model 1): who made the device and what it is.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommonModel {
    pub manufacturer: String,
    pub model: String,
    pub version: String,
    pub serial_number: String,
    pub device_address: u16,
    pub length: u16,
}

impl Model for CommonModel {
    type Id = u16;

    const FAMILY: ModelFamily = ModelFamily::Common;
    const HEADER_SIZE: u16 = 4;

    fn parse_header(buffer: &mut RegisterBuffer) -> Result<Header<u16>> {
        let magic = buffer.uint32()?;
        if magic != SUNSPEC_MAGIC {
            return Err(Error::unknown_model(
                Self::FAMILY,
                format!("not a SunSpec register map (magic {:#010x})", magic),
            ));
        }

        let id = buffer.uint16()?;
        if id != COMMON_MODEL_ID {
            return Err(Error::unknown_model(
                Self::FAMILY,
                format!("expected common block id {}, got {}", COMMON_MODEL_ID, id),
            ));
        }

        Ok(Header {
            id,
            length: buffer.uint16()?,
        })
    }

    fn parse_body(header: Header<u16>, buffer: &mut RegisterBuffer) -> Result<Self> {
        let manufacturer = buffer.string(16)?;
        let model = buffer.string(16)?;
        buffer.skip(8)?; // options, unused by this block
        let version = buffer.string(8)?;
        let serial_number = buffer.string(16)?;
        let device_address = buffer.uint16()?;

        Ok(Self {
            manufacturer,
            model,
            version,
            serial_number,
            device_address,
            length: header.length,
        })
    }
}

impl RecordCommon for CommonModel {
    fn family(&self) -> ModelFamily {
        ModelFamily::Common
    }

    fn length(&self) -> u16 {
        self.length
    }
}
