use serde::Serialize;

use super::{Header, Model};
use crate::error::{Error, Result};
use crate::sunspec::buffer::RegisterBuffer;
use crate::sunspec::registry::{ModelFamily, RecordCommon};

pub const METER_COMMON_MODEL_ID: u16 = 1;

/// Common block of an external meter attached to the inverter.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MeterCommonModel {
    pub manufacturer: String,
    pub model: String,
    pub option: String,
    pub version: String,
    pub serial_number: String,
    pub device_address: u16,
    pub length: u16,
}

impl Model for MeterCommonModel {
    type Id = u16;

    const FAMILY: ModelFamily = ModelFamily::MeterCommon;
    const HEADER_SIZE: u16 = 2;

    fn parse_header(buffer: &mut RegisterBuffer) -> Result<Header<u16>> {
        let id = buffer.uint16()?;
        if id != METER_COMMON_MODEL_ID {
            return Err(Error::unknown_model(
                Self::FAMILY,
                format!("expected meter block id {}, got {}", METER_COMMON_MODEL_ID, id),
            ));
        }

        Ok(Header {
            id,
            length: buffer.uint16()?,
        })
    }

    fn parse_body(header: Header<u16>, buffer: &mut RegisterBuffer) -> Result<Self> {
        Ok(Self {
            manufacturer: buffer.string(16)?,
            model: buffer.string(16)?,
            option: buffer.string(8)?,
            version: buffer.string(8)?,
            serial_number: buffer.string(16)?,
            device_address: buffer.uint16()?,
            length: header.length,
        })
    }
}

impl RecordCommon for MeterCommonModel {
    fn family(&self) -> ModelFamily {
        ModelFamily::MeterCommon
    }

    fn length(&self) -> u16 {
        self.length
    }
}
