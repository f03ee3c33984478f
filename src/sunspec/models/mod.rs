//! Header and body parsers, one per SunSpec block family.
//!
//! A refresh reads `HEADER_SIZE` words and hands them to [`Model::parse_header`],
//! then reads exactly the body length the header declared and hands those to
//! [`Model::parse_body`]. Bodies may be longer than the fields a parser knows
//! about; the remainder is left unread.

pub mod common;
pub mod inverter;
pub mod meter_common;
pub mod meter_data;

pub use common::CommonModel;
pub use inverter::InverterModel;
pub use meter_common::MeterCommonModel;
pub use meter_data::MeterDataModel;

use crate::error::Result;
use crate::sunspec::buffer::RegisterBuffer;
use crate::sunspec::registry::ModelFamily;

/// Discriminator and declared body length read from a block header.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Header<Id> {
    pub id: Id,
    pub length: u16,
}

pub trait Model: Sized {
    /// Whatever the header identifies the block as; carried into the record.
    type Id: Copy + std::fmt::Debug;

    const FAMILY: ModelFamily;
    const HEADER_SIZE: u16;

    fn parse_header(buffer: &mut RegisterBuffer) -> Result<Header<Self::Id>>;

    fn parse_body(header: Header<Self::Id>, buffer: &mut RegisterBuffer) -> Result<Self>;
}
