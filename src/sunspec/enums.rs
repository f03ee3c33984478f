use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::Serialize;

use crate::error::{Error, Result};

// {{{ InverterDeviceType
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, IntoPrimitive, TryFromPrimitive)]
#[repr(u16)]
pub enum InverterDeviceType {
    SinglePhase = 101,
    SplitPhase = 102,
    ThreePhase = 103,
}
// }}}

// {{{ MeterDeviceType
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, IntoPrimitive, TryFromPrimitive)]
#[repr(u16)]
pub enum MeterDeviceType {
    SinglePhase = 201,
    SplitPhase = 202,
    WyeThreePhase = 203,
    DeltaThreePhase = 204,
}
// }}}

// {{{ InverterStatus
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, IntoPrimitive, TryFromPrimitive)]
#[repr(u16)]
pub enum InverterStatus {
    Unknown = 0,
    Off = 1,
    Sleeping = 2,
    Starting = 3,
    Mppt = 4,
    Throttled = 5,
    ShuttingDown = 6,
    Fault = 7,
    Standby = 8,
}
// }}}

/// Maps a raw discriminator word onto `T`, failing with
/// [`Error::UnknownEnumValue`] for values `T` does not define.
pub fn decode<T>(value: u16) -> Result<T>
where
    T: TryFromPrimitive<Primitive = u16>,
{
    T::try_from_primitive(value).map_err(|_| Error::UnknownEnumValue {
        kind: T::NAME,
        value,
    })
}
