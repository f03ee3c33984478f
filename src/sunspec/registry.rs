use enum_dispatch::enum_dispatch;
use log::debug;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sunspec::buffer::RegisterBuffer;
use crate::sunspec::models::{CommonModel, InverterModel, MeterCommonModel, MeterDataModel, Model};
use crate::sunspec::transport::RegisterTransport;

// fixed base addresses, header included
const COMMON_ADDRESS: u32 = 40_000;
const INVERTER_ADDRESS: u32 = 40_069;
const METER_COMMON_ADDRESSES: [u32; 3] = [40_121, 40_295, 40_469];
const METER_DATA_ADDRESSES: [u32; 3] = [40_188, 40_362, 40_537];

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFamily {
    Common,
    Inverter,
    MeterCommon,
    MeterData,
}

impl ModelFamily {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Inverter => "inverter",
            Self::MeterCommon => "meter_common",
            Self::MeterData => "meter_data",
        }
    }
}

// {{{ MeterInstance
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, IntoPrimitive, TryFromPrimitive,
)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum MeterInstance {
    Meter1 = 1,
    Meter2 = 2,
    Meter3 = 3,
}

impl MeterInstance {
    pub const ALL: [MeterInstance; 3] = [Self::Meter1, Self::Meter2, Self::Meter3];

    fn index(self) -> usize {
        usize::from(u8::from(self)) - 1
    }
}
// }}}

// {{{ ModelSelect
/// A block at a known location: the family plus, for meters, which of the
/// three meter slots.
///
/// Written as `common`, `inverter`, `meter_common:<1-3>` or `meter_data:<1-3>`
/// on the command line and in the config file.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ModelSelect {
    Common,
    Inverter,
    MeterCommon(MeterInstance),
    MeterData(MeterInstance),
}

impl ModelSelect {
    pub fn family(&self) -> ModelFamily {
        match self {
            Self::Common => ModelFamily::Common,
            Self::Inverter => ModelFamily::Inverter,
            Self::MeterCommon(_) => ModelFamily::MeterCommon,
            Self::MeterData(_) => ModelFamily::MeterData,
        }
    }

    pub fn instance(&self) -> Option<MeterInstance> {
        match self {
            Self::Common | Self::Inverter => None,
            Self::MeterCommon(meter) | Self::MeterData(meter) => Some(*meter),
        }
    }

    pub fn base_address(&self) -> u32 {
        match self {
            Self::Common => COMMON_ADDRESS,
            Self::Inverter => INVERTER_ADDRESS,
            Self::MeterCommon(meter) => METER_COMMON_ADDRESSES[meter.index()],
            Self::MeterData(meter) => METER_DATA_ADDRESSES[meter.index()],
        }
    }
}

impl std::fmt::Display for ModelSelect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.instance() {
            Some(meter) => write!(f, "{}:{}", self.family().name(), u8::from(meter)),
            None => write!(f, "{}", self.family().name()),
        }
    }
}

impl std::str::FromStr for ModelSelect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let (name, instance) = match normalized.split_once(':') {
            Some((name, instance)) => (name.to_string(), Some(instance.to_string())),
            None => (normalized, None),
        };

        let meter = |instance: Option<String>| -> Result<MeterInstance, String> {
            let instance = instance.ok_or_else(|| format!("{} needs a meter number, e.g. {}:1", name, name))?;
            instance
                .parse::<u8>()
                .ok()
                .and_then(|n| MeterInstance::try_from(n).ok())
                .ok_or_else(|| format!("meter number must be 1, 2 or 3, got {}", instance))
        };

        match (name.as_str(), instance.is_some()) {
            ("common", false) => Ok(Self::Common),
            ("inverter", false) => Ok(Self::Inverter),
            ("common" | "inverter", true) => Err(format!("{} does not take a meter number", name)),
            ("meter_common", _) => Ok(Self::MeterCommon(meter(instance)?)),
            ("meter_data", _) => Ok(Self::MeterData(meter(instance)?)),
            _ => Err(format!("unknown model '{}'", s)),
        }
    }
}

impl From<ModelSelect> for String {
    fn from(select: ModelSelect) -> Self {
        select.to_string()
    }
}

impl TryFrom<String> for ModelSelect {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
// }}}

// {{{ ModelRecord
#[enum_dispatch]
pub trait RecordCommon {
    fn family(&self) -> ModelFamily;

    /// Body length the header declared, which may exceed what was decoded.
    fn length(&self) -> u16;
}

#[enum_dispatch(RecordCommon)]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModelRecord {
    Common(CommonModel),
    Inverter(InverterModel),
    MeterCommon(MeterCommonModel),
    MeterData(MeterDataModel),
}
// }}}

/// Reads and decodes one block starting at `base_address`.
///
/// Two reads are issued: the fixed-size header, then exactly the body length
/// it declares. The device may change between them; no attempt is made to
/// detect a torn snapshot.
pub fn refresh<M, T>(transport: &mut T, base_address: u32) -> Result<M>
where
    M: Model,
    T: RegisterTransport + ?Sized,
{
    let body_address = base_address
        .checked_add(u32::from(M::HEADER_SIZE))
        .ok_or(Error::AddressOutOfRange { base_address })?;

    let mut header_buffer = read_buffer(transport, base_address, M::HEADER_SIZE)?;
    let header = M::parse_header(&mut header_buffer)?;
    debug!(
        "{} header at {}: id={:?} length={}",
        M::FAMILY.name(),
        base_address,
        header.id,
        header.length
    );

    if body_address.checked_add(u32::from(header.length)).is_none() {
        return Err(Error::AddressOutOfRange { base_address });
    }
    let mut body = read_buffer(transport, body_address, header.length)?;
    let record = M::parse_body(header, &mut body)?;

    if body.remaining() > 0 {
        debug!(
            "{} at {}: ignoring {} trailing words",
            M::FAMILY.name(),
            base_address,
            body.remaining()
        );
    }

    Ok(record)
}

/// Refreshes the block `select` points at, from its registered address.
pub fn read_model<T>(transport: &mut T, select: ModelSelect) -> Result<ModelRecord>
where
    T: RegisterTransport + ?Sized,
{
    let base = select.base_address();
    let record: ModelRecord = match select {
        ModelSelect::Common => refresh::<CommonModel, _>(transport, base)?.into(),
        ModelSelect::Inverter => refresh::<InverterModel, _>(transport, base)?.into(),
        ModelSelect::MeterCommon(_) => refresh::<MeterCommonModel, _>(transport, base)?.into(),
        ModelSelect::MeterData(_) => refresh::<MeterDataModel, _>(transport, base)?.into(),
    };

    Ok(record)
}

fn read_buffer<T>(transport: &mut T, address: u32, count: u16) -> Result<RegisterBuffer>
where
    T: RegisterTransport + ?Sized,
{
    if count == 0 {
        return Ok(RegisterBuffer::default());
    }

    debug!("reading {} words at {}", count, address);
    let words = transport
        .read(address, count)
        .map_err(|err| Error::TransportFailure(Box::new(err)))?;

    Ok(RegisterBuffer::new(words))
}
