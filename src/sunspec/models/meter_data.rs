use serde::Serialize;

use super::{Header, Model};
use crate::error::{Error, Result};
use crate::sunspec::buffer::RegisterBuffer;
use crate::sunspec::enums::{self, MeterDeviceType};
use crate::sunspec::phases::PhaseTriple;
use crate::sunspec::registry::{ModelFamily, RecordCommon};

/// Meter measurement block (models 201-204).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MeterDataModel {
    pub device_type: MeterDeviceType,
    pub length: u16,

    pub ac_current: f64,
    pub ac_current_phases: PhaseTriple,
    /// Line to neutral. Line to line voltage is not exposed.
    pub ac_voltage: f64,
    pub ac_voltage_phases: PhaseTriple,
    pub ac_frequency: f64,

    pub real_power: f64,
    pub real_power_phases: PhaseTriple,
    pub apparent_power: f64,
    pub apparent_power_phases: PhaseTriple,
    pub reactive_power: f64,
    pub reactive_power_phases: PhaseTriple,
    pub power_factor: f64,
    pub power_factor_phases: PhaseTriple,

    pub real_exported: f64,
    pub real_exported_phases: PhaseTriple,
    pub real_imported: f64,
    pub real_imported_phases: PhaseTriple,
}

impl Model for MeterDataModel {
    type Id = MeterDeviceType;

    const FAMILY: ModelFamily = ModelFamily::MeterData;
    const HEADER_SIZE: u16 = 2;

    fn parse_header(buffer: &mut RegisterBuffer) -> Result<Header<MeterDeviceType>> {
        let raw = buffer.uint16()?;
        let id = enums::decode::<MeterDeviceType>(raw).map_err(|_| {
            Error::unknown_model(Self::FAMILY, format!("model id {} is not a meter", raw))
        })?;

        Ok(Header {
            id,
            length: buffer.uint16()?,
        })
    }

    fn parse_body(header: Header<MeterDeviceType>, buffer: &mut RegisterBuffer) -> Result<Self> {
        let current = buffer.int16_sum_and_phases()?;
        let (ac_voltage, ac_voltage_phases) = parse_voltages(buffer)?;
        let ac_frequency = buffer.int16_scaled()?;

        let real_power = buffer.int16_sum_and_phases()?;
        let apparent_power = buffer.int16_sum_and_phases()?;
        let reactive_power = buffer.int16_sum_and_phases()?;
        let power_factor = buffer.int16_sum_and_phases()?;

        // exported energy comes first in the register map
        let (exported, imported) = buffer.acc32_pair()?;

        Ok(Self {
            device_type: header.id,
            length: header.length,
            ac_current: current.total,
            ac_current_phases: current.phases,
            ac_voltage,
            ac_voltage_phases,
            ac_frequency,
            real_power: real_power.total,
            real_power_phases: real_power.phases,
            apparent_power: apparent_power.total,
            apparent_power_phases: apparent_power.phases,
            reactive_power: reactive_power.total,
            reactive_power_phases: reactive_power.phases,
            power_factor: power_factor.total,
            power_factor_phases: power_factor.phases,
            real_exported: exported.total,
            real_exported_phases: exported.phases,
            real_imported: imported.total,
            real_imported_phases: imported.phases,
        })
    }
}

/// Line to neutral average and phases. The four line to line words between
/// them and the scale factor are skipped.
fn parse_voltages(buffer: &mut RegisterBuffer) -> Result<(f64, PhaseTriple)> {
    let total = buffer.int16()?;
    let a = buffer.int16()?;
    let b = buffer.int16_nullable()?;
    let c = buffer.int16_nullable()?;
    buffer.skip(4)?;
    let multiplier = buffer.scale()?;

    Ok((
        f64::from(total) * multiplier,
        PhaseTriple::scaled(a, b, c, multiplier),
    ))
}

impl RecordCommon for MeterDataModel {
    fn family(&self) -> ModelFamily {
        ModelFamily::MeterData
    }

    fn length(&self) -> u16 {
        self.length
    }
}
