use serde::Serialize;

use super::{Header, Model};
use crate::error::{Error, Result};
use crate::sunspec::buffer::RegisterBuffer;
use crate::sunspec::enums::{self, InverterDeviceType, InverterStatus};
use crate::sunspec::phases::PhaseTriple;
use crate::sunspec::registry::{ModelFamily, RecordCommon};

/// Inverter block (models 101/102/103). Values are in A, V, W, Hz, VA, var,
/// %, Wh and °C after scaling.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InverterModel {
    pub device_type: InverterDeviceType,
    pub length: u16,

    pub ac_current: f64,
    pub ac_current_phases: PhaseTriple,
    pub ac_voltage_between_phases: PhaseTriple,
    pub ac_voltage_phases_to_neutral: PhaseTriple,
    pub ac_real_power: f64,
    pub ac_frequency: f64,
    pub ac_apparent_power: f64,
    pub ac_reactive_power: f64,
    pub ac_power_factor: f64,
    pub ac_energy_lifetime: f64,

    pub dc_current: f64,
    pub dc_voltage: f64,
    pub dc_power: f64,

    pub heat_sink_temperature: f64,
    pub status: InverterStatus,
    pub status_vendor: u16,
}

impl Model for InverterModel {
    type Id = InverterDeviceType;

    const FAMILY: ModelFamily = ModelFamily::Inverter;
    const HEADER_SIZE: u16 = 2;

    fn parse_header(buffer: &mut RegisterBuffer) -> Result<Header<InverterDeviceType>> {
        let raw = buffer.uint16()?;
        let id = enums::decode::<InverterDeviceType>(raw).map_err(|_| {
            Error::unknown_model(Self::FAMILY, format!("model id {} is not an inverter", raw))
        })?;

        Ok(Header {
            id,
            length: buffer.uint16()?,
        })
    }

    fn parse_body(header: Header<InverterDeviceType>, buffer: &mut RegisterBuffer) -> Result<Self> {
        let current = buffer.uint16_sum_and_phases()?;
        let voltage = buffer.voltage_phases()?;

        let ac_real_power = buffer.int16_scaled()?;
        let ac_frequency = buffer.uint16_scaled()?;
        let ac_apparent_power = buffer.int16_scaled()?;
        let ac_reactive_power = buffer.int16_scaled()?;
        let ac_power_factor = buffer.int16_scaled()?;

        let energy = buffer.uint32()?;
        let ac_energy_lifetime = f64::from(energy) * buffer.scale_unsigned()?;

        let dc_current = buffer.uint16_scaled()?;
        let dc_voltage = buffer.uint16_scaled()?;
        let dc_power = buffer.int16_scaled()?;

        buffer.skip(1)?; // cabinet temperature
        let temperature = buffer.int16()?;
        buffer.skip(2)?; // transformer and other temperatures
        let heat_sink_temperature = f64::from(temperature) * buffer.scale()?;

        let status = enums::decode::<InverterStatus>(buffer.uint16()?)?;
        let status_vendor = buffer.uint16()?;

        Ok(Self {
            device_type: header.id,
            length: header.length,
            ac_current: current.total,
            ac_current_phases: current.phases,
            ac_voltage_between_phases: voltage.between_phases,
            ac_voltage_phases_to_neutral: voltage.to_neutral,
            ac_real_power,
            ac_frequency,
            ac_apparent_power,
            ac_reactive_power,
            ac_power_factor,
            ac_energy_lifetime,
            dc_current,
            dc_voltage,
            dc_power,
            heat_sink_temperature,
            status,
            status_vendor,
        })
    }
}

impl RecordCommon for InverterModel {
    fn family(&self) -> ModelFamily {
        ModelFamily::Inverter
    }

    fn length(&self) -> u16 {
        self.length
    }
}
