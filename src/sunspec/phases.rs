//! Register patterns repeated across SunSpec blocks.
//!
//! Each group is read raw first and the trailing scale word is applied last,
//! matching the order the registers appear on the device.

use serde::Serialize;

use crate::error::Result;
use crate::sunspec::buffer::RegisterBuffer;

/// One reading per electrical phase. Phase A is always reported; B and C are
/// absent on single-phase devices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct PhaseTriple {
    pub a: f64,
    pub b: Option<f64>,
    pub c: Option<f64>,
}

impl PhaseTriple {
    pub fn scaled<T: Into<f64>>(a: T, b: Option<T>, c: Option<T>, multiplier: f64) -> Self {
        Self {
            a: a.into() * multiplier,
            b: b.map(|b| b.into() * multiplier),
            c: c.map(|c| c.into() * multiplier),
        }
    }
}

/// A total with its per-phase breakdown, both already scaled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ScaledGroup {
    pub total: f64,
    pub phases: PhaseTriple,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct VoltagePhases {
    pub between_phases: PhaseTriple,
    pub to_neutral: PhaseTriple,
}

impl RegisterBuffer {
    pub fn int16_sum_and_phases(&mut self) -> Result<ScaledGroup> {
        let total = self.int16()?;
        let a = self.int16()?;
        let b = self.int16_nullable()?;
        let c = self.int16_nullable()?;
        let multiplier = self.scale()?;

        Ok(ScaledGroup {
            total: f64::from(total) * multiplier,
            phases: PhaseTriple::scaled(a, b, c, multiplier),
        })
    }

    pub fn uint16_sum_and_phases(&mut self) -> Result<ScaledGroup> {
        let total = self.uint16()?;
        let a = self.uint16()?;
        let b = self.uint16_nullable()?;
        let c = self.uint16_nullable()?;
        let multiplier = self.scale()?;

        Ok(ScaledGroup {
            total: f64::from(total) * multiplier,
            phases: PhaseTriple::scaled(a, b, c, multiplier),
        })
    }

    /// AB, BC, CA (signed) then AN (unsigned), BN, CN (nullable), then the
    /// shared scale word.
    pub fn voltage_phases(&mut self) -> Result<VoltagePhases> {
        let ab = self.int16()?;
        let bc = self.int16()?;
        let ca = self.int16()?;
        let an = self.uint16()?;
        let bn = self.uint16_nullable()?;
        let cn = self.uint16_nullable()?;
        let multiplier = self.scale()?;

        Ok(VoltagePhases {
            between_phases: PhaseTriple::scaled(ab, Some(bc), Some(ca), multiplier),
            to_neutral: PhaseTriple::scaled(an, bn, cn, multiplier),
        })
    }

    /// Two 32-bit accumulator groups (total, A, B, C each) sharing one
    /// trailing scale word. Groups are returned in register order; which one
    /// is import and which export is up to the block layout.
    pub fn acc32_pair(&mut self) -> Result<(ScaledGroup, ScaledGroup)> {
        let first = self.acc32_raw()?;
        let second = self.acc32_raw()?;
        let multiplier = self.scale()?;

        Ok((first.scale(multiplier), second.scale(multiplier)))
    }

    fn acc32_raw(&mut self) -> Result<RawAccumulator> {
        Ok(RawAccumulator {
            total: self.uint32()?,
            a: self.uint32()?,
            b: self.uint32_nullable()?,
            c: self.uint32_nullable()?,
        })
    }
}

struct RawAccumulator {
    total: u32,
    a: u32,
    b: Option<u32>,
    c: Option<u32>,
}

impl RawAccumulator {
    fn scale(self, multiplier: f64) -> ScaledGroup {
        ScaledGroup {
            total: f64::from(self.total) * multiplier,
            phases: PhaseTriple::scaled(self.a, self.b, self.c, multiplier),
        }
    }
}
