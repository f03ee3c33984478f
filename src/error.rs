use crate::sunspec::registry::ModelFamily;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures raised while refreshing a SunSpec model.
///
/// Every variant aborts the refresh it occurred in; no partially decoded
/// record is ever handed back to the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A decode primitive needed more words than the buffer had left.
    #[error("buffer underrun at word {position}: needed {needed}, {available} available")]
    BufferUnderrun {
        position: usize,
        needed: usize,
        available: usize,
    },

    /// Header magic or model id did not match the requested family.
    #[error("unknown device model for {family:?}: {reason}")]
    UnknownDeviceModel { family: ModelFamily, reason: String },

    /// A discriminator word has no defined meaning.
    #[error("unknown {kind} value {value}")]
    UnknownEnumValue { kind: &'static str, value: u16 },

    /// The block would start or end past the 32-bit address space.
    #[error("block at {base_address} runs past the end of the address space")]
    AddressOutOfRange { base_address: u32 },

    /// Passed through untouched from the register transport.
    #[error("transport failure: {0}")]
    TransportFailure(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub(crate) fn unknown_model(family: ModelFamily, reason: impl Into<String>) -> Self {
        Self::UnknownDeviceModel {
            family,
            reason: reason.into(),
        }
    }

    pub fn is_buffer_underrun(&self) -> bool {
        matches!(self, Self::BufferUnderrun { .. })
    }

    pub fn is_unknown_device_model(&self) -> bool {
        matches!(self, Self::UnknownDeviceModel { .. })
    }

    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Self::TransportFailure(_))
    }
}
