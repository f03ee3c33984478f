//! SunSpec block decoding over holding registers.

pub mod buffer;
pub mod enums;
pub mod models;
pub mod phases;
pub mod registry;
pub mod transport;

pub use buffer::RegisterBuffer;
pub use models::{CommonModel, InverterModel, MeterCommonModel, MeterDataModel, Model};
pub use phases::{PhaseTriple, ScaledGroup};
pub use registry::{refresh, read_model, MeterInstance, ModelFamily, ModelRecord, ModelSelect};
pub use transport::RegisterTransport;
