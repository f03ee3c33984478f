pub use anyhow::{anyhow, bail, Context, Result};
pub use log::{debug, error, info, warn};

pub use crate::config::Config;
pub use crate::datalog_writer::DatalogWriter;
pub use crate::modbus::ModbusTcp;
pub use crate::options::Options;
pub use crate::sunspec::registry::RecordCommon;
pub use crate::sunspec::{ModelFamily, ModelRecord, ModelSelect, RegisterTransport};
