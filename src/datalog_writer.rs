use crate::prelude::*;
use crate::sunspec::MeterInstance;

use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// One line of the datalog file.
#[derive(Debug, Serialize)]
struct DatalogEntry<'a> {
    utc_timestamp: i64,
    model: ModelFamily,
    #[serde(skip_serializing_if = "Option::is_none")]
    instance: Option<MeterInstance>,
    base_address: u32,
    record: &'a ModelRecord,
}

#[derive(Debug)]
pub struct DatalogWriter {
    file: std::fs::File,
    path: String,
    records_written: u64,
}

impl DatalogWriter {
    pub fn new(path: &str) -> Result<Self> {
        info!("Opening datalog file at {}", path);

        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                error!("Failed to open datalog file {}: {}", path, e);
                return Err(e.into());
            }
        };

        Ok(Self {
            file,
            path: path.to_string(),
            records_written: 0,
        })
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    pub fn write_record(&mut self, select: ModelSelect, record: &ModelRecord) -> Result<()> {
        let entry = DatalogEntry {
            utc_timestamp: chrono::Utc::now().timestamp(),
            model: select.family(),
            instance: select.instance(),
            base_address: select.base_address(),
            record,
        };
        let json_string = serde_json::to_string(&entry)?;

        if let Err(e) = writeln!(self.file, "{}", json_string).and_then(|_| self.file.flush()) {
            error!("Failed to write to datalog file {}: {}", self.path, e);
            return Err(e.into());
        }

        self.records_written += 1;
        debug!("Total records stored in datalog file: {}", self.records_written);

        Ok(())
    }
}
