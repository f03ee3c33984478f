use clap::Parser;

use crate::sunspec::ModelSelect;

/// SunSpec Bridge - reads SunSpec blocks from an inverter over Modbus/TCP
#[derive(Debug, Parser)]
#[clap(author, version)]
pub struct Options {
    /// Config file to read
    #[clap(short = 'c', long = "config", default_value = "config.yaml")]
    pub config_file: String,

    /// Block to read, e.g. common, inverter, meter_common:1, meter_data:2.
    /// Repeat to read several; overrides the models list in the config file.
    #[clap(short = 'm', long = "model")]
    pub models: Vec<ModelSelect>,

    /// Pretty-print the JSON written to stdout
    #[clap(short = 'p', long = "pretty")]
    pub pretty: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::parse()
    }
}
