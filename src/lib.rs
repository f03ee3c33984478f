pub mod config; // YAML configuration
pub mod datalog_writer; // JSON-lines record log
pub mod error; // Decode errors
pub mod modbus; // Modbus/TCP register transport
pub mod options; // Command line options parsing
pub mod prelude; // Common imports and types
pub mod sunspec; // SunSpec block decoding

pub use error::Error;

// Get the package version from Cargo.toml
const CARGO_PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

use crate::prelude::*;
use std::io::Write;

pub fn init_logging(level: &str) {
    let result = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.module_path().unwrap_or(""),
                record.args()
            )
        })
        .write_style(env_logger::WriteStyle::Never)
        .try_init();

    if let Err(e) = result {
        eprintln!("Failed to initialise logging: {}", e);
    }
}

/// Refreshes each selected block in turn. A failed block does not stop the
/// ones after it.
pub fn read_models<T>(
    transport: &mut T,
    models: &[ModelSelect],
) -> Vec<(ModelSelect, error::Result<ModelRecord>)>
where
    T: RegisterTransport + ?Sized,
{
    models
        .iter()
        .map(|&select| (select, sunspec::read_model(transport, select)))
        .collect()
}

/// Main application entry point
///
/// Reads every configured block once, prints each record as JSON on stdout
/// and, when configured, appends it to the datalog file.
pub fn app(options: Options) -> Result<()> {
    let config = Config::new(options.config_file.clone())?;

    init_logging(config.loglevel());
    info!(
        "sunspec-bridge {} starting with config file: {}",
        CARGO_PKG_VERSION, options.config_file
    );
    config.log_summary();

    let models = if options.models.is_empty() {
        config.models().to_vec()
    } else {
        options.models.clone()
    };

    let mut datalog_writer = config
        .datalog_file()
        .map(DatalogWriter::new)
        .transpose()?;

    let mut transport = ModbusTcp::connect(
        config.host(),
        config.port(),
        config.unit_id(),
        config.read_timeout(),
    )
    .with_context(|| format!("failed to connect to {}:{}", config.host(), config.port()))?;

    let mut failures = 0;
    for (select, result) in read_models(&mut transport, &models) {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                error!("Failed to read {} at {}: {}", select, select.base_address(), e);
                failures += 1;
                continue;
            }
        };

        let json = if options.pretty {
            serde_json::to_string_pretty(&record)?
        } else {
            serde_json::to_string(&record)?
        };
        println!("{}", json);

        if let Some(writer) = datalog_writer.as_mut() {
            if let Err(e) = writer.write_record(select, &record) {
                error!("Failed to log {}: {}", select, e);
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} models failed to read", failures, models.len());
    }

    info!("Read {} models", models.len());
    Ok(())
}
