pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{IbsReader, LocalStorage, SystemClock};
pub use config::{ReportParameters, TomlConfig};
pub use self::core::{converter::Converter, sg5302::Sg5302Transformer, ConversionOutcome};
pub use utils::error::{ConvertError, Result};
