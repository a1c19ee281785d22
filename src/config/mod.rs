#[cfg(feature = "cli")]
pub mod cli;
pub mod report_params;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use report_params::{ReportParameters, ResolvedParameters};
pub use toml_config::TomlConfig;
