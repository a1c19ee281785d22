use crate::config::report_params::ReportParameters;
use crate::core::{ConversionOutcome, RecordReader, ReportTransformer};
use crate::utils::error::{ConvertError, Result};
use crate::utils::monitor::SystemMonitor;
use std::path::Path;

/// Drives one IBS -> SG5302 conversion: check input, read, generate.
pub struct Converter<R: RecordReader, T: ReportTransformer> {
    reader: R,
    transformer: T,
    params: ReportParameters,
    label: String,
    monitor: SystemMonitor,
}

impl<R: RecordReader, T: ReportTransformer> Converter<R, T> {
    pub fn new(reader: R, transformer: T, params: ReportParameters) -> Self {
        Self::new_with_monitoring(reader, transformer, params, false)
    }

    pub fn new_with_monitoring(
        reader: R,
        transformer: T,
        params: ReportParameters,
        monitor_enabled: bool,
    ) -> Self {
        Self {
            reader,
            transformer,
            params,
            label: String::new(),
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn run(&self, ibs_file: &Path, output_directory: &Path) -> Result<ConversionOutcome> {
        tracing::info!("🚀 Converting IBS report: {}", ibs_file.display());
        self.monitor.log_stats("Start");

        if !ibs_file.is_file() {
            return Err(ConvertError::InputNotFound {
                path: ibs_file.to_path_buf(),
            });
        }

        let records = self.reader.read(ibs_file)?;
        tracing::info!("📊 Read {} intercept record(s)", records.len());
        self.monitor.log_stats("Read");

        if records.is_empty() {
            tracing::warn!("No data found in {}", ibs_file.display());
            return Ok(ConversionOutcome::NoData);
        }

        let paths =
            self.transformer
                .generate(&records, &self.label, output_directory, &self.params)?;
        self.monitor.log_stats("Generate");
        self.monitor.log_final_stats();

        tracing::info!("✅ Wrote {} SG5302 report(s)", paths.len());
        Ok(ConversionOutcome::Written(paths))
    }
}
