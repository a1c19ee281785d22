use crate::config::report_params::ReportParameters;
use crate::domain::model::InterceptRecord;
use crate::utils::error::Result;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

pub trait RecordReader {
    fn read(&self, path: &Path) -> Result<Vec<InterceptRecord>>;
}

pub trait ReportTransformer {
    fn generate(
        &self,
        records: &[InterceptRecord],
        label: &str,
        output_directory: &Path,
        params: &ReportParameters,
    ) -> Result<Vec<PathBuf>>;
}

pub trait Storage {
    /// Writes `data` to a file that must not exist yet. Either the whole
    /// payload lands at `path` or nothing does.
    fn write_new(&self, path: &Path, data: &[u8]) -> Result<()>;
}

pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}
