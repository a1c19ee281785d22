pub mod converter;
pub mod sg5302;

pub use crate::domain::model::{ConversionOutcome, GeneratedReportFile, InterceptRecord};
pub use crate::domain::ports::{Clock, RecordReader, ReportTransformer, Storage};
pub use crate::utils::error::Result;
