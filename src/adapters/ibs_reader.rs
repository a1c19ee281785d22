use crate::domain::model::InterceptRecord;
use crate::domain::ports::RecordReader;
use crate::utils::error::{ConvertError, Result};
use serde_json::Value;
use std::path::Path;

/// 讀取 IBS JSON 報告。一份報告只應包含一個 intercept
#[derive(Debug, Clone, Default)]
pub struct IbsReader;

impl IbsReader {
    pub fn new() -> Self {
        Self
    }

    /// 從 JSON 字串解析，`path` 只用於錯誤訊息
    pub fn parse_str(&self, content: &str, path: &Path) -> Result<Vec<InterceptRecord>> {
        let json_data: Value =
            serde_json::from_str(content).map_err(|e| ConvertError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let records = match json_data {
            Value::Null => Vec::new(),
            Value::Object(obj) => vec![InterceptRecord::new(obj)],
            Value::Array(items) => {
                let mut records = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    match item {
                        Value::Object(obj) => records.push(InterceptRecord::new(obj)),
                        other => {
                            return Err(ConvertError::ParseError {
                                path: path.to_path_buf(),
                                message: format!(
                                    "element {} is {}, expected an object",
                                    index,
                                    json_type_name(&other)
                                ),
                            })
                        }
                    }
                }
                records
            }
            other => {
                return Err(ConvertError::ParseError {
                    path: path.to_path_buf(),
                    message: format!(
                        "top-level value is {}, expected an object",
                        json_type_name(&other)
                    ),
                })
            }
        };

        // 空的物件視為沒有資料
        let records: Vec<InterceptRecord> =
            records.into_iter().filter(|r| !r.is_empty()).collect();

        if records.len() > 1 {
            return Err(ConvertError::MultipleIntercepts {
                count: records.len(),
            });
        }

        tracing::debug!(
            "Parsed {} intercept record(s) from {}",
            records.len(),
            path.display()
        );
        Ok(records)
    }
}

impl RecordReader for IbsReader {
    fn read(&self, path: &Path) -> Result<Vec<InterceptRecord>> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConvertError::InputNotFound {
                path: path.to_path_buf(),
            },
            _ => ConvertError::IoError(e),
        })?;
        self.parse_str(&content, path)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
