use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 單一攔截 (intercept) 的欄位資料，由 IBS 報告讀出後不再修改
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterceptRecord {
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl InterceptRecord {
    pub fn new(data: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { data }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }
}

/// 產生的 SG5302 報告：路徑與完整內容
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedReportFile {
    pub path: PathBuf,
    pub content: String,
    pub generated_at: NaiveDateTime,
}

/// Converter 執行結果。沒有資料不是錯誤，由呼叫端決定結束碼
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutcome {
    Written(Vec<PathBuf>),
    NoData,
}
