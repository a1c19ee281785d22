use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::{
    validate_fixed_width, validate_no_control_chars, validate_non_empty_string,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const ENABLE_FTP_TRANSFER: &str = "enable_ftp_transfer";
pub const SOURCE_ID: &str = "source_id";
pub const COLLECTOR_DIAGRAPH: &str = "collector_diagraph";
pub const ROUTING: &str = "routing";
pub const PLATFORM_SYMBOL: &str = "platform_symbol";
pub const MISSION_NUM: &str = "mission_num";
pub const FILE_DISTRIBUTION_INDICATOR: &str = "file_distribution_indicator";
pub const DAILY_REPORT_COUNTER: &str = "daily_report_counter";

/// The eight keys every SG5302 report needs.
pub const REQUIRED_KEYS: [&str; 8] = [
    ENABLE_FTP_TRANSFER,
    SOURCE_ID,
    COLLECTOR_DIAGRAPH,
    ROUTING,
    PLATFORM_SYMBOL,
    MISSION_NUM,
    FILE_DISTRIBUTION_INDICATOR,
    DAILY_REPORT_COUNTER,
];

/// 固定欄位寬度 (key, 最大寬度)
pub const FIELD_WIDTHS: [(&str, usize); 7] = [
    (SOURCE_ID, 4),
    (COLLECTOR_DIAGRAPH, 2),
    (ROUTING, 2),
    (PLATFORM_SYMBOL, 1),
    (MISSION_NUM, 8),
    (FILE_DISTRIBUTION_INDICATOR, 3),
    (DAILY_REPORT_COUNTER, 2),
];

pub const ENV_PREFIX: &str = "SG5302_";

/// Report parameters as a key/value map, the way they arrive from config
/// files and the environment. Call [`ReportParameters::resolve`] to get the
/// checked, typed form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportParameters {
    values: BTreeMap<String, Value>,
}

impl Default for ReportParameters {
    fn default() -> Self {
        let mut params = Self::empty();
        params.insert(ENABLE_FTP_TRANSFER, Value::Bool(true));
        params.insert(SOURCE_ID, "AAAA");
        params.insert(COLLECTOR_DIAGRAPH, "ZZ");
        params.insert(ROUTING, "ZZ");
        params.insert(PLATFORM_SYMBOL, "J");
        params.insert(MISSION_NUM, "N488CR");
        params.insert(FILE_DISTRIBUTION_INDICATOR, "ZZZ");
        params.insert(DAILY_REPORT_COUNTER, "01");
        params
    }
}

impl ReportParameters {
    pub fn empty() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Later values win.
    pub fn merge(&mut self, other: ReportParameters) {
        self.values.extend(other.values);
    }

    /// 套用 `SG5302_<KEY>` 形式的環境變數覆蓋
    pub fn apply_env_overrides<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, raw) in vars {
            let Some(suffix) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let key = suffix.to_ascii_lowercase();
            if !REQUIRED_KEYS.contains(&key.as_str()) {
                continue;
            }

            let value = if key == ENABLE_FTP_TRANSFER {
                Value::Bool(parse_bool(&name, &raw)?)
            } else {
                Value::String(raw)
            };
            tracing::debug!("Parameter {} overridden from environment", key);
            self.values.insert(key, value);
        }
        Ok(())
    }

    pub fn resolve(&self) -> Result<ResolvedParameters> {
        let missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|key| !self.values.contains_key(*key))
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConvertError::MissingConfigError { fields: missing });
        }

        let enable_ftp_transfer = match &self.values[ENABLE_FTP_TRANSFER] {
            Value::Bool(flag) => *flag,
            // 字串 "yes" 會以 true 輸出，與原值不符，因此只接受布林值
            other => {
                return Err(ConvertError::InvalidConfigValueError {
                    field: ENABLE_FTP_TRANSFER.to_string(),
                    value: other.to_string(),
                    reason: "Expected a boolean".to_string(),
                })
            }
        };

        for (key, width) in FIELD_WIDTHS {
            let text = self.required_str(key)?;
            validate_non_empty_string(key, text)?;
            validate_fixed_width(key, text, width)?;
        }

        let daily_report_counter = self.required_str(DAILY_REPORT_COUNTER)?;
        if !daily_report_counter.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConvertError::InvalidConfigValueError {
                field: DAILY_REPORT_COUNTER.to_string(),
                value: daily_report_counter.to_string(),
                reason: "Value must contain digits only".to_string(),
            });
        }

        let mut extra = BTreeMap::new();
        for (key, value) in &self.values {
            if REQUIRED_KEYS.contains(&key.as_str()) {
                continue;
            }
            let text = display_value(value);
            validate_no_control_chars("parameters", key)?;
            validate_no_control_chars(key, &text)?;
            extra.insert(key.clone(), text);
        }

        Ok(ResolvedParameters {
            enable_ftp_transfer,
            source_id: self.required_str(SOURCE_ID)?.to_string(),
            collector_diagraph: self.required_str(COLLECTOR_DIAGRAPH)?.to_string(),
            routing: self.required_str(ROUTING)?.to_string(),
            platform_symbol: self.required_str(PLATFORM_SYMBOL)?.to_string(),
            mission_num: self.required_str(MISSION_NUM)?.to_string(),
            file_distribution_indicator: self
                .required_str(FILE_DISTRIBUTION_INDICATOR)?
                .to_string(),
            daily_report_counter: daily_report_counter.to_string(),
            extra,
        })
    }

    fn required_str(&self, key: &str) -> Result<&str> {
        match self.values.get(key) {
            Some(Value::String(text)) => Ok(text.as_str()),
            Some(other) => Err(ConvertError::InvalidConfigValueError {
                field: key.to_string(),
                value: other.to_string(),
                reason: "Expected a string".to_string(),
            }),
            None => Err(ConvertError::MissingConfigError {
                fields: vec![key.to_string()],
            }),
        }
    }
}

/// Checked parameters ready to be laid out in a report.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParameters {
    pub enable_ftp_transfer: bool,
    pub source_id: String,
    pub collector_diagraph: String,
    pub routing: String,
    pub platform_symbol: String,
    pub mission_num: String,
    pub file_distribution_indicator: String,
    pub daily_report_counter: String,
    /// 非必要的額外參數，照原值輸出
    pub extra: BTreeMap<String, String>,
}

fn parse_bool(field: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConvertError::InvalidConfigValueError {
            field: field.to_string(),
            value: raw.to_string(),
            reason: "Expected true/false, 1/0 or yes/no".to_string(),
        }),
    }
}

pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
