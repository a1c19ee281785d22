use crate::config::report_params::ReportParameters;
use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::{
    validate_no_control_chars, validate_non_empty_string, validate_path, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub report: ReportSection,
    /// 只覆蓋檔案裡出現的參數，其餘沿用預設值
    #[serde(default)]
    pub parameters: Option<ReportParameters>,
    /// IBS 欄位路徑 -> SG5302 欄位標籤
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputSection {
    pub directory: Option<PathBuf>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConvertError::ConfigError {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${MISSION_NUM})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// 預設參數加上檔案中的覆蓋值
    pub fn report_parameters(&self) -> ReportParameters {
        let mut params = ReportParameters::default();
        if let Some(overrides) = &self.parameters {
            params.merge(overrides.clone());
        }
        params
    }

    /// 環境變數覆蓋寫回 [parameters]，之後的驗證即涵蓋最終值
    pub fn apply_env_overrides<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = self.report_parameters();
        params.apply_env_overrides(vars)?;
        self.parameters = Some(params);
        Ok(())
    }

    pub fn label(&self) -> &str {
        &self.report.label
    }

    pub fn output_directory(&self) -> Option<&Path> {
        self.output.directory.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.report_parameters().resolve()?;
        validate_no_control_chars("report.label", &self.report.label)?;

        for (path, label) in &self.fields {
            let field = format!("fields.{}", path);
            validate_non_empty_string(&field, label)?;
            validate_no_control_chars(&field, label)?;
        }

        if let Some(directory) = &self.output.directory {
            validate_path("output.directory", &directory.to_string_lossy())?;
        }

        Ok(())
    }
}
