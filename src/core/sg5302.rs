use crate::config::report_params::{display_value, ReportParameters, ResolvedParameters};
use crate::core::{Clock, InterceptRecord, ReportTransformer, Storage};
use crate::domain::model::GeneratedReportFile;
use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::validate_no_control_chars;
use chrono::NaiveDateTime;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const REPORT_TITLE: &str = "SG5302 INTERCEPT REPORT";
pub const FILE_PREFIX: &str = "sg5302_report_";
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
pub const LINE_WIDTH: usize = 80;
pub const LABEL_WIDTH: usize = 32;

pub fn report_file_name(timestamp: &NaiveDateTime) -> String {
    format!("{}{}.txt", FILE_PREFIX, timestamp.format(FILE_TIMESTAMP_FORMAT))
}

/// Lays out intercept records as SG5302 reports and writes one file per
/// record through the injected [`Storage`].
pub struct Sg5302Transformer<S: Storage, C: Clock> {
    storage: S,
    clock: C,
    field_labels: BTreeMap<String, String>,
}

impl<S: Storage, C: Clock> Sg5302Transformer<S, C> {
    pub fn new(storage: S, clock: C) -> Self {
        Self {
            storage,
            clock,
            field_labels: BTreeMap::new(),
        }
    }

    /// IBS 欄位路徑 -> SG5302 標籤，未對應的欄位使用大寫路徑
    pub fn with_field_labels(mut self, field_labels: BTreeMap<String, String>) -> Self {
        self.field_labels = field_labels;
        self
    }

    /// 產生報告內容，不寫檔
    pub fn build_report(
        &self,
        record: &InterceptRecord,
        label: &str,
        output_directory: &Path,
        params: &ResolvedParameters,
        generated_at: NaiveDateTime,
    ) -> GeneratedReportFile {
        let mut body = String::new();

        if label.is_empty() {
            body.push_str(REPORT_TITLE);
        } else {
            body.push_str(&format!("{} {}", REPORT_TITLE, label));
        }
        body.push('\n');

        let header = format!(
            "SRC  {:<4}  DIG {:<2}  RTE {:<2}  PLT {:<1}  MSN {:<8}  FDI {:<3}  CTR {:<2}",
            params.source_id,
            params.collector_diagraph,
            params.routing,
            params.platform_symbol,
            params.mission_num,
            params.file_distribution_indicator,
            params.daily_report_counter,
        );
        body.push_str(header.trim_end());
        body.push('\n');

        body.push_str(&format!("DTG  {}\n", generated_at.format("%Y%m%d %H%M%S")));
        body.push_str(&format!("FTP  {}\n", params.enable_ftp_transfer));
        for (key, value) in &params.extra {
            body.push_str(&format!("PRM  {}={}\n", key, value));
        }

        let rule = "=".repeat(LINE_WIDTH);
        body.push_str(&rule);
        body.push('\n');

        let mut fields = Vec::new();
        flatten_fields("", &Value::Object(record.data.clone()), &mut fields);
        for (path, value) in &fields {
            let field_label = self
                .field_labels
                .get(path)
                .cloned()
                .unwrap_or_else(|| path.to_uppercase());
            let line = format!("{:<width$} {}", field_label, value, width = LABEL_WIDTH - 1);
            body.push_str(line.trim_end());
            body.push('\n');
        }

        body.push_str(&rule);
        body.push('\n');
        body.push_str(&format!("END  FIELDS {:04}\n", fields.len()));

        GeneratedReportFile {
            path: output_directory.join(report_file_name(&generated_at)),
            content: body,
            generated_at,
        }
    }
}

impl<S: Storage, C: Clock> ReportTransformer for Sg5302Transformer<S, C> {
    fn generate(
        &self,
        records: &[InterceptRecord],
        label: &str,
        output_directory: &Path,
        params: &ReportParameters,
    ) -> Result<Vec<PathBuf>> {
        // 參數不完整時不可產生任何檔案
        let resolved = params.resolve()?;

        validate_no_control_chars("report.label", label)?;
        for (path, field_label) in &self.field_labels {
            validate_no_control_chars(&format!("fields.{}", path), field_label)?;
        }

        if records.is_empty() {
            return Err(ConvertError::EmptyRecordSet);
        }

        let output_directory = resolve_output_directory(output_directory)?;

        let mut written = Vec::with_capacity(records.len());
        for record in records {
            let report = self.build_report(
                record,
                label,
                &output_directory,
                &resolved,
                self.clock.now(),
            );

            self.storage
                .write_new(&report.path, report.content.as_bytes())?;
            tracing::info!("📝 SG5302 report written: {}", report.path.display());

            if resolved.enable_ftp_transfer {
                tracing::info!(
                    "FTP transfer enabled for {}; transfer is handled outside this tool",
                    report.path.display()
                );
            }

            written.push(report.path);
        }

        Ok(written)
    }
}

fn resolve_output_directory(output_directory: &Path) -> Result<PathBuf> {
    let write_error = |source: std::io::Error| ConvertError::WriteError {
        path: output_directory.to_path_buf(),
        source,
    };

    let canonical = output_directory.canonicalize().map_err(write_error)?;
    if !canonical.is_dir() {
        return Err(write_error(std::io::Error::other(
            "output path is not a directory",
        )));
    }
    Ok(canonical)
}

/// 巢狀物件展開為 a.b，陣列展開為 a[0]；空的容器仍輸出一行空值
fn flatten_fields(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) if map.is_empty() && !prefix.is_empty() => {
            out.push((prefix.to_string(), String::new()))
        }
        Value::Array(items) if items.is_empty() => out.push((prefix.to_string(), String::new())),
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_fields(&path, child, out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_fields(&format!("{}[{}]", prefix, index), child, out);
            }
        }
        scalar => out.push((prefix.to_string(), sanitize(&display_value(scalar)))),
    }
}

// 換行等控制字元會破壞固定欄位格式
fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::report_params::{ROUTING, SOURCE_ID};
    use chrono::NaiveDate;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[derive(Default)]
    struct MockStorage {
        files: RefCell<HashMap<PathBuf, Vec<u8>>>,
    }

    impl Storage for MockStorage {
        fn write_new(&self, path: &Path, data: &[u8]) -> Result<()> {
            let mut files = self.files.borrow_mut();
            if files.contains_key(path) {
                return Err(ConvertError::OutputCollision {
                    path: path.to_path_buf(),
                });
            }
            files.insert(path.to_path_buf(), data.to_vec());
            Ok(())
        }
    }

    struct FixedClock {
        start: NaiveDateTime,
        ticks: Cell<i64>,
    }

    impl FixedClock {
        fn new() -> Self {
            Self {
                start: NaiveDate::from_ymd_opt(2026, 10, 16)
                    .unwrap()
                    .and_hms_opt(9, 5, 7)
                    .unwrap(),
                ticks: Cell::new(0),
            }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            let tick = self.ticks.get();
            self.ticks.set(tick + 1);
            self.start + chrono::Duration::seconds(tick)
        }
    }

    fn sample_record() -> InterceptRecord {
        let value = serde_json::json!({
            "intercept_id": "IX-0042",
            "signal": {"frequency_mhz": 243.5, "modulation": "FM"},
            "bearings": [112, 114],
            "notes": "line one\nline two",
            "operator": null
        });
        match value {
            Value::Object(map) => InterceptRecord::new(map),
            _ => unreachable!(),
        }
    }

    fn transformer() -> Sg5302Transformer<MockStorage, FixedClock> {
        Sg5302Transformer::new(MockStorage::default(), FixedClock::new())
    }

    #[test]
    fn test_report_file_name() {
        let ts = NaiveDate::from_ymd_opt(2026, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        assert_eq!(report_file_name(&ts), "sg5302_report_20260102_030405.txt");
    }

    #[test]
    fn test_build_report_layout() {
        let params = ReportParameters::default().resolve().unwrap();
        let report = transformer().build_report(
            &sample_record(),
            "",
            Path::new("/reports"),
            &params,
            FixedClock::new().now(),
        );

        let lines: Vec<&str> = report.content.lines().collect();
        assert_eq!(lines[0], "SG5302 INTERCEPT REPORT");
        assert_eq!(
            lines[1],
            "SRC  AAAA  DIG ZZ  RTE ZZ  PLT J  MSN N488CR    FDI ZZZ  CTR 01"
        );
        assert_eq!(lines[2], "DTG  20261016 090507");
        assert_eq!(lines[3], "FTP  true");
        assert_eq!(lines[4], "=".repeat(LINE_WIDTH));
        assert!(lines.contains(&"BEARINGS[0]                     112"));
        assert!(lines.contains(&"SIGNAL.FREQUENCY_MHZ            243.5"));
        assert!(lines.contains(&"NOTES                           line one line two"));
        assert!(lines.contains(&"OPERATOR"));
        assert_eq!(*lines.last().unwrap(), "END  FIELDS 0007");
        assert_eq!(
            report.path,
            PathBuf::from("/reports/sg5302_report_20261016_090507.txt")
        );
    }

    #[test]
    fn test_build_report_label_and_field_mapping() {
        let mut labels = BTreeMap::new();
        labels.insert("signal.frequency_mhz".to_string(), "FREQ".to_string());
        let transformer = transformer().with_field_labels(labels);

        let mut params = ReportParameters::default();
        params.insert("priority", "FLASH");
        let params = params.resolve().unwrap();

        let report = transformer.build_report(
            &sample_record(),
            "DAILY",
            Path::new("/reports"),
            &params,
            FixedClock::new().now(),
        );

        assert!(report.content.starts_with("SG5302 INTERCEPT REPORT DAILY\n"));
        assert!(report.content.contains("\nFREQ                            243.5\n"));
        assert!(report.content.contains("\nPRM  priority=FLASH\n"));
    }

    #[test]
    fn test_generate_writes_one_file_per_record() {
        let dir = TempDir::new().unwrap();
        let transformer = transformer();

        let paths = transformer
            .generate(
                &[sample_record()],
                "",
                dir.path(),
                &ReportParameters::default(),
            )
            .unwrap();

        assert_eq!(paths.len(), 1);
        assert!(paths[0].is_absolute());
        let files = transformer.storage.files.borrow();
        let content = String::from_utf8(files[&paths[0]].clone()).unwrap();
        assert!(content.contains("INTERCEPT_ID                    IX-0042"));
    }

    #[test]
    fn test_generate_missing_parameter_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let transformer = transformer();
        let mut params = ReportParameters::default();
        params.remove(ROUTING);

        let err = transformer
            .generate(&[sample_record()], "", dir.path(), &params)
            .unwrap_err();

        assert!(matches!(err, ConvertError::MissingConfigError { .. }));
        assert!(transformer.storage.files.borrow().is_empty());
    }

    #[test]
    fn test_generate_rejects_missing_directory() {
        let dir = TempDir::new().unwrap();
        let err = transformer()
            .generate(
                &[sample_record()],
                "",
                &dir.path().join("absent"),
                &ReportParameters::default(),
            )
            .unwrap_err();
        assert!(matches!(err, ConvertError::WriteError { .. }));
    }

    #[test]
    fn test_generate_empty_records() {
        let dir = TempDir::new().unwrap();
        let err = transformer()
            .generate(&[], "", dir.path(), &ReportParameters::default())
            .unwrap_err();
        assert!(matches!(err, ConvertError::EmptyRecordSet));
    }

    #[test]
    fn test_every_parameter_value_appears_in_body() {
        let mut params = ReportParameters::default();
        params.insert(SOURCE_ID, "QRST");
        params.insert("analyst", "ECHO7");
        let resolved = params.resolve().unwrap();

        let report = transformer().build_report(
            &sample_record(),
            "",
            Path::new("/reports"),
            &resolved,
            FixedClock::new().now(),
        );

        for (_, value) in params.iter() {
            assert!(report.content.contains(&display_value(value)));
        }
    }

    #[test]
    fn test_non_string_parameter_values_appear_verbatim() {
        let mut params = ReportParameters::default();
        params.insert("enable_ftp_transfer", false);
        params.insert("priority", 3);
        params.insert("ratio", 0.75);
        let resolved = params.resolve().unwrap();

        let report = transformer().build_report(
            &sample_record(),
            "",
            Path::new("/reports"),
            &resolved,
            FixedClock::new().now(),
        );

        assert!(report.content.contains("\nFTP  false\n"));
        assert!(report.content.contains("\nPRM  priority=3\n"));
        assert!(report.content.contains("\nPRM  ratio=0.75\n"));
        for (_, value) in params.iter() {
            assert!(report.content.contains(&display_value(value)));
        }
    }

    #[test]
    fn test_generate_rejects_control_chars_in_label() {
        let dir = TempDir::new().unwrap();
        let transformer = transformer();

        let err = transformer
            .generate(
                &[sample_record()],
                "X\nEND  FIELDS 9999",
                dir.path(),
                &ReportParameters::default(),
            )
            .unwrap_err();

        assert!(matches!(err, ConvertError::InvalidConfigValueError { .. }));
        assert!(transformer.storage.files.borrow().is_empty());
    }

    #[test]
    fn test_generate_rejects_control_chars_in_field_labels() {
        let dir = TempDir::new().unwrap();
        let mut labels = BTreeMap::new();
        labels.insert("intercept_id".to_string(), "ID\nEND  FIELDS 9999".to_string());
        let transformer = transformer().with_field_labels(labels);

        let err = transformer
            .generate(&[sample_record()], "", dir.path(), &ReportParameters::default())
            .unwrap_err();

        assert!(matches!(err, ConvertError::InvalidConfigValueError { .. }));
        assert!(transformer.storage.files.borrow().is_empty());
    }

    #[test]
    fn test_empty_containers_keep_their_line() {
        let value = serde_json::json!({"bearings": [], "emitter": {}, "tags": [[]]});
        let record = match value {
            Value::Object(map) => InterceptRecord::new(map),
            _ => unreachable!(),
        };
        let params = ReportParameters::default().resolve().unwrap();

        let report = transformer().build_report(
            &record,
            "",
            Path::new("/reports"),
            &params,
            FixedClock::new().now(),
        );

        let lines: Vec<&str> = report.content.lines().collect();
        assert!(lines.contains(&"BEARINGS"));
        assert!(lines.contains(&"EMITTER"));
        assert!(lines.contains(&"TAGS[0]"));
        assert_eq!(*lines.last().unwrap(), "END  FIELDS 0003");
    }
}
