use crate::domain::ports::Storage;
use crate::utils::error::{ConvertError, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Storage for LocalStorage {
    fn write_new(&self, path: &Path, data: &[u8]) -> Result<()> {
        let write_error = |source: std::io::Error| ConvertError::WriteError {
            path: path.to_path_buf(),
            source,
        };

        if path.exists() {
            return Err(ConvertError::OutputCollision {
                path: path.to_path_buf(),
            });
        }

        // 先寫入同目錄的暫存檔，完成後再改名，避免留下不完整的報告
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp = NamedTempFile::new_in(dir).map_err(write_error)?;
        temp.write_all(data).map_err(write_error)?;
        temp.as_file().sync_all().map_err(write_error)?;

        temp.persist_noclobber(path).map_err(|e| {
            if e.error.kind() == std::io::ErrorKind::AlreadyExists {
                ConvertError::OutputCollision {
                    path: path.to_path_buf(),
                }
            } else {
                write_error(e.error)
            }
        })?;

        tracing::debug!("Wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_new_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.txt");

        LocalStorage::new().write_new(&path, b"SG5302").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "SG5302");
    }

    #[test]
    fn test_write_new_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.txt");
        std::fs::write(&path, "original").unwrap();

        let err = LocalStorage::new().write_new(&path, b"replacement").unwrap_err();

        assert!(matches!(err, ConvertError::OutputCollision { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn test_write_new_missing_directory_leaves_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("report.txt");

        let err = LocalStorage::new().write_new(&path, b"data").unwrap_err();

        assert!(matches!(err, ConvertError::WriteError { .. }));
        assert!(!path.exists());
    }
}
