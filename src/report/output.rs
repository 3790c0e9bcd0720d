use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{BuildLensError, Result};

/// Byte order mark so spreadsheet tools detect UTF-8.
const UTF8_BOM: &str = "\u{FEFF}";

/// Writes report artifacts into one directory, recording every path written.
pub struct OutputWriter {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl OutputWriter {
    /// Creates the directory (and parents) if it does not exist yet.
    pub fn create(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|source| BuildLensError::Output {
            path: dir.to_path_buf(),
            source,
        })?;

        Ok(Self {
            dir: dir.to_path_buf(),
            written: Vec::new(),
        })
    }

    pub fn write_csv(&mut self, file_name: &str, content: &str) -> Result<()> {
        self.write(file_name, &format!("{UTF8_BOM}{content}"))
    }

    pub fn write(&mut self, file_name: &str, content: &str) -> Result<()> {
        let path = self.dir.join(file_name);
        fs::write(&path, content).map_err(|source| BuildLensError::Output {
            path: path.clone(),
            source,
        })?;

        debug!("Wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }

    pub fn into_written(self) -> Vec<PathBuf> {
        self.written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_nested_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("reports").join("latest");

        let mut writer = OutputWriter::create(&dir).unwrap();
        writer.write("notes.md", "# hi\n").unwrap();

        assert_eq!(fs::read_to_string(dir.join("notes.md")).unwrap(), "# hi\n");
        assert_eq!(writer.into_written(), vec![dir.join("notes.md")]);
    }

    #[test]
    fn test_csv_starts_with_bom() {
        let tmp = tempfile::tempdir().unwrap();
        let mut writer = OutputWriter::create(tmp.path()).unwrap();

        writer.write_csv("table.csv", "a,b\n").unwrap();

        let bytes = fs::read(tmp.path().join("table.csv")).unwrap();
        assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
        assert_eq!(&bytes[3..], b"a,b\n");
    }

    #[test]
    fn test_write_failure_reports_path() {
        let tmp = tempfile::tempdir().unwrap();
        let mut writer = OutputWriter::create(tmp.path()).unwrap();

        let err = writer.write("missing/file.md", "x").unwrap_err();

        match err {
            BuildLensError::Output { path, .. } => {
                assert_eq!(path, tmp.path().join("missing/file.md"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_directory_blocked_by_file() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("taken");
        fs::write(&blocker, "").unwrap();

        assert!(matches!(
            OutputWriter::create(&blocker),
            Err(BuildLensError::Output { .. })
        ));
    }
}
