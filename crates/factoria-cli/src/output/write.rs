use std::fs::{OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// The target existed and `force` was not set.
    Skipped,
}

/// Write a factory file, leaving an existing one alone unless `force`.
pub fn write_factory(path: &Path, contents: &str, force: bool) -> Result<WriteOutcome, CliError> {
    if path.exists() && !force {
        return Ok(WriteOutcome::Skipped);
    }
    write_bytes_atomic(path, contents.as_bytes())?;
    Ok(WriteOutcome::Written)
}

pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), CliError> {
    let mut data = serde_json::to_vec_pretty(value)?;
    data.push(b'\n');
    write_bytes_atomic(path, &data)
}

pub fn write_bytes_atomic(path: &Path, data: &[u8]) -> Result<(), CliError> {
    let parent = path.parent().filter(|parent| !parent.as_os_str().is_empty());
    if let Some(parent) = parent {
        create_dir_all(parent)?;
    }

    let tmp_path = temp_path(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    std::fs::rename(&tmp_path, path)?;
    if let Some(parent) = parent {
        sync_dir(parent)?;
    }

    Ok(())
}

fn temp_path(path: &Path) -> Result<PathBuf, CliError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| CliError::InvalidConfig(format!("invalid output path: {}", path.display())))?;
    let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
    Ok(path.with_file_name(tmp_name))
}

fn sync_dir(path: &Path) -> io::Result<()> {
    let dir = OpenOptions::new().read(true).open(path)?;
    dir.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_dir(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "factoria-{label}-{}-{nanos}",
            std::process::id()
        ))
    }

    #[test]
    fn skips_existing_file_without_force() {
        let dir = scratch_dir("skip");
        let path = dir.join("factories").join("UserFactory.php");

        assert_eq!(
            write_factory(&path, "first", false).expect("first write"),
            WriteOutcome::Written
        );
        assert_eq!(
            write_factory(&path, "second", false).expect("second write"),
            WriteOutcome::Skipped
        );
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "first");

        assert_eq!(
            write_factory(&path, "third", true).expect("forced write"),
            WriteOutcome::Written
        );
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "third");
        assert!(!dir.join("factories").join(".UserFactory.php.tmp").exists());

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn writes_pretty_json_with_trailing_newline() {
        let dir = scratch_dir("json");
        let path = dir.join("schema.json");
        write_json_atomic(&path, &serde_json::json!({ "a": 1 })).expect("write json");
        assert_eq!(
            std::fs::read_to_string(&path).expect("read"),
            "{\n  \"a\": 1\n}\n"
        );
        std::fs::remove_dir_all(&dir).expect("cleanup");
    }
}
