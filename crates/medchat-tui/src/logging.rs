//! Log setup. The terminal belongs to the UI, so records go to a file.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::Result;
use env_logger::{Env, Target, WriteStyle};
use medchat_core::Config;

/// Route `log` records to the configured file. `RUST_LOG` sets the filter,
/// `info` by default.
pub fn init(config: &Config) -> Result<PathBuf> {
    let path = config.log_path()?;
    let file = open_log_file(&path)?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .write_style(WriteStyle::Never)
        .try_init()?;

    Ok(path)
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_open_log_file_creates_directories_and_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("medchat.log");

        writeln!(open_log_file(&path).unwrap(), "first").unwrap();
        writeln!(open_log_file(&path).unwrap(), "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
