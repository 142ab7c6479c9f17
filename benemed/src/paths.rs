//! Cross-platform application paths

use crate::error::DaemonError;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppPaths {
    data_dir: PathBuf,
}

impl AppPaths {
    pub fn new() -> Result<Self, DaemonError> {
        let base = dirs::data_dir().ok_or(DaemonError::NoDataDir)?;
        let paths = Self::at(base.join("beneme"));

        // Ensure directory exists
        fs::create_dir_all(&paths.data_dir).map_err(DaemonError::DataDir)?;

        Ok(paths)
    }

    pub fn at(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join("config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_lives_in_data_dir() {
        let p = AppPaths::at(PathBuf::from("/tmp/beneme-test"));
        assert_eq!(p.config_file(), PathBuf::from("/tmp/beneme-test/config.json"));
    }
}
