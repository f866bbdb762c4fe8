use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::outliner::Organizer;

/// TOML data file holding the task tree and the free events
pub struct Storage {
    file_path: PathBuf,
}

impl Storage {
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Load the organizer; a missing file is an empty organizer
    pub fn load(&self) -> Result<Organizer> {
        if !self.file_path.exists() {
            info!(path = %self.file_path.display(), "data file not found, starting empty");
            return Ok(Organizer::new());
        }

        let content = fs::read_to_string(&self.file_path)
            .with_context(|| format!("failed to read {}", self.file_path.display()))?;
        let data: Organizer = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", self.file_path.display()))?;
        info!(
            path = %self.file_path.display(),
            tasks = data.tasks().len(),
            items = data.timetable().len(),
            "loaded data file"
        );
        Ok(data)
    }

    pub fn save(&self, data: &Organizer) -> Result<()> {
        let content = toml::to_string_pretty(data)?;
        fs::write(&self.file_path, content)
            .with_context(|| format!("failed to write {}", self.file_path.display()))?;
        info!(path = %self.file_path.display(), "saved data file");
        Ok(())
    }
}
