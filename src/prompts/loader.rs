use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::templates::TRUTH_PACK_DEFAULT;
use crate::types::Suspect;

/// Loads case and suspect data from the filesystem with fallback to defaults
pub struct PromptLoader {
    data_path: PathBuf,
}

impl PromptLoader {
    pub fn new(data_path: impl AsRef<Path>) -> Self {
        Self {
            data_path: data_path.as_ref().to_path_buf(),
        }
    }

    fn suspects_dir(&self) -> PathBuf {
        self.data_path.join("suspects")
    }

    /// Load the shared truth pack, using the default if the file doesn't exist
    pub fn load_truth_pack(&self) -> Result<String> {
        let path = self.data_path.join("case").join("truth_pack.md");
        if path.exists() {
            log::debug!("Loading truth pack from: {:?}", path);
            return fs::read_to_string(&path)
                .with_context(|| format!("Failed to read truth pack {:?}", path));
        }

        log::debug!("Using default truth pack");
        Ok(TRUTH_PACK_DEFAULT.to_string())
    }

    /// Load a prompt section override from `prompts/<name>.md`, or the given default
    pub fn load_section(&self, name: &str, default: &str) -> Result<String> {
        let path = self.data_path.join("prompts").join(format!("{}.md", name));
        if path.exists() {
            log::debug!("Loading prompt section '{}' from: {:?}", name, path);
            return fs::read_to_string(&path)
                .with_context(|| format!("Failed to read prompt '{}'", name));
        }
        Ok(default.to_string())
    }

    /// Load one suspect from `suspects/<id>/`
    pub fn load_suspect(&self, id: &str) -> Result<Suspect> {
        let dir = self.suspects_dir().join(id);
        if !dir.is_dir() {
            anyhow::bail!("Unknown suspect '{}': {:?} is not a directory", id, dir);
        }

        let sheet_path = dir.join("sheet.md");
        let sheet = if sheet_path.exists() {
            fs::read_to_string(&sheet_path)
                .with_context(|| format!("Failed to read sheet {:?}", sheet_path))?
        } else {
            log::warn!("Suspect '{}' has no sheet.md", id);
            String::new()
        };

        let core_path = dir.join("core.json");
        let core_statements: Vec<String> = if core_path.exists() {
            let content = fs::read_to_string(&core_path)
                .with_context(|| format!("Failed to read {:?}", core_path))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse core statements {:?}", core_path))?
        } else {
            Vec::new()
        };

        Ok(Suspect::new(id, id)
            .with_core_statements(core_statements)
            .with_sheet(sheet))
    }

    /// Lists suspect ids (directory names under `suspects/`), sorted
    pub fn list_suspects(&self) -> Result<Vec<String>> {
        let dir = self.suspects_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(&dir).with_context(|| format!("Failed to list {:?}", dir))? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                ids.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        ids.sort();
        Ok(ids)
    }
}
