use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

pub const PROMPT_FILE_PREFIX: &str = "sys_prompt_v";
pub const PROMPT_FILE_SUFFIX: &str = ".md";

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Prompt not found: {0}")]
    NotFound(String),

    #[error("Invalid prompt name: {0}")]
    InvalidName(String),

    #[error("Failed to read prompts: {0}")]
    Io(#[from] io::Error),
}

/// A directory of system prompt files.
#[derive(Debug, Clone)]
pub struct PromptStore {
    dir: PathBuf,
}

impl PromptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Names of the selectable prompts (`sys_prompt_v*.md`), sorted.
    pub fn list(&self) -> Result<Vec<String>, PromptError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            // Non UTF-8 names can never be requested back through the api
            let Some(name) = entry.file_name().to_str().map(String::from) else {
                continue;
            };
            if is_prompt_file(&name) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Read a prompt by file name.
    pub fn read(&self, name: &str) -> Result<String, PromptError> {
        let path = self.resolve(name)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(PromptError::NotFound(name.to_string()))
            }
            Err(e) => Err(PromptError::Io(e)),
        }
    }

    // Only a single plain component is accepted so a name can never leave the directory
    fn resolve(&self, name: &str) -> Result<PathBuf, PromptError> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) if part == name => Ok(self.dir.join(part)),
            _ => Err(PromptError::InvalidName(name.to_string())),
        }
    }
}

fn is_prompt_file(name: &str) -> bool {
    name.starts_with(PROMPT_FILE_PREFIX) && name.ends_with(PROMPT_FILE_SUFFIX)
}
