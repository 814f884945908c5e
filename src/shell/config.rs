//! Shell configuration

use std::path::PathBuf;

/// Interactive shell configuration
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Prompt printed before each line
    pub prompt: String,
    /// Graph file loaded before the first command (None = start empty)
    pub startup_file: Option<PathBuf>,
    /// Print the greeting on start
    pub banner: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "graphite> ".to_string(),
            startup_file: None,
            banner: true,
        }
    }
}

impl ShellConfig {
    pub fn with_startup_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.startup_file = Some(path.into());
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }
}
