//! Gateway configuration injected into every operation.
//!
//! Values are resolved once at startup (defaults, then an optional YAML
//! file, then `FILEGATE_*` environment variables) and handed to operations
//! through [`crate::context::ServiceContext`]. Operations never consult the
//! environment themselves.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::path;

const DEFAULT_MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_KILL_GRACE_MS: u64 = 500;

/// Host-supplied settings for path resolution and command execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Directory substituted for a leading `~`.
    pub home_dir: PathBuf,
    /// Base directory for relative paths.
    pub working_dir: PathBuf,
    /// When set, resolved paths must stay inside this directory.
    pub root: Option<PathBuf>,
    /// Shell interpreter program.
    pub shell: String,
    /// Arguments placed before the command text.
    pub shell_args: Vec<String>,
    /// Cap on each captured output stream, in bytes.
    pub max_output_bytes: usize,
    /// Time between the polite and the forced kill of a timed-out command.
    pub kill_grace_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        let (shell, shell_args) = default_shell();
        Self {
            home_dir: dirs::home_dir().unwrap_or_else(|| PathBuf::from("/")),
            working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/")),
            root: None,
            shell,
            shell_args,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
            kill_grace_ms: DEFAULT_KILL_GRACE_MS,
        }
    }
}

#[cfg(windows)]
fn default_shell() -> (String, Vec<String>) {
    ("cmd".to_string(), vec!["/C".to_string()])
}

#[cfg(not(windows))]
fn default_shell() -> (String, Vec<String>) {
    ("/bin/sh".to_string(), vec!["-c".to_string()])
}

impl GatewayConfig {
    /// Loads configuration from an optional YAML file and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the file cannot be read or parsed,
    /// or an environment override is malformed.
    pub fn load(file: Option<&Path>) -> Result<Self, GatewayError> {
        let base = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base.with_overrides(|key| std::env::var(key).ok())?;
        let cwd = std::env::current_dir()
            .map_err(|e| GatewayError::Config(format!("cannot determine current directory: {e}")))?;
        Ok(config.anchored_at(&cwd))
    }

    /// Makes the home, working and root directories absolute by joining
    /// relative ones onto `base`, then folds their `.`/`..` segments.
    #[must_use]
    pub fn anchored_at(mut self, base: &Path) -> Self {
        let anchor = |dir: &Path| path::normalize(&base.join(dir));
        self.home_dir = anchor(&self.home_dir);
        self.working_dir = anchor(&self.working_dir);
        self.root = self.root.as_deref().map(anchor);
        self
    }

    /// Reads a YAML config file; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, GatewayError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GatewayError::Config(format!("failed to read config {}: {e}", path.display()))
        })?;
        serde_yaml::from_str(&content).map_err(|e| {
            GatewayError::Config(format!("failed to parse config {}: {e}", path.display()))
        })
    }

    /// Applies `FILEGATE_*` overrides looked up through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if a numeric override does not parse.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, GatewayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(home) = lookup("FILEGATE_HOME") {
            self.home_dir = PathBuf::from(home);
        }
        if let Some(dir) = lookup("FILEGATE_WORKDIR") {
            self.working_dir = PathBuf::from(dir);
        }
        if let Some(root) = lookup("FILEGATE_ROOT") {
            self.root = (!root.is_empty()).then(|| PathBuf::from(root));
        }
        if let Some(shell) = lookup("FILEGATE_SHELL") {
            self.shell = shell;
        }
        if let Some(raw) = lookup("FILEGATE_MAX_OUTPUT_BYTES") {
            self.max_output_bytes = parse_number("FILEGATE_MAX_OUTPUT_BYTES", &raw)?;
        }
        if let Some(raw) = lookup("FILEGATE_KILL_GRACE_MS") {
            self.kill_grace_ms = parse_number("FILEGATE_KILL_GRACE_MS", &raw)?;
        }
        Ok(self)
    }

    /// Grace period as a [`Duration`].
    #[must_use]
    pub fn kill_grace(&self) -> Duration {
        Duration::from_millis(self.kill_grace_ms)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, GatewayError> {
    raw.trim()
        .parse()
        .map_err(|_| GatewayError::Config(format!("{key} must be a non-negative integer, got {raw:?}")))
}
