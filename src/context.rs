//! Service context bundling the port trait objects and the injected config.

use crate::adapters::live::{LiveFileSystem, LiveShellExecutor};
use crate::config::GatewayConfig;
use crate::ports::filesystem::FileSystem;
use crate::ports::shell::ShellExecutor;

/// Everything a node needs to run: its external boundaries and the
/// host-supplied configuration.
pub struct ServiceContext {
    /// Filesystem for file I/O.
    pub fs: Box<dyn FileSystem>,
    /// Shell executor for running commands.
    pub shell: Box<dyn ShellExecutor>,
    /// Host settings (home directory, working directory, shell, caps).
    pub config: GatewayConfig,
}

impl ServiceContext {
    /// Creates a context from explicit adapters.
    #[must_use]
    pub fn new(
        fs: Box<dyn FileSystem>,
        shell: Box<dyn ShellExecutor>,
        config: GatewayConfig,
    ) -> Self {
        Self { fs, shell, config }
    }

    /// Creates a live context with real adapters for filesystem and shell.
    #[must_use]
    pub fn live(config: GatewayConfig) -> Self {
        let shell = LiveShellExecutor::from_config(&config);
        Self::new(Box::new(LiveFileSystem), Box::new(shell), config)
    }
}
