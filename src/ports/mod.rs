//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the gateway nodes and an
//! external system (filesystem, shell). Implementations live in
//! `src/adapters/`.

pub mod filesystem;
pub mod shell;

pub use filesystem::FileSystem;
pub use shell::{ShellExecutor, ShellOutput, ShellRequest, TIMEOUT_EXIT_CODE};
