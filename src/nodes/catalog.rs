//! Registry of the nodes this crate exposes to a workflow host.
//!
//! Input defaults are read from each node's `Default` input so the
//! catalog cannot drift from what the nodes actually do.

use clap::ValueEnum;
use serde::Serialize;
use serde_json::{json, Value};

use crate::encoding::{ReadEncoding, TextEncoding};
use crate::nodes::browse::BrowseInput;
use crate::nodes::delete::DeleteInput;
use crate::nodes::exec::{ExecInput, TIMEOUT_RANGE};
use crate::nodes::mkdir::MkdirInput;
use crate::nodes::read::{ReadInput, MAX_SIZE_MB_RANGE};
use crate::nodes::write::WriteInput;

/// Host category shared by every node.
pub const CATEGORY: &str = "utilities/file_browser";

/// Declared type of one node input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputKind {
    /// Free text; `multiline` for bodies such as file content or scripts.
    String {
        /// Rendered as a text area.
        multiline: bool,
    },
    /// Boolean toggle.
    Boolean,
    /// Bounded integer.
    Int {
        /// Smallest accepted value.
        min: u64,
        /// Largest accepted value.
        max: u64,
    },
    /// Closed set of choices.
    Choice {
        /// Accepted values.
        options: Vec<String>,
    },
}

/// One declared input of a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputSpec {
    /// Input name.
    pub name: &'static str,
    /// Declared type.
    #[serde(flatten)]
    pub kind: InputKind,
    /// Default value.
    pub default: Value,
}

/// Registration record of one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDescriptor {
    /// Class name the host registers.
    pub class_name: &'static str,
    /// Human-facing name.
    pub display_name: &'static str,
    /// Host category.
    pub category: &'static str,
    /// Entry point name.
    pub function: &'static str,
    /// Declared inputs.
    pub inputs: Vec<InputSpec>,
    /// Output names, in order.
    pub outputs: Vec<&'static str>,
    /// Whether the host treats the node as a graph sink.
    pub output_node: bool,
}

fn text(name: &'static str, default: &str) -> InputSpec {
    InputSpec { name, kind: InputKind::String { multiline: false }, default: json!(default) }
}

fn multiline(name: &'static str, default: &str) -> InputSpec {
    InputSpec { name, kind: InputKind::String { multiline: true }, default: json!(default) }
}

fn boolean(name: &'static str, default: bool) -> InputSpec {
    InputSpec { name, kind: InputKind::Boolean, default: json!(default) }
}

fn int(name: &'static str, min: u64, max: u64, default: u64) -> InputSpec {
    InputSpec { name, kind: InputKind::Int { min, max }, default: json!(default) }
}

fn choice(name: &'static str, options: &[String], default: String) -> InputSpec {
    InputSpec { name, kind: InputKind::Choice { options: options.to_vec() }, default: json!(default) }
}

fn node(
    class_name: &'static str,
    display_name: &'static str,
    function: &'static str,
    inputs: Vec<InputSpec>,
    outputs: Vec<&'static str>,
) -> NodeDescriptor {
    NodeDescriptor {
        class_name,
        display_name,
        category: CATEGORY,
        function,
        inputs,
        outputs,
        output_node: true,
    }
}

/// Every node, in registration order.
#[must_use]
pub fn catalog() -> Vec<NodeDescriptor> {
    let browse = BrowseInput::default();
    let read = ReadInput::default();
    let write = WriteInput::default();
    let exec = ExecInput::default();
    let mkdir = MkdirInput::default();
    let delete = DeleteInput::default();

    let read_encodings: Vec<String> =
        ReadEncoding::value_variants().iter().map(ToString::to_string).collect();
    let text_encodings: Vec<String> =
        TextEncoding::value_variants().iter().map(ToString::to_string).collect();

    vec![
        node(
            "FileBrowser",
            "File Browser",
            "browse_files",
            vec![
                text("directory_path", &browse.directory_path),
                boolean("show_hidden", browse.show_hidden),
                text("filter_pattern", &browse.filter_pattern),
            ],
            vec!["files_json", "directories_json", "current_path"],
        ),
        node(
            "FileReader",
            "File Reader",
            "read_file",
            vec![
                text("file_path", &read.file_path),
                choice("encoding", &read_encodings, read.encoding.to_string()),
                int(
                    "max_size_mb",
                    u64::from(*MAX_SIZE_MB_RANGE.start()),
                    u64::from(*MAX_SIZE_MB_RANGE.end()),
                    u64::from(read.max_size_mb),
                ),
            ],
            vec!["content", "file_info"],
        ),
        node(
            "FileWriter",
            "File Writer (Upload)",
            "write_file",
            vec![
                text("file_path", &write.file_path),
                multiline("content", &write.content),
                choice("encoding", &text_encodings, write.encoding.to_string()),
                boolean("overwrite", write.overwrite),
            ],
            vec!["status", "file_info"],
        ),
        node(
            "FileCopy",
            "File Copy (Download/Upload)",
            "copy_file",
            vec![
                text("source_path", ""),
                text("destination_path", ""),
                boolean("overwrite", false),
            ],
            vec!["status", "file_info"],
        ),
        node(
            "ShellExecutor",
            "Shell Executor",
            "execute_command",
            vec![
                multiline("command", &exec.command),
                text("working_directory", &exec.working_directory),
                int(
                    "timeout_seconds",
                    *TIMEOUT_RANGE.start(),
                    *TIMEOUT_RANGE.end(),
                    exec.timeout_seconds,
                ),
                boolean("capture_output", exec.capture_output),
            ],
            vec!["stdout", "stderr", "return_code"],
        ),
        node(
            "DirectoryCreator",
            "Directory Creator",
            "create_directory",
            vec![
                text("directory_path", &mkdir.directory_path),
                boolean("create_parents", mkdir.create_parents),
            ],
            vec!["status", "directory_info"],
        ),
        node(
            "FileDelete",
            "File Delete",
            "delete_file",
            vec![
                text("file_path", &delete.file_path),
                boolean("confirm_delete", delete.confirm_delete),
            ],
            vec!["status"],
        ),
    ]
}
