//! Drag payload carried between drag start and drop.

use std::collections::BTreeMap;

use tracing::warn;

use docvault_entity::node::Node;

use crate::upload::IncomingFile;

/// Private MIME type marking an internal node drag.
pub const NODE_PAYLOAD_MIME: &str = "application/x-docvault-node";

/// Typed string entries plus any files dragged in from outside.
#[derive(Debug, Clone, Default)]
pub struct DataTransfer {
    entries: BTreeMap<String, String>,
    files: Vec<IncomingFile>,
}

impl DataTransfer {
    /// Empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Payload of an external drop carrying `files`.
    pub fn with_files(files: Vec<IncomingFile>) -> Self {
        Self {
            entries: BTreeMap::new(),
            files,
        }
    }

    /// Store `value` under `mime_type`, replacing any previous value.
    pub fn set_data(&mut self, mime_type: &str, value: impl Into<String>) {
        self.entries.insert(mime_type.to_string(), value.into());
    }

    /// Value stored under `mime_type`.
    pub fn get_data(&self, mime_type: &str) -> Option<&str> {
        self.entries.get(mime_type).map(String::as_str)
    }

    /// Attach an external file.
    pub fn add_file(&mut self, file: IncomingFile) {
        self.files.push(file);
    }

    /// External files carried by the payload.
    pub fn files(&self) -> &[IncomingFile] {
        &self.files
    }

    /// Take the external files out of the payload.
    pub fn take_files(&mut self) -> Vec<IncomingFile> {
        std::mem::take(&mut self.files)
    }

    /// Write `node` as the internal drag payload.
    pub fn set_node(&mut self, node: &Node) -> Result<(), serde_json::Error> {
        let json = serde_json::to_string(node)?;
        self.set_data(NODE_PAYLOAD_MIME, json);
        Ok(())
    }

    /// Whether the payload carries an internal node.
    pub fn has_node(&self) -> bool {
        self.entries.contains_key(NODE_PAYLOAD_MIME)
    }

    /// Recover the dragged node. A malformed payload yields `None`.
    pub fn node(&self) -> Option<Node> {
        let raw = self.get_data(NODE_PAYLOAD_MIME)?;
        match serde_json::from_str(raw) {
            Ok(node) => Some(node),
            Err(e) => {
                warn!(error = %e, "Discarding malformed drag payload");
                None
            }
        }
    }
}
