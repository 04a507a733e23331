//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use docvault_entity::node::Node;
use docvault_entity::tree::FolderTreeNode;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// One listing line.
#[derive(Debug, Serialize, Tabled)]
pub struct NodeRow {
    /// Node ID
    pub id: String,
    /// Folder or file
    pub kind: &'static str,
    /// Name
    pub name: String,
    /// Size
    pub size: String,
    /// Flags
    pub flags: String,
    /// Created at
    pub created_at: String,
}

impl From<&Node> for NodeRow {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.to_string(),
            kind: if node.is_folder { "folder" } else { "file" },
            name: node.name.clone(),
            size: node.size_bytes.map(human_size).unwrap_or_default(),
            flags: node
                .flags
                .iter()
                .map(|f| f.as_str())
                .collect::<Vec<_>>()
                .join(","),
            created_at: node.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => print_json(&items),
    }
}

/// Print nodes in listing form.
pub fn print_nodes(nodes: &[Node], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            let rows: Vec<NodeRow> = nodes.iter().map(NodeRow::from).collect();
            print_list(&rows, format);
        }
        OutputFormat::Json => print_json(&nodes),
    }
}

/// Print a folder tree as an indented outline.
pub fn print_tree(roots: &[FolderTreeNode], format: OutputFormat) {
    fn walk(node: &FolderTreeNode) {
        println!("{}{}  ({})", "  ".repeat(node.depth), node.name, node.id);
        node.children.iter().for_each(walk);
    }

    match format {
        OutputFormat::Table if roots.is_empty() => println!("No folders."),
        OutputFormat::Table => roots.iter().for_each(walk),
        OutputFormat::Json => print_json(&roots),
    }
}

/// Print a single item in the selected format
pub fn print_item<T: Serialize + std::fmt::Debug>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{item:#?}"),
        OutputFormat::Json => print_json(item),
    }
}

fn print_json<T: Serialize + ?Sized>(item: &T) {
    let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "null".to_string());
    println!("{json}");
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}

/// Render a byte count with a binary unit.
pub fn human_size(bytes: i64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes.max(0) as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
