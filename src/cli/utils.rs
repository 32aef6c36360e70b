use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::content::{MirrorNode, MirrorTree};

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(object)) = (data, response.as_object_mut()) {
                object.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Print a mirrored tree as an indented outline
pub fn write_tree_text(tree: &MirrorTree, depth: usize) {
    let indent = "  ".repeat(depth);
    for (name, node) in tree {
        match node {
            MirrorNode::Directory(children) => {
                println!("{}{}/", indent, name);
                write_tree_text(children, depth + 1);
            }
            MirrorNode::File(file) => {
                let slug = file.get("path").and_then(Value::as_str).unwrap_or_default();
                println!("{}{} -> {}", indent, name, slug);
            }
        }
    }
}
