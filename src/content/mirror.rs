use base64::{engine::general_purpose, Engine as _};
use futures::future::{join_all, BoxFuture, FutureExt};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use super::fetcher::ContentSource;
use super::normalize::{normalize_name, normalize_path};

/// Fields that only matter to the transport and are dropped from file nodes
pub const TRANSPORT_FIELDS: [&str; 7] = ["size", "url", "html_url", "git_url", "download_url", "_links", "sha"];

/// Directory contents keyed by the raw remote name; subdirectories first,
/// then files, each in listing order
pub type MirrorTree = IndexMap<String, MirrorNode>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MirrorNode {
    Directory(MirrorTree),
    File(Map<String, Value>),
}

#[derive(Debug, Deserialize)]
struct ListingEntry {
    #[serde(rename = "type")]
    kind: String,
    name: String,
    url: String,
}

/// Rebuilds a remote directory tree as nested maps.
///
/// Siblings are fetched concurrently; the semaphore caps in-flight requests
/// across the whole traversal. A failed file or subdirectory is left out of
/// its parent, only a failed root listing fails the build.
pub struct MirrorBuilder {
    source: Arc<dyn ContentSource>,
    permits: Semaphore,
}

impl MirrorBuilder {
    pub fn new(source: Arc<dyn ContentSource>, max_concurrent_fetches: usize) -> Self {
        Self {
            source,
            permits: Semaphore::new(max_concurrent_fetches.max(1)),
        }
    }

    pub async fn build(&self, url: &str) -> Option<MirrorTree> {
        self.build_dir(url).await
    }

    fn build_dir<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Option<MirrorTree>> {
        async move {
            let entries = match self.fetch(url).await? {
                Value::Array(entries) => entries,
                other => {
                    warn!("Expected a directory listing at {}, got {}", url, kind_of(&other));
                    return None;
                }
            };

            let mut dirs = Vec::new();
            let mut files = Vec::new();
            for entry in entries {
                match serde_json::from_value::<ListingEntry>(entry) {
                    Ok(e) if e.kind == "dir" => dirs.push(e),
                    Ok(e) if e.kind == "file" => files.push(e),
                    Ok(e) => debug!("Skipping {} entry {}", e.kind, e.name),
                    Err(e) => warn!("Skipping malformed listing entry under {}: {}", url, e),
                }
            }

            let dir_nodes = join_all(dirs.iter().map(|dir| async move {
                let subtree = self.build_dir(&dir.url).await;
                (dir.name.as_str(), subtree.map(MirrorNode::Directory))
            }));
            let file_nodes = join_all(files.iter().map(|file| async move {
                let node = self.build_file(file).await;
                (file.name.as_str(), node.map(MirrorNode::File))
            }));
            let (dir_nodes, file_nodes) = futures::join!(dir_nodes, file_nodes);

            let mut tree = MirrorTree::new();
            for (name, node) in dir_nodes.into_iter().chain(file_nodes) {
                match node {
                    Some(node) => {
                        tree.insert(name.to_string(), node);
                    }
                    None => warn!("Omitting {} from {}", name, url),
                }
            }
            Some(tree)
        }
        .boxed()
    }

    async fn build_file(&self, entry: &ListingEntry) -> Option<Map<String, Value>> {
        let mut file = match self.fetch(&entry.url).await? {
            Value::Object(file) => file,
            other => {
                warn!("Expected a file object at {}, got {}", entry.url, kind_of(&other));
                return None;
            }
        };

        if !entry.name.ends_with(".png") {
            decode_content(&mut file);
        }
        for field in TRANSPORT_FIELDS {
            file.remove(field);
        }

        let name = file.get("name").and_then(Value::as_str).unwrap_or(&entry.name).to_string();
        file.insert("name".to_string(), Value::String(normalize_name(&name)));
        if let Some(path) = file.get("path").and_then(Value::as_str).map(normalize_path) {
            file.insert("path".to_string(), Value::String(path));
        }

        Some(file)
    }

    async fn fetch(&self, url: &str) -> Option<Value> {
        let _permit = self.permits.acquire().await.ok()?;
        self.source.fetch(url).await
    }
}

/// Replace base64 `content` with its UTF-8 text; leaves it untouched if it
/// does not decode.
fn decode_content(file: &mut Map<String, Value>) {
    let Some(Value::String(encoded)) = file.get("content") else {
        return;
    };
    if encoded.is_empty() {
        return;
    }

    // GitHub wraps base64 payloads at 60 columns
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    match general_purpose::STANDARD.decode(compact) {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            file.insert("content".to_string(), Value::String(text));
        }
        Err(e) => warn!("Leaving content encoded: {}", e),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
