use serde_json::Value;

use crate::error::{FetchError, Result};

/// One step of a field path.
#[derive(Debug, Clone, Copy)]
pub enum Seg {
    /// Object member by name.
    Key(&'static str),
    /// First element of an array. Search results are ranked by the service,
    /// so the first element is always the one we want.
    First,
}

/// Parse a response body as a JSON document.
pub fn parse(bytes: &[u8]) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(|e| FetchError::malformed(&e))
}

/// Walk `path` down from `root`. Absence at any step is `FieldMissing`
/// carrying the dotted path up to and including the step that failed,
/// which keeps it distinct from a document that never parsed at all.
pub fn lookup<'a>(root: &'a Value, path: &[Seg]) -> Result<&'a Value> {
    let mut node = root;
    for (depth, seg) in path.iter().enumerate() {
        let next = match seg {
            Seg::Key(name) => node.get(name),
            Seg::First => node.get(0),
        };
        node = next.ok_or_else(|| FetchError::FieldMissing {
            path: render(&path[..=depth]),
        })?;
    }
    Ok(node)
}

/// Look up a string leaf and copy it out of the document.
pub fn extract_str(root: &Value, path: &[Seg]) -> Result<String> {
    let node = lookup(root, path)?;
    node.as_str()
        .map(str::to_owned)
        .ok_or_else(|| FetchError::FieldMissing {
            path: render(path),
        })
}

/// Look up an unsigned integer leaf.
pub fn extract_u64(root: &Value, path: &[Seg]) -> Result<u64> {
    let node = lookup(root, path)?;
    node.as_u64().ok_or_else(|| FetchError::FieldMissing {
        path: render(path),
    })
}

fn render(path: &[Seg]) -> String {
    let mut out = String::new();
    for seg in path {
        match seg {
            Seg::Key(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
            Seg::First => out.push_str("[0]"),
        }
    }
    out
}
