// Author: Dustin Pilgrim
// License: MIT

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::IclError;
use crate::ast::{Block, Document, Node, Position};
use crate::config::parse_file;

/// Export a parsed document to pretty-printed JSON.
///
/// - Strings, booleans and `null` map directly
/// - Numbers become JSON numbers when they parse as one, strings otherwise
/// - Identifiers export as their name and `env(NAME)` as `{"env": "NAME"}`
/// - Arrays map to arrays, maps to objects keyed by the key's text
/// - Blocks become `{"parameters": [...], "position": {...}, "body": {...}}`
///
/// A key that appears more than once in the same scope (repeated blocks)
/// exports as an array of its entries, in document order.
///
/// # Examples
/// ```
/// use icl::{export, parse};
///
/// let doc = parse("port = 80\nsrv \"a\" {\n    on = true\n}")?;
/// let json = export::document_to_json(&doc)?;
/// assert!(json.contains("\"parameters\""));
/// # Ok::<(), icl::IclError>(())
/// ```
pub fn document_to_json(doc: &Document) -> Result<String, IclError> {
    let value = statements_to_json(&doc.nodes)?;
    serde_json::to_string_pretty(&value).map_err(export_error)
}

/// Read, parse and export a document file in one call.
///
/// # Errors
/// Returns an error if the file can't be read or doesn't parse.
pub fn export_file<P: AsRef<Path>>(path: P) -> Result<String, IclError> {
    let doc = parse_file(path)?;
    document_to_json(&doc)
}

fn export_error(err: serde_json::Error) -> IclError {
    IclError::Export {
        message: err.to_string(),
    }
}

fn statements_to_json(nodes: &[Node]) -> Result<Value, IclError> {
    let mut out = Map::new();
    for node in nodes {
        match node {
            Node::Assignment(assign) => insert_entry(&mut out, &assign.name, node_to_json(&assign.value)?),
            Node::Block(block) => insert_entry(&mut out, &block.key, block_to_json(block)?),
            Node::Collection(blocks) => {
                for block in blocks {
                    if let Node::Block(block) = block {
                        insert_entry(&mut out, &block.key, block_to_json(block)?);
                    }
                }
            }
            _ => {}
        }
    }
    Ok(Value::Object(out))
}

/// Insert under `key`, turning the value into an array on repeats.
fn insert_entry(out: &mut Map<String, Value>, key: &str, value: Value) {
    match out.get_mut(key) {
        Some(Value::Array(entries)) if entries.first().is_some_and(is_block_json) => {
            entries.push(value);
        }
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            out.insert(key.to_string(), value);
        }
    }
}

fn is_block_json(value: &Value) -> bool {
    value.get("parameters").is_some() && value.get("body").is_some()
}

#[derive(Serialize)]
struct BlockJson<'a> {
    parameters: Vec<&'a str>,
    position: Position,
    body: Value,
}

fn block_to_json(block: &Block) -> Result<Value, IclError> {
    let entry = BlockJson {
        parameters: block.parameters.iter().map(|p| p.value.as_str()).collect(),
        position: block.pos,
        body: statements_to_json(&block.body.statements)?,
    };
    serde_json::to_value(entry).map_err(export_error)
}

fn node_to_json(node: &Node) -> Result<Value, IclError> {
    let value = match node {
        Node::String { value, .. } => json!(value),
        Node::Boolean { value, .. } => json!(value),
        Node::Null { .. } => Value::Null,
        Node::Number { text, .. } => text
            .parse::<i64>()
            .map(Value::from)
            .or_else(|_| text.parse::<u64>().map(Value::from))
            .ok()
            .or_else(|| text.parse::<f64>().ok().and_then(|f| serde_json::Number::from_f64(f).map(Value::Number)))
            .unwrap_or_else(|| json!(text)),
        Node::Identifier { name, .. } => json!(name),
        Node::Envar { name, .. } => json!({ "env": name }),
        Node::Array { elements, .. } => {
            Value::Array(elements.iter().map(node_to_json).collect::<Result<_, _>>()?)
        }
        Node::Map { entries, .. } => {
            let mut out = Map::new();
            for (key, value) in entries {
                let key = match key {
                    Node::String { value, .. } => value.clone(),
                    Node::Identifier { name, .. } => name.clone(),
                    other => other.to_string(),
                };
                out.insert(key, node_to_json(value)?);
            }
            Value::Object(out)
        }
        Node::Assignment(_) | Node::Block(_) | Node::Collection(_) => {
            statements_to_json(std::slice::from_ref(node))?
        }
    };
    Ok(value)
}
