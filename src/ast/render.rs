use super::*;
use crate::utils::{indent, quote};

pub(super) fn render_document(doc: &Document) -> String {
    let mut out = String::new();
    for node in &doc.nodes {
        push_statement(&mut out, node, 0);
    }
    out
}

/// Write one statement at `depth` followed by a newline. Collections expand
/// into one statement per element so an empty collection writes nothing.
fn push_statement(out: &mut String, node: &Node, depth: usize) {
    if let Node::Collection(nodes) = node {
        for node in nodes {
            push_statement(out, node, depth);
        }
        return;
    }

    out.push_str(&indent(depth));
    out.push_str(&render_at(node, depth));
    out.push('\n');
}

pub(super) fn render_node(node: &Node) -> String {
    render_at(node, 0)
}

/// Render `node` as if it starts on a line indented to `depth`. Only lines
/// the renderer opens itself get a prefix, so string contents stay as is.
fn render_at(node: &Node, depth: usize) -> String {
    match node {
        Node::Identifier { name, .. } => name.clone(),
        Node::Number { text, .. } => text.clone(),
        Node::String { value, .. } => quote(value),
        Node::Boolean { value, .. } => value.to_string(),
        Node::Null { .. } => "null".to_string(),
        Node::Envar { name, .. } => format!("env({})", name),
        Node::Array { elements, .. } => {
            let items: Vec<String> = elements.iter().map(|e| render_at(e, depth)).collect();
            format!("[{}]", items.join(", "))
        }
        Node::Map { entries, .. } => render_map(entries, depth),
        Node::Assignment(assign) => {
            format!("{} = {}", assign.name, render_at(&assign.value, depth))
        }
        Node::Block(block) => render_block(block, depth),
        Node::Collection(nodes) => {
            let items: Vec<String> = nodes.iter().map(|n| render_at(n, depth)).collect();
            items.join(&format!("\n{}", indent(depth)))
        }
    }
}

/// Entries are written one per line, ordered by their rendered key so
/// output does not depend on how the map was built.
fn render_map(entries: &[(Node, Node)], depth: usize) -> String {
    let mut lines: Vec<(String, String)> = entries
        .iter()
        .map(|(key, value)| (render_at(key, depth + 1), render_at(value, depth + 1)))
        .collect();
    lines.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = String::from("{\n");
    for (key, value) in lines {
        out.push_str(&indent(depth + 1));
        out.push_str(&format!("{}: {},\n", key, value));
    }
    out.push_str(&indent(depth));
    out.push('}');
    out
}

fn render_block(block: &Block, depth: usize) -> String {
    let mut out = block.key.clone();
    for param in &block.parameters {
        out.push(' ');
        out.push_str(&quote(&param.value));
    }
    out.push_str(" {\n");
    for stmt in &block.body.statements {
        push_statement(&mut out, stmt, depth + 1);
    }
    out.push_str(&indent(depth));
    out.push('}');
    out
}
