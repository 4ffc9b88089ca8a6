//! Text and JSON dumps of the AST.
//!
//! The text form prints one node per line with two spaces of indentation
//! per depth. The JSON form goes through `serde_json` so tooling can
//! consume it directly.

use crate::ast::{AstContext, NodeId};
use crate::error::FrontResult;
use serde_json::{json, Map, Value};

/// Controls which optional fields the dumps include.
#[derive(Clone, Copy, Debug)]
pub struct AstDumpOptions {
    pub include_ids: bool,
    pub include_spans: bool,
}

impl Default for AstDumpOptions {
    fn default() -> Self {
        Self {
            include_ids: true,
            include_spans: true,
        }
    }
}

fn escape_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            _ => result.push(ch),
        }
    }
    result
}

fn dump_text_node(
    context: &AstContext,
    id: NodeId,
    options: &AstDumpOptions,
    out: &mut String,
    depth: usize,
) {
    let node = context.node(id);
    out.push_str(&"  ".repeat(depth));
    out.push_str(node.kind.name());

    if options.include_ids {
        out.push('#');
        out.push_str(&node.id.to_string());
    }

    if !node.value.is_empty() {
        out.push_str(" value=\"");
        out.push_str(&escape_value(&node.value));
        out.push('"');
    }

    if options.include_spans {
        out.push_str(" span=");
        out.push_str(&node.span.to_string());
    }

    out.push('\n');

    for &child in &node.children {
        dump_text_node(context, child, options, out, depth + 1);
    }
}

fn dump_json_node(context: &AstContext, id: NodeId, options: &AstDumpOptions) -> Value {
    let node = context.node(id);
    let mut object = Map::new();

    if options.include_ids {
        object.insert("id".into(), json!(node.id));
    }
    object.insert("kind".into(), json!(node.kind.name()));
    if options.include_spans {
        object.insert(
            "span".into(),
            json!({ "start": node.span.start, "end": node.span.end }),
        );
    }
    if !node.value.is_empty() {
        object.insert("value".into(), json!(node.value));
    }

    let children: Vec<Value> = node
        .children
        .iter()
        .map(|&child| dump_json_node(context, child, options))
        .collect();
    object.insert("children".into(), Value::Array(children));

    Value::Object(object)
}

/// Renders the subtree rooted at `root` as indented text.
pub fn dump_ast_text(context: &AstContext, root: NodeId, options: &AstDumpOptions) -> String {
    let mut out = String::new();
    dump_text_node(context, root, options, &mut out, 0);
    out
}

/// Renders the subtree rooted at `root` as pretty-printed JSON.
pub fn dump_ast_json(
    context: &AstContext,
    root: NodeId,
    options: &AstDumpOptions,
) -> FrontResult<String> {
    let value = dump_json_node(context, root, options);
    Ok(serde_json::to_string_pretty(&value)?)
}
