//! The merge engine: structural reconciliation of two parsed trees.
//!
//! [merge] walks the base and incoming trees in lock-step and produces a fresh
//! tree. The base document's formatting survives for everything it already holds;
//! properties and items contributed by the incoming document carry their own
//! formatting across. Arrays concatenate rather than reconcile index-wise: a
//! deliberate policy, pinned by the tests below.

use crate::ast::{Array, Content, Object, Property, RootNode, Structure, StructuralKind, Value};
use crate::errors::{Details, ParserResult};
use crate::merge_error;

/// Merge `incoming` into `base`, producing a new tree. Neither input is modified.
/// A mismatch between the two trees' shapes at any path is a hard error naming
/// that path.
pub fn merge(base: &RootNode, incoming: &RootNode) -> ParserResult<RootNode> {
    let value = merge_value(&base.value, &incoming.value, "$")?;
    Ok(RootNode {
        value,
        root_type: base.root_type,
    })
}

/// Merge two wrapped values, keeping the base value's surrounding structure
fn merge_value(base: &Value, incoming: &Value, path: &str) -> ParserResult<Value> {
    let content = merge_content(&base.content, &incoming.content, path)?;
    Ok(Value {
        prefix: base.prefix.clone(),
        content,
        suffix: base.suffix.clone(),
    })
}

fn merge_content(base: &Content, incoming: &Content, path: &str) -> ParserResult<Content> {
    match (base, incoming) {
        (Content::Object(b), Content::Object(m)) => {
            Ok(Content::Object(merge_objects(b, m, path)?))
        }
        (Content::Array(b), Content::Array(m)) => Ok(Content::Array(concatenate_arrays(b, m))),
        // last writer wins at the leaf level
        (Content::Literal(_), _) => Ok(incoming.clone()),
        (b, m) => merge_error!(Details::MergeTypeMismatch {
            path: path.to_string(),
            base: b.kind_name(),
            incoming: m.kind_name(),
        }),
    }
}

/// Reconcile two objects: shared keys merge recursively in place (base ordering and
/// structure slots preserved), new keys append with a comma fix-up at the seam
fn merge_objects(base: &Object, incoming: &Object, path: &str) -> ParserResult<Object> {
    let mut result = base.clone();
    for child in &incoming.children {
        let existing = result
            .children
            .iter()
            .position(|p| p.key.name == child.key.name);
        match existing {
            Some(index) => {
                let child_path = format!("{}.{}", path, child.key.name);
                let merged = merge_content(
                    &result.children[index].value.content,
                    &child.value.content,
                    &child_path,
                )?;
                result.children[index].value.content = merged;
            }
            None => append_property(&mut result, child, incoming),
        }
    }
    Ok(result)
}

/// Append a property contributed by the incoming document. When the base already
/// has children the seam needs fixing up: the previously-last child gains a comma
/// if it lacked one (shedding the whitespace that sat before the closing brace),
/// and the incoming object's trailing structure is transplanted onto the result so
/// the merged document still reads naturally.
fn append_property(result: &mut Object, child: &Property, incoming: &Object) {
    if let Some(last) = result.children.last_mut() {
        if last.has_comma_separator {
            let mut suffix = strip_trailing_whitespace(&result.suffix);
            suffix.extend(incoming.suffix.iter().cloned());
            result.suffix = suffix;
        } else {
            last.has_comma_separator = true;
            last.value.suffix = strip_trailing_whitespace(&last.value.suffix);
            if child.has_comma_separator {
                let mut suffix = strip_trailing_whitespace(&result.suffix);
                suffix.extend(incoming.suffix.iter().cloned());
                result.suffix = suffix;
            }
        }
    }
    result.children.push(child.clone());
}

/// Concatenate two arrays: base children first, incoming children after, with the
/// same comma fix-up at the seam
fn concatenate_arrays(base: &Array, incoming: &Array) -> Array {
    let mut result = base.clone();
    if incoming.children.is_empty() {
        return result;
    }
    if result.children.is_empty() {
        result.children = incoming.children.clone();
        result.suffix = incoming.suffix.clone();
        return result;
    }
    if let Some(last) = result.children.last_mut() {
        if !last.has_comma_separator {
            last.has_comma_separator = true;
            last.suffix = strip_trailing_whitespace(&last.suffix);
        }
    }
    result.children.extend(incoming.children.iter().cloned());
    let mut suffix = strip_trailing_whitespace(&result.suffix);
    suffix.extend(incoming.suffix.iter().cloned());
    result.suffix = suffix;
    result
}

/// Drop trailing whitespace items from a structure slot; comments survive
fn strip_trailing_whitespace(structure: &Structure) -> Structure {
    let mut result = structure.clone();
    while let Some(item) = result.last() {
        if item.kind != StructuralKind::Whitespace {
            break;
        }
        result.pop();
    }
    result
}
