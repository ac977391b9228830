// Author: Dustin Pilgrim
// License: MIT

use tracing::debug;

use crate::IclError;
use crate::ast::{Document, Node, Position};
use crate::binding::{FieldDescriptor, Record, Scalar, ScalarKind, SlotRef};


/// Build a [`Document`] from a record.
///
/// Annotated fields are written in declaration order. Blocks from a
/// sequence field become repeated top-level statements at the root and a
/// collection inside a block body.
pub fn encode(record: &dyn Record) -> Result<Document, IclError> {
    let schema = record.schema().map_err(|err| IclError::InvalidTarget {
        reason: err.to_string(),
    })?;

    if let Some(field) = schema.params().next() {
        return Err(IclError::ParamOutsideBlock {
            field: field.name.to_string(),
        });
    }

    let mut nodes = Vec::new();
    for node in encode_fields(record, "")? {
        match node {
            Node::Collection(blocks) => nodes.extend(blocks),
            other => nodes.push(other),
        }
    }

    Ok(Document::new(nodes))
}

/// Statements for every keyed field of `record`.
fn encode_fields(record: &dyn Record, path: &str) -> Result<Vec<Node>, IclError> {
    let schema = record.schema()?;
    let mut nodes = Vec::new();

    for (field, descriptor) in schema.tagged() {
        if descriptor.is_param {
            continue;
        }
        let Some(slot) = record.slot(field) else {
            continue;
        };

        let field_path = format!("{}.{}", path, descriptor.key);
        let node = encode_field(slot, descriptor, &field_path).map_err(|err| locate(err, &field_path))?;
        nodes.extend(node);
    }

    Ok(nodes)
}

fn encode_field(
    slot: SlotRef<'_>,
    descriptor: &FieldDescriptor,
    path: &str,
) -> Result<Option<Node>, IclError> {
    let key = descriptor.key.as_str();
    let precision = descriptor.float_precision;

    if descriptor.env_default.is_some() && !matches!(slot, SlotRef::Scalar(_)) {
        return Err(IclError::EnvNotAllowed {
            shape: shape_name(&slot).to_string(),
        });
    }

    let node = match slot {
        SlotRef::Scalar(scalar) => {
            let value = match (scalar.get(), &descriptor.env_default) {
                (None, _) => Node::null(),
                (Some(_), Some(name)) => {
                    debug!(key, name = %name, "writing env reference in place of value");
                    Node::envar(name.as_str())
                }
                (Some(value), None) => scalar.kind().to_node(&value, precision)?,
            };
            Some(Node::assignment(key, value))
        }
        SlotRef::Sequence(seq) => {
            let kind = seq.kind();
            let elements = seq
                .items()
                .iter()
                .map(|item| kind.to_node(item, precision))
                .collect::<Result<Vec<_>, _>>()?;
            Some(Node::assignment(
                key,
                Node::Array {
                    elements,
                    pos: Position::default(),
                },
            ))
        }
        SlotRef::Mapping(map) => {
            let kind = map.kind();
            let mut entries = map.entries();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let entries = entries
                .into_iter()
                .map(|(k, v)| Ok((Node::string(k), kind.to_node(&v, precision)?)))
                .collect::<Result<Vec<_>, IclError>>()?;
            Some(Node::assignment(
                key,
                Node::Map {
                    entries,
                    pos: Position::default(),
                },
            ))
        }
        SlotRef::Record(inner) => Some(encode_block(key, inner, path)?),
        SlotRef::OptionalRecord(slot) => match slot.get() {
            Some(inner) => Some(encode_block(key, inner, path)?),
            None => None,
        },
        SlotRef::Records(seq) => {
            let blocks = seq
                .records()
                .into_iter()
                .map(|inner| encode_block(key, inner, path))
                .collect::<Result<Vec<_>, _>>()?;
            Some(Node::Collection(blocks))
        }
        SlotRef::Unsupported(shape) => {
            return Err(IclError::UnsupportedFieldShape {
                shape: shape.to_string(),
            });
        }
    };

    Ok(node)
}

/// A block whose parameters come from the record's `.param` fields and
/// whose body holds the rest.
fn encode_block(key: &str, record: &dyn Record, path: &str) -> Result<Node, IclError> {
    let schema = record.schema()?;

    let mut params = Vec::with_capacity(schema.param_count());
    for field in schema.params() {
        match record.slot(field.name) {
            Some(SlotRef::Scalar(slot)) if slot.kind() == ScalarKind::String => {
                let value = match slot.get() {
                    Some(Scalar::String(s)) => s,
                    _ => String::new(),
                };
                params.push(value);
            }
            _ => {
                return Err(IclError::NonStringParam {
                    field: field.name.to_string(),
                });
            }
        }
    }

    let body = encode_fields(record, path)?;
    Ok(Node::block(key, params, body))
}

fn shape_name(slot: &SlotRef<'_>) -> &'static str {
    match slot {
        SlotRef::Scalar(_) => "scalar",
        SlotRef::Sequence(_) => "sequence",
        SlotRef::Mapping(_) => "map",
        SlotRef::Record(_) | SlotRef::OptionalRecord(_) => "block",
        SlotRef::Records(_) => "block sequence",
        SlotRef::Unsupported(shape) => *shape,
    }
}

/// Encoder errors carry the field path. There is no source text, so the
/// position is always the origin.
fn locate(err: IclError, path: &str) -> IclError {
    if err.is_located() {
        return err;
    }
    IclError::Located {
        path: path.to_string(),
        line: 0,
        column: 0,
        source: Box::new(err),
    }
}
