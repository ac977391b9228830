// Author: Dustin Pilgrim
// License: MIT

use std::collections::HashSet;

use tracing::trace;

use crate::IclError;
use crate::ast::{Assignment, Block, Document, Node, Position};
use crate::binding::{Record, Scalar, ScalarKind, ScalarSlot, SlotMut};
use crate::resolver::{EnvSource, ProcessEnv};


/// Handle of a record instance being filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrameId(usize);

/// Bookkeeping for one record instance.
#[derive(Debug, Default)]
struct Frame {
    /// Keys of singular blocks already decoded into this instance.
    assigned: HashSet<String>,
    /// Block parameters bound so far.
    params_bound: usize,
}

/// Fills a record from a [`Document`].
///
/// Keys with no matching field are skipped. The first error aborts the
/// decode and is reported with the dotted field path and the position of
/// the node being read.
pub struct Decoder<'e> {
    env: &'e dyn EnvSource,
    frames: Vec<Frame>,
    last_pos: Position,
}

impl<'e> Decoder<'e> {
    pub fn new(env: &'e dyn EnvSource) -> Self {
        Self {
            env,
            frames: Vec::new(),
            last_pos: Position::default(),
        }
    }

    pub fn decode(mut self, doc: &Document, target: &mut dyn Record) -> Result<(), IclError> {
        target.schema().map_err(|err| IclError::InvalidTarget {
            reason: err.to_string(),
        })?;

        let root = self.enter();
        self.decode_statements(&doc.nodes, target, root, "")
    }

    fn enter(&mut self) -> FrameId {
        self.frames.push(Frame::default());
        FrameId(self.frames.len() - 1)
    }

    fn frame(&mut self, id: FrameId) -> &mut Frame {
        &mut self.frames[id.0]
    }

    fn decode_statements(
        &mut self,
        nodes: &[Node],
        record: &mut dyn Record,
        frame: FrameId,
        path: &str,
    ) -> Result<(), IclError> {
        for node in nodes {
            match node {
                Node::Assignment(assign) => self.decode_assignment(assign, record, path)?,
                Node::Block(block) => self.decode_block(block, record, frame, path)?,
                other => trace!(kind = other.kind_name(), path, "skipping non-statement node"),
            }
        }
        Ok(())
    }

    fn decode_assignment(
        &mut self,
        assign: &Assignment,
        record: &mut dyn Record,
        path: &str,
    ) -> Result<(), IclError> {
        let schema = record.schema()?;
        let Some((field, _)) = schema.lookup(&assign.name) else {
            trace!(key = %assign.name, record = schema.record(), "no field for key");
            return Ok(());
        };
        let Some(slot) = record.slot_mut(field) else {
            return Ok(());
        };

        let field_path = format!("{}.{}", path, assign.name);
        self.last_pos = assign.pos;
        self.assign(slot, &assign.value)
            .map_err(|err| self.locate(err, &field_path))
    }

    fn assign(&mut self, slot: SlotMut<'_>, value: &Node) -> Result<(), IclError> {
        self.last_pos = value.position();
        let expected = slot.shape_name();

        match slot {
            SlotMut::Scalar(slot) => self.assign_scalar(slot, value),
            SlotMut::Sequence(seq) => {
                let Node::Array { elements, .. } = value else {
                    return Err(mismatch(expected, value));
                };
                for element in elements {
                    self.last_pos = element.position();
                    let scalar = self.coerce(seq.kind(), element)?;
                    if !seq.push(scalar) {
                        return Err(mismatch(seq.kind().to_string(), element));
                    }
                }
                Ok(())
            }
            SlotMut::Mapping(map) => {
                let Node::Map { entries, .. } = value else {
                    return Err(mismatch(expected, value));
                };
                for (key, entry) in entries {
                    self.last_pos = key.position();
                    let key = match key {
                        Node::String { value, .. } => value.clone(),
                        Node::Identifier { name, .. } => name.clone(),
                        _ => return Err(IclError::MapKeyType),
                    };
                    self.last_pos = entry.position();
                    let scalar = self.coerce(map.kind(), entry)?;
                    if !map.insert(key, scalar) {
                        return Err(mismatch(map.kind().to_string(), entry));
                    }
                }
                Ok(())
            }
            SlotMut::Unsupported(shape) => Err(IclError::UnsupportedFieldShape {
                shape: shape.to_string(),
            }),
            SlotMut::Record(_) | SlotMut::OptionalRecord(_) | SlotMut::Records(_) => {
                Err(mismatch(expected, value))
            }
        }
    }

    fn assign_scalar(&self, slot: &mut dyn ScalarSlot, value: &Node) -> Result<(), IclError> {
        if let Node::Null { .. } = value {
            if slot.is_optional() {
                slot.clear();
                return Ok(());
            }
            return Err(mismatch(slot.kind().to_string(), value));
        }

        let scalar = self.coerce(slot.kind(), value)?;
        if slot.set(scalar) {
            Ok(())
        } else {
            Err(mismatch(slot.kind().to_string(), value))
        }
    }

    /// Convert a literal or `env(...)` node into a scalar of `kind`.
    fn coerce(&self, kind: ScalarKind, node: &Node) -> Result<Scalar, IclError> {
        match node {
            Node::String { value, .. } if kind == ScalarKind::String => {
                Ok(Scalar::String(value.clone()))
            }
            Node::Boolean { value, .. } if kind == ScalarKind::Bool => Ok(Scalar::Bool(*value)),
            Node::Number { text, .. } if kind.is_integer() || kind.is_float() => {
                kind.parse_number(text)
            }
            Node::Envar { name, .. } => {
                let raw = self.env.lookup(name);
                trace!(name = %name, kind = %kind, "resolved env reference");
                kind.parse_text(&raw)
            }
            other => Err(mismatch(kind.to_string(), other)),
        }
    }

    fn decode_block(
        &mut self,
        block: &Block,
        record: &mut dyn Record,
        frame: FrameId,
        path: &str,
    ) -> Result<(), IclError> {
        let schema = record.schema()?;
        let Some((field, _)) = schema.lookup(&block.key) else {
            trace!(key = %block.key, record = schema.record(), "no field for block");
            return Ok(());
        };
        let Some(slot) = record.slot_mut(field) else {
            return Ok(());
        };

        let field_path = format!("{}.{}", path, block.key);
        self.last_pos = block.pos;

        let result = match slot {
            SlotMut::Records(seq) => {
                seq.append_with(&mut |inner| self.fill_block(block, inner, &field_path))
            }
            SlotMut::Record(inner) => self
                .claim(frame, &block.key)
                .and_then(|()| self.fill_block(block, inner, &field_path)),
            SlotMut::OptionalRecord(slot) => self
                .claim(frame, &block.key)
                .and_then(|()| self.fill_block(block, slot.ensure(), &field_path)),
            SlotMut::Unsupported(shape) => Err(IclError::UnsupportedFieldShape {
                shape: shape.to_string(),
            }),
            other => Err(IclError::FieldShapeMismatch {
                expected: other.shape_name(),
                found: "block".to_string(),
            }),
        };

        result.map_err(|err| self.locate(err, &field_path))
    }

    /// Mark a singular block key as decoded for the instance in `frame`.
    fn claim(&mut self, frame: FrameId, key: &str) -> Result<(), IclError> {
        if self.frame(frame).assigned.insert(key.to_string()) {
            Ok(())
        } else {
            Err(IclError::DuplicateBlock {
                key: key.to_string(),
            })
        }
    }

    fn fill_block(
        &mut self,
        block: &Block,
        record: &mut dyn Record,
        path: &str,
    ) -> Result<(), IclError> {
        let frame = self.enter();
        trace!(key = %block.key, path, params = block.parameters.len(), "entering block");

        self.bind_params(block, record, frame)?;
        self.decode_statements(&block.body.statements, record, frame, path)
    }

    /// Bind block parameters, in order, to the record's `.param` fields.
    /// Parameters past the last `.param` field are ignored.
    fn bind_params(
        &mut self,
        block: &Block,
        record: &mut dyn Record,
        frame: FrameId,
    ) -> Result<(), IclError> {
        let schema = record.schema()?;

        for param in &block.parameters {
            let bound = self.frame(frame).params_bound;
            let Some(field) = schema.params().nth(bound) else {
                trace!(key = %block.key, value = %param.value, "ignoring excess block parameter");
                break;
            };

            self.last_pos = param.pos;
            match record.slot_mut(field.name) {
                Some(SlotMut::Scalar(slot)) if slot.kind() == ScalarKind::String => {
                    slot.set(Scalar::String(param.value.clone()));
                }
                _ => {
                    return Err(IclError::NonStringParam {
                        field: field.name.to_string(),
                    });
                }
            }
            self.frame(frame).params_bound += 1;
        }

        Ok(())
    }

    /// Attach path and position, once, at the innermost failing field.
    fn locate(&self, err: IclError, path: &str) -> IclError {
        if err.is_located() {
            return err;
        }
        IclError::Located {
            path: path.to_string(),
            line: self.last_pos.line,
            column: self.last_pos.column,
            source: Box::new(err),
        }
    }
}

fn mismatch(expected: String, found: &Node) -> IclError {
    IclError::FieldShapeMismatch {
        expected,
        found: found.kind_name().to_string(),
    }
}

/// Decode `doc` into `target`, reading `env(...)` from the process
/// environment.
pub fn decode(doc: &Document, target: &mut dyn Record) -> Result<(), IclError> {
    Decoder::new(&ProcessEnv).decode(doc, target)
}

pub fn decode_with_env(
    doc: &Document,
    target: &mut dyn Record,
    env: &dyn EnvSource,
) -> Result<(), IclError> {
    Decoder::new(env).decode(doc, target)
}
