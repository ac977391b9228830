// Author: Dustin Pilgrim
// License: MIT

use serde::Serialize;

mod render;

/// Zero-based source position of a token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A node of the document tree.
///
/// Literal nodes carry the position of their token. Arrays and maps carry the
/// position of their closing bracket and `env(...)` references the position
/// of the closing paren, i.e. the last token the parser consumed for them.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Identifier { name: String, pos: Position },
    /// Numbers keep their source text so formatting and precision survive.
    Number { text: String, pos: Position },
    String { value: String, pos: Position },
    Boolean { value: bool, pos: Position },
    Null { pos: Position },
    Array { elements: Vec<Node>, pos: Position },
    Map { entries: Vec<(Node, Node)>, pos: Position },
    Envar { name: String, pos: Position },
    Assignment(Assignment),
    Block(Block),
    /// Groups the blocks emitted for one sequence field. Only built by the encoder.
    Collection(Vec<Node>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub name: String,
    pub pos: Position,
    pub value: Box<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub value: String,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub key: String,
    pub pos: Position,
    pub parameters: Vec<Parameter>,
    pub body: BlockBody,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockBody {
    pub statements: Vec<Node>,
}

impl Node {
    pub fn assignment(name: impl Into<String>, value: Node) -> Node {
        Node::Assignment(Assignment {
            name: name.into(),
            pos: Position::default(),
            value: Box::new(value),
        })
    }

    pub fn block(key: impl Into<String>, parameters: Vec<String>, statements: Vec<Node>) -> Node {
        Node::Block(Block {
            key: key.into(),
            pos: Position::default(),
            parameters: parameters
                .into_iter()
                .map(|value| Parameter {
                    value,
                    pos: Position::default(),
                })
                .collect(),
            body: BlockBody { statements },
        })
    }

    pub fn string(value: impl Into<String>) -> Node {
        Node::String {
            value: value.into(),
            pos: Position::default(),
        }
    }

    pub fn number(text: impl Into<String>) -> Node {
        Node::Number {
            text: text.into(),
            pos: Position::default(),
        }
    }

    pub fn boolean(value: bool) -> Node {
        Node::Boolean {
            value,
            pos: Position::default(),
        }
    }

    pub fn null() -> Node {
        Node::Null {
            pos: Position::default(),
        }
    }

    pub fn envar(name: impl Into<String>) -> Node {
        Node::Envar {
            name: name.into(),
            pos: Position::default(),
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Node::Identifier { pos, .. }
            | Node::Number { pos, .. }
            | Node::String { pos, .. }
            | Node::Boolean { pos, .. }
            | Node::Null { pos }
            | Node::Array { pos, .. }
            | Node::Map { pos, .. }
            | Node::Envar { pos, .. } => *pos,
            Node::Assignment(a) => a.pos,
            Node::Block(b) => b.pos,
            Node::Collection(nodes) => nodes.first().map(Node::position).unwrap_or_default(),
        }
    }

    /// Short name of the node kind, used in type mismatch messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Identifier { .. } => "identifier",
            Node::Number { .. } => "number",
            Node::String { .. } => "string",
            Node::Boolean { .. } => "bool",
            Node::Null { .. } => "null",
            Node::Array { .. } => "array",
            Node::Map { .. } => "map",
            Node::Envar { .. } => "env",
            Node::Assignment(_) => "assignment",
            Node::Block(_) => "block",
            Node::Collection(_) => "collection",
        }
    }
}

/// A parsed (or encoded) document: the ordered top-level statements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub nodes: Vec<Node>,
}

impl Document {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Value of a leading `version = <int>` assignment, or 0 when the first
    /// statement is anything else.
    pub fn version(&self) -> i64 {
        match self.nodes.first() {
            Some(Node::Assignment(assign)) if assign.name == "version" => match assign.value.as_ref() {
                Node::Number { text, .. } => text.parse().unwrap_or(0),
                _ => 0,
            },
            _ => 0,
        }
    }

    pub fn render(&self) -> String {
        render::render_document(self)
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&render::render_node(self))
    }
}
