// Author: Dustin Pilgrim
// License: MIT

//! Text and file entry points.
//!
//! ```
//! use icl::{config, record};
//!
//! #[derive(Debug, Default)]
//! struct App {
//!     name: String,
//!     port: u16,
//! }
//!
//! record!(App { name: "name", port: "port" });
//!
//! let mut app = App::default();
//! config::unmarshal_string("name = \"demo\"\nport = 8080", &mut app)?;
//! assert_eq!(app.port, 8080);
//!
//! let text = config::marshal_string(&app)?;
//! assert_eq!(text, "name = \"demo\"\nport = 8080\n");
//! # Ok::<(), icl::IclError>(())
//! ```

use std::path::Path;

use tracing::debug;

use crate::IclError;
use crate::ast::Document;
use crate::binding::Record;
use crate::decoder::{Decoder, decode};
use crate::encoder::encode;
use crate::resolver::EnvSource;

mod helpers;

#[cfg(test)]
mod tests;

pub use crate::parser::parse;

/// Read and parse a document. A leading `~/` in the path is expanded.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document, IclError> {
    let content = helpers::read_file(path.as_ref())?;
    parse(&content)
}

/// Encode a record as document bytes.
pub fn marshal(record: &dyn Record) -> Result<Vec<u8>, IclError> {
    marshal_string(record).map(String::into_bytes)
}

pub fn marshal_string(record: &dyn Record) -> Result<String, IclError> {
    Ok(encode(record)?.render())
}

pub fn marshal_file<P: AsRef<Path>>(path: P, record: &dyn Record) -> Result<(), IclError> {
    let text = marshal_string(record)?;
    helpers::write_file(path.as_ref(), &text)
}

/// Decode document bytes into `target`. Invalid UTF-8 surfaces as illegal
/// characters.
pub fn unmarshal(data: &[u8], target: &mut dyn Record) -> Result<(), IclError> {
    unmarshal_string(&String::from_utf8_lossy(data), target)
}

pub fn unmarshal_string(text: &str, target: &mut dyn Record) -> Result<(), IclError> {
    decode(&parse(text)?, target)
}

/// Like [`unmarshal_string`] with `env(...)` read from `env`.
pub fn unmarshal_with_env(
    text: &str,
    target: &mut dyn Record,
    env: &dyn EnvSource,
) -> Result<(), IclError> {
    Decoder::new(env).decode(&parse(text)?, target)
}

pub fn unmarshal_file<P: AsRef<Path>>(path: P, target: &mut dyn Record) -> Result<(), IclError> {
    decode(&parse_file(path)?, target)
}

/// Decode from `primary`, or from `fallback` when `primary` cannot be read.
///
/// Only file errors trigger the fallback. A primary file that exists but
/// fails to parse or decode is reported as is.
pub fn unmarshal_file_with_fallback<P: AsRef<Path>>(
    primary: P,
    fallback: P,
    target: &mut dyn Record,
) -> Result<(), IclError> {
    match parse_file(&primary) {
        Ok(doc) => decode(&doc, target),
        Err(IclError::File { message, .. }) => {
            debug!(
                primary = %primary.as_ref().display(),
                fallback = %fallback.as_ref().display(),
                "primary config unreadable, using fallback"
            );
            let doc = parse_file(&fallback).map_err(|err| match err {
                IclError::File {
                    message: fallback_message,
                    ..
                } => IclError::File {
                    path: format!(
                        "{} (fallback: {})",
                        primary.as_ref().display(),
                        fallback.as_ref().display()
                    ),
                    message: format!("{}; {}", message, fallback_message),
                },
                other => other,
            })?;
            decode(&doc, target)
        }
        Err(other) => Err(other),
    }
}
