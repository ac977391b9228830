pub mod ast;
pub mod binding;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod export;
pub mod lexer;
pub mod parser;
pub mod resolver;
pub mod utils;

pub use ast::{Document, Node};
pub use binding::Record;
pub use config::{
    marshal, marshal_file, marshal_string, parse_file, unmarshal, unmarshal_file,
    unmarshal_file_with_fallback, unmarshal_string, unmarshal_with_env,
};
pub use decoder::{Decoder, decode, decode_with_env};
pub use encoder::encode;
pub use error::IclError;
pub use parser::parse;
pub use resolver::{EnvSource, MapEnv, ProcessEnv};
