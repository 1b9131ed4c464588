//! Translator for a small configuration language into JSON.
//!
//! Source text goes through four stages, each owning its output and
//! handing it to the next: [`tokenise`], [`parse`], [`evaluate`] and
//! [`serialise`]. [`translate`] runs all of them.
//!
//! ```text
//! REM line comment
//! --[[ block comment ]]
//! (def port 8080);
//! (def server struct { host = 'localhost', port = .(port). });
//! ```

mod util;
mod tokeniser;
mod parser;
mod evaluator;
mod serialiser;
mod error;
mod types;
mod api;

pub use api::{load, read_source, translate, translate_file, translate_with, write_output, Options};
pub use error::{Error, LexReason, Result};
pub use evaluator::evaluate;
pub use parser::parse;
pub use serialiser::serialise;
pub use tokeniser::{tokenise, TokVal, Token};
pub use types::{Definition, Expr, Field, Fields, Program, Redefinition, Span, SymbolTable, Value};
