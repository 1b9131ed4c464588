use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::evaluator::evaluate;
use crate::parser::parse;
use crate::serialiser::serialise;
use crate::tokeniser::tokenise;
use crate::types::{Redefinition, SymbolTable};

/// Knobs for a translation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub redefinition: Redefinition,
}

/// Runs the pipeline up to evaluation.
pub fn load(input: &str, options: &Options) -> Result<SymbolTable> {
    let toks = tokenise(input)?;
    let program = parse(toks)?;
    evaluate(program, options.redefinition)
}

pub fn translate_with(input: &str, options: &Options) -> Result<String> {
    let table = load(input, options)?;
    serialise(&table)
}

/// Translates source text to JSON with the default options: repeated
/// definitions are rejected.
///
/// ```
/// let json = defconf::translate("(def port 8080);").unwrap();
/// assert_eq!(json, "{\n  \"port\": 8080\n}");
/// ```
pub fn translate(input: &str) -> Result<String> {
    translate_with(input, &Options::default())
}

pub fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_output(path: &Path, json: &str) -> Result<()> {
    fs::write(path, json).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads `input`, translates it and writes `output`. Nothing is written
/// unless the whole pipeline succeeds.
pub fn translate_file(input: &Path, output: &Path, options: &Options) -> Result<()> {
    let source = read_source(input)?;
    let json = translate_with(&source, options)?;
    write_output(output, &json)?;
    debug!(input = %input.display(), output = %output.display(), "translated file");
    Ok(())
}
