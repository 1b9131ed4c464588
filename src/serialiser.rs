use tracing::debug;

use crate::error::Result;
use crate::types::SymbolTable;

/// Renders the table as a JSON object indented by two spaces, keys in
/// definition order. Non-ASCII text is written unescaped.
pub fn serialise(table: &SymbolTable) -> Result<String> {
    let json = serde_json::to_string_pretty(table)?;
    debug!(bytes = json.len(), "serialised document");
    Ok(json)
}
