pub mod file;
pub mod stdin;

use proforma_core::assumptions::Assumptions;
use proforma_core::migration::migrate_legacy;
use serde_json::Value;

/// The raw assumptions document from `--input` or piped stdin.
pub fn read_document(path: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        file::read_document(path)
    } else if let Some(data) = stdin::read_stdin()? {
        Ok(data)
    } else {
        Err("--input <file.json|file.yaml> or stdin required".into())
    }
}

/// Read a document and bring it up to the current schema.
pub fn read_assumptions(path: Option<&str>) -> Result<Assumptions, Box<dyn std::error::Error>> {
    Ok(migrate_legacy(read_document(path)?)?)
}
