//! CLI argument validation functions
//!
//! Value parsers for arguments clap cannot check on its own: table names,
//! row ids, JSON payloads and configuration file paths.

use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use crate::models::{Role, Table};

/// Validate that a file path is accessible (exists and is readable)
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!("Cannot read configuration file '{}': {}", path_str, e)),
    }
}

/// Parse a table name, accepting `pre-configured-jobs` as well as
/// `pre_configured_jobs`.
pub fn validate_table(table_str: &str) -> Result<Table, String> {
    table_str.parse::<Table>().map_err(|e| e.to_string())
}

/// Validate a row id is a positive integer
pub fn validate_row_id(id_str: &str) -> Result<i64, String> {
    let id: i64 = id_str
        .parse()
        .map_err(|_| format!("Row id must be a positive integer, got: '{}'", id_str))?;

    if id <= 0 {
        return Err(format!("Row id must be greater than 0, got: {}", id));
    }

    Ok(id)
}

/// Parse a JSON object payload.
///
/// A leading `@` reads the payload from the named file instead.
pub fn validate_json_payload(payload: &str) -> Result<Value, String> {
    let text = match payload.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("Cannot read payload file '{}': {}", path, e))?,
        None => payload.to_string(),
    };

    let value: Value =
        serde_json::from_str(&text).map_err(|e| format!("Payload is not valid JSON: {}", e))?;

    if !value.is_object() {
        return Err("Payload must be a JSON object".to_string());
    }

    Ok(value)
}

pub fn validate_role(role_str: &str) -> Result<Role, String> {
    role_str.parse::<Role>().map_err(|e| e.to_string())
}
