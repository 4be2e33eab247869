//! Command implementations.

pub mod canonicalize;
pub mod digest;

use objdigest_canonical::Value;
use std::io::{self, Read};

use crate::error::CliError;

/// Reads JSON from a file or stdin and converts it into a digestible value.
pub fn read_value(input: Option<String>) -> Result<Value, CliError> {
    let (path, text) = match input {
        Some(path) => {
            let text = std::fs::read_to_string(&path).map_err(|source| CliError::Read {
                path: path.clone(),
                source,
            })?;
            (path, text)
        }
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|source| CliError::Read {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            ("<stdin>".to_string(), buffer)
        }
    };

    let json: serde_json::Value =
        serde_json::from_str(&text).map_err(|source| CliError::Json { path, source })?;
    Ok(Value::from(json))
}
