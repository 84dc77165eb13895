//! JSON and text I/O for the CLI
//!
//! - Input: one JSON document, from a file or one line of stdin
//! - Output: one JSON object per line, or plain status text

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read a JSON document from `path`, or one line from stdin
pub fn read_document(path: Option<&Path>) -> CliResult<Value> {
    let content = match path {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e)))?,
        None => {
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line
        }
    };

    parse_document(&content)
}

/// Parse a JSON document, rejecting empty input
pub fn parse_document(content: &str) -> CliResult<Value> {
    if content.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }
    Ok(serde_json::from_str(content)?)
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_json_line(&serde_json::json!({
        "status": "ok",
        "data": data
    }))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_json_line(&serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    }))
}

/// Write plain status text to stdout
pub fn write_text(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", text)?;
    stdout.flush()?;
    Ok(())
}

fn write_json_line(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_document() {
        let value = parse_document("{\"_id\": 1}\n").unwrap();
        assert_eq!(value["_id"], 1);
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = parse_document("  \n").unwrap_err();
        assert_eq!(err.code_str(), "COLLGUARD_CLI_IO_ERROR");
    }

    #[test]
    fn test_read_document_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{\"mobile\": \"010\"}}").unwrap();
        let value = read_document(Some(file.path())).unwrap();
        assert_eq!(value["mobile"], "010");
    }

    #[test]
    fn test_missing_file() {
        let err = read_document(Some(Path::new("/nonexistent/doc.json"))).unwrap_err();
        assert!(err.message().contains("/nonexistent/doc.json"));
    }
}
