//! JSON output for the CLI
//!
//! One JSON object per command on stdout:
//! - success: `{"status":"ok","data":{...}}`
//! - failure: `{"status":"error","code":"...","message":"..."}`

use std::io::Write;

use serde_json::{json, Value};

use super::errors::CliResult;

/// Write a success response line
pub fn write_response_to<W: Write>(out: &mut W, data: Value) -> CliResult<()> {
    write_line(out, &json!({ "status": "ok", "data": data }))
}

/// Write an error response line
pub fn write_error_to<W: Write>(out: &mut W, code: &str, message: &str) -> CliResult<()> {
    write_line(
        out,
        &json!({ "status": "error", "code": code, "message": message }),
    )
}

fn write_line<W: Write>(out: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_shape() {
        let mut buf = Vec::new();
        write_response_to(&mut buf, json!({ "count": 3 })).unwrap();

        let parsed: Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["data"]["count"], 3);
        assert!(buf.ends_with(b"\n"));
    }

    #[test]
    fn test_error_shape() {
        let mut buf = Vec::new();
        write_error_to(&mut buf, "DELDOCS_CLI_FATAL", "write failed").unwrap();

        let parsed: Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed["status"], "error");
        assert_eq!(parsed["code"], "DELDOCS_CLI_FATAL");
        assert_eq!(parsed["message"], "write failed");
    }
}
