//! Shared output helpers for commands

use marksrank_core::error::Result;
use serde::Serialize;
use serde_json::json;

pub use crate::output_by_format_result;

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a JSON status message with extra fields
///
/// # Examples
/// ```ignore
/// print_json_status("ok", Some("Reference pack loaded"), &[("path", json!("ref.db"))])?;
/// ```
pub fn print_json_status(
    status: &str,
    message: Option<&str>,
    extra_fields: &[(&str, serde_json::Value)],
) -> Result<()> {
    let mut output = json!({ "status": status });

    if let Some(obj) = output.as_object_mut() {
        if let Some(msg) = message {
            obj.insert("message".to_string(), json!(msg));
        }
        for (key, value) in extra_fields {
            obj.insert(key.to_string(), value.clone());
        }
    }

    print_json(&output)
}

/// Percentiles are shown with five decimals, the jitter resolution
pub fn format_percentile(value: f64) -> String {
    format!("{:.5}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percentile() {
        assert_eq!(format_percentile(0.0), "0.00000");
        assert_eq!(format_percentile(50.54321), "50.54321");
    }
}
