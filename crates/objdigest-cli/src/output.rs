//! Output formatting utilities.

use objdigest_canonical::{CanonicalizationReport, DigestAlg};
use serde_json::{json, Value};

/// Formats a digest result as JSON.
pub fn format_digest_json(
    alg: DigestAlg,
    hash: &str,
    report: Option<&CanonicalizationReport>,
) -> String {
    let mut out = json!({
        "alg": alg,
        "hash": hash,
    });
    if let (Some(report), Value::Object(map)) = (report, &mut out) {
        map.insert(
            "report".to_string(),
            serde_json::to_value(report).unwrap_or(Value::Null),
        );
    }
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}

/// Prints report warnings to stderr, one per line.
pub fn print_warnings(report: &CanonicalizationReport) {
    for warning in &report.warnings {
        match &warning.detail {
            Some(detail) => eprintln!("warning: {} at {} ({})", warning.code, warning.path, detail),
            None => eprintln!("warning: {} at {}", warning.code, warning.path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_output_without_report() {
        let text = format_digest_json(DigestAlg::Md5, "00", None);
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, json!({"alg": "md5", "hash": "00"}));
    }

    #[test]
    fn json_output_with_report() {
        let report = CanonicalizationReport::default();
        let text = format_digest_json(DigestAlg::Sha256, "ab", Some(&report));
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["report"]["status"], "Ok");
    }
}
