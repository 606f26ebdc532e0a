/// Text rendering of diagnostic results
///
/// The runner hands back plain result records; everything an operator sees
/// is produced here. Three renderings: a summary table for a quick read, a
/// per-probe detail section mirroring the fields support asks about, and a
/// copy-pasteable report block for the support mailbox.

use serde_json::Value;

use crate::probes::{
    CHECK_USAGE_NAME, FREE_TRIAL_GENERATE_META_NAME, SUBSCRIBER_GENERATE_META_NAME,
    VALIDATE_LICENSE_NAME,
};
use crate::types::{
    body_view, extract_metadata_fields, is_truthy, LicenseValidationBody, TestResult, UsageBody,
};

/// Support contact shown at the end of the copyable report.
pub const SUPPORT_EMAIL: &str = "support@oneclickcontent.com";

fn status_label(passed: bool) -> &'static str {
    if passed {
        "✅ PASSED"
    } else {
        "❌ FAILED"
    }
}

fn first_line(details: &str) -> &str {
    details.lines().next().unwrap_or("")
}

fn display(value: &Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(v) => v.to_string(),
        None => "N/A".to_string(),
    }
}

/// Summary table: one row per probe with its status and the leading line
/// of the details string.
pub fn render_table(results: &[TestResult]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<36} {:<10} Details\n", "Test Name", "Status"));
    out.push_str(&format!("{:-<80}\n", ""));

    for result in results {
        out.push_str(&format!(
            "{:<36} {:<10} {}\n",
            result.name,
            status_label(result.passed),
            first_line(&result.details),
        ));
    }

    out
}

/// Per-probe detail sections with the fields support triage cares about.
pub fn render_details(results: &[TestResult]) -> String {
    let mut out = String::new();

    for result in results {
        out.push_str(&format!("{} — {}\n", result.name, status_label(result.passed)));

        // Transport failures have no response to unpack.
        if !result.details.starts_with("Status:") {
            out.push_str(&format!("  {}\n\n", result.details));
            continue;
        }

        out.push_str(&format!("  {}\n", first_line(&result.details)));

        match result.name.as_str() {
            VALIDATE_LICENSE_NAME => {
                let view: LicenseValidationBody = body_view(&result.response_body);
                if view.status.as_deref() == Some("success") {
                    out.push_str(&format!("  Message: {}\n", view.message.as_deref().unwrap_or("N/A")));
                } else {
                    out.push_str(&format!(
                        "  Error: {}\n",
                        view.message.as_deref().unwrap_or("No metadata returned.")
                    ));
                }
            }
            CHECK_USAGE_NAME => {
                let view: UsageBody = body_view(&result.response_body);
                if view.success.as_ref().map(is_truthy).unwrap_or(false) {
                    out.push_str(&format!("  Subscription: {}\n", display(&view.subscription)));
                    out.push_str(&format!("  Usage Limit: {}\n", display(&view.usage_limit)));
                    out.push_str(&format!("  Used Count: {}\n", display(&view.used_count)));
                    out.push_str(&format!("  Remaining Count: {}\n", display(&view.remaining_count)));
                } else {
                    out.push_str(&format!(
                        "  Error: {}\n",
                        view.message.as_deref().unwrap_or("No metadata returned.")
                    ));
                }
            }
            SUBSCRIBER_GENERATE_META_NAME | FREE_TRIAL_GENERATE_META_NAME => {
                match extract_metadata_fields(&result.response_body) {
                    Some(fields) => {
                        out.push_str(&format!("  Alt Text: {}\n", fields.alt_text.as_deref().unwrap_or("N/A")));
                        out.push_str(&format!("  Title: {}\n", fields.title.as_deref().unwrap_or("N/A")));
                        out.push_str(&format!("  Caption: {}\n", fields.caption.as_deref().unwrap_or("N/A")));
                    }
                    None => out.push_str("  No metadata returned.\n"),
                }
            }
            _ => {}
        }

        out.push('\n');
    }

    out
}

/// Copy-pasteable report for the support mailbox: every probe with its
/// full raw details, nothing elided.
pub fn render_support_report(results: &[TestResult]) -> String {
    let mut out = String::from("OneClickContent Diagnostic Results\n\n");

    for result in results {
        out.push_str(&format!("{}\n", result.name));
        out.push_str(&format!("{}\n", status_label(result.passed)));
        out.push_str(&format!("{}\n\n", result.details));
    }

    out.push_str(&format!(
        "Please paste these results into an email to {} for further assistance.\n",
        SUPPORT_EMAIL
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiagError;
    use serde_json::json;

    fn sample_results() -> Vec<TestResult> {
        vec![
            TestResult::completed(
                VALIDATE_LICENSE_NAME,
                true,
                200,
                json!({"status": "success", "message": "License is valid."}),
            ),
            TestResult::completed(
                CHECK_USAGE_NAME,
                true,
                200,
                json!({
                    "success": 1,
                    "subscription": "growth",
                    "usage_limit": 100,
                    "used_count": 7,
                    "remaining_count": 93
                }),
            ),
            TestResult::transport_failure(
                SUBSCRIBER_GENERATE_META_NAME,
                &DiagError::Transport("connection refused".to_string()),
            ),
            TestResult::completed(
                FREE_TRIAL_GENERATE_META_NAME,
                true,
                403,
                json!({"error": "Free trial limit reached for this site."}),
            ),
        ]
    }

    #[test]
    fn test_table_lists_every_probe() {
        let table = render_table(&sample_results());
        assert!(table.contains(VALIDATE_LICENSE_NAME));
        assert!(table.contains(FREE_TRIAL_GENERATE_META_NAME));
        assert!(table.contains("✅ PASSED"));
        assert!(table.contains("❌ FAILED"));
    }

    #[test]
    fn test_details_render_usage_counters() {
        let details = render_details(&sample_results());
        assert!(details.contains("Subscription: growth"));
        assert!(details.contains("Usage Limit: 100"));
        assert!(details.contains("Remaining Count: 93"));
    }

    #[test]
    fn test_details_render_transport_failure_verbatim() {
        let details = render_details(&sample_results());
        assert!(details.contains("Connection Error: connection refused"));
    }

    #[test]
    fn test_details_render_metadata_fields() {
        let results = vec![TestResult::completed(
            SUBSCRIBER_GENERATE_META_NAME,
            true,
            200,
            json!({
                "success": true,
                "choices": [{
                    "message": {
                        "function_call": {
                            "arguments": {"alt_text": "A red square", "title": "Red Square"}
                        }
                    }
                }]
            }),
        )];

        let details = render_details(&results);
        assert!(details.contains("Alt Text: A red square"));
        assert!(details.contains("Title: Red Square"));
        assert!(details.contains("Caption: N/A"));
    }

    #[test]
    fn test_support_report_carries_raw_details() {
        let report = render_support_report(&sample_results());
        assert!(report.starts_with("OneClickContent Diagnostic Results"));
        assert!(report.contains("Status: 403, Response:"));
        assert!(report.contains(SUPPORT_EMAIL));
    }
}
