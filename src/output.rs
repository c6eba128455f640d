use serde::Serialize;

use crate::envelope::Envelope;
use crate::error::DetectError;
use crate::DetectionResult;

/// Everything learned about one input link
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub input: String,
    pub detection: DetectionResult,
    pub video_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_error: Option<String>,
}

/// Render one tab-separated line: platform, confidence, method, video ID, URL
pub fn render_text(outcome: &Result<Report, DetectError>) -> String {
    match outcome {
        Ok(report) => format!(
            "{}\t{:.2}\t{}\t{}\t{}",
            report.detection.platform(),
            report.detection.confidence(),
            report.detection.detection_method(),
            report.video_id.as_deref().unwrap_or("-"),
            report.detection.normalized_url(),
        ),
        Err(e) => format!("error\t{}\t{e}", e.kind()),
    }
}

#[derive(Debug, Serialize)]
struct Check<'a> {
    input: &'a str,
    supported: bool,
}

/// Render the result of a quick link check
pub fn render_check(input: &str, supported: bool, format_json: bool) -> String {
    if format_json {
        let envelope = Envelope::success(Check { input, supported });
        serde_json::to_string(&envelope).unwrap_or_default()
    } else {
        let verdict = if supported { "supported" } else { "unsupported" };
        format!("{verdict}\t{input}")
    }
}

/// Render the outcome as a `{code, msg, data}` JSON envelope
pub fn render_json(outcome: &Result<Report, DetectError>) -> String {
    let envelope = match outcome {
        Ok(report) => Envelope::success(report),
        Err(e) => Envelope::from(e),
    };
    serde_json::to_string(&envelope).unwrap_or_default()
}
