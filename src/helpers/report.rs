use reqwest::header::{HeaderMap, CONTENT_DISPOSITION, CONTENT_TYPE};

use crate::error::GatewayError;
use crate::utils::constants::{DEFAULT_REPORT_FILENAME, REPORT_PATH_MARKER};

const PDF: &str = "application/pdf";
const OCTET_STREAM: &str = "application/octet-stream";

/// Rejects report links that cannot point at the report service, before any
/// token is spent on them.
pub fn validate_report_url(report_url: &str) -> Result<(), GatewayError> {
    if report_url.is_empty() || !report_url.contains(REPORT_PATH_MARKER) {
        return Err(GatewayError::InvalidRequest("invalid reportUrl".to_string()));
    }
    Ok(())
}

/// Content type and file name served to the client for a report download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportAttachment {
    pub content_type: String,
    pub filename: String,
}

impl ReportAttachment {
    pub fn from_upstream(url: &str, headers: &HeaderMap) -> Self {
        let upstream_type = header_str(headers, CONTENT_TYPE.as_str()).to_lowercase();
        let content_type = if upstream_type.contains(PDF) || url.to_lowercase().ends_with(".pdf") {
            PDF.to_owned()
        } else if upstream_type.is_empty() {
            OCTET_STREAM.to_owned()
        } else {
            upstream_type
        };

        let disposition = header_str(headers, CONTENT_DISPOSITION.as_str());
        let filename = disposition
            .rsplit_once("filename=")
            .map(|(_, name)| name.trim_matches(|c| c == '"' || c == ';' || c == ' ').to_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_REPORT_FILENAME.to_owned());

        Self {
            content_type,
            filename,
        }
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}
