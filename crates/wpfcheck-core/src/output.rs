//! JSON output types for CLI responses.
//!
//! All responses carry `status` and `schema_version` so consumers can parse
//! them without knowing which subcommand produced them.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::{CheckError, OutputErrorCode};
use crate::types::Location;

/// Version of the JSON output schema.
pub const SCHEMA_VERSION: &str = "1";

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per finding.
    #[default]
    Text,
    /// Full JSON response.
    Json,
}

// ============================================================================
// Findings
// ============================================================================

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// A single reported violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingOutput {
    /// Check id, e.g. `WPF0001`.
    pub id: String,
    pub severity: Severity,
    pub message: String,
    pub location: Location,
    /// Related locations (e.g. every candidate of an ambiguous accessor).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<Location>,
}

impl FindingOutput {
    /// Render as a single `file:line:col: severity[id]: message` line.
    pub fn to_text_line(&self) -> String {
        format!(
            "{}: {}[{}]: {}",
            self.location, self.severity, self.id, self.message
        )
    }
}

/// Response for `wpfcheck check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    pub status: String,
    pub schema_version: String,
    pub files_analyzed: usize,
    pub findings: Vec<FindingOutput>,
}

impl CheckResponse {
    /// Create a response; findings are sorted by location then id.
    pub fn new(files_analyzed: usize, mut findings: Vec<FindingOutput>) -> Self {
        findings.sort_by(|a, b| a.location.cmp(&b.location).then_with(|| a.id.cmp(&b.id)));
        CheckResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            files_analyzed,
            findings,
        }
    }
}

// ============================================================================
// Registrations
// ============================================================================

/// A resolved dependency-property or routed-event registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationOutput {
    /// `dependency_property` or `routed_event`.
    pub category: String,
    /// Registration kind, e.g. `RegisterReadOnly`.
    pub kind: String,
    /// Containing type of the backing member.
    pub containing_type: String,
    /// Backing field or property name.
    pub backing_member: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered_name: Option<String>,
    /// Value type (dependency properties) or handler type (routed events).
    pub value_type: String,
    pub owner_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_member: Option<String>,
    pub location: Location,
}

/// Response for `wpfcheck registrations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationsResponse {
    pub status: String,
    pub schema_version: String,
    pub registrations: Vec<RegistrationOutput>,
}

impl RegistrationsResponse {
    pub fn new(mut registrations: Vec<RegistrationOutput>) -> Self {
        registrations.sort_by(|a, b| a.location.cmp(&b.location));
        RegistrationsResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            registrations,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error details in an error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: u8,
    pub message: String,
}

/// Response emitted when a command fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl From<&CheckError> for ErrorResponse {
    fn from(err: &CheckError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo {
                code: OutputErrorCode::from(err).code(),
                message: err.to_string(),
            },
        }
    }
}

// ============================================================================
// Emission
// ============================================================================

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(file: &str, line: u32, id: &str) -> FindingOutput {
        FindingOutput {
            id: id.to_string(),
            severity: Severity::Warning,
            message: "message".to_string(),
            location: Location::new(file, line, 1),
            related: Vec::new(),
        }
    }

    #[test]
    fn test_check_response_sorts_findings() {
        let response = CheckResponse::new(
            2,
            vec![
                finding("b.cs", 1, "WPF0001"),
                finding("a.cs", 9, "WPF0003"),
                finding("a.cs", 9, "WPF0001"),
            ],
        );
        let ids: Vec<_> = response
            .findings
            .iter()
            .map(|f| format!("{}:{}", f.location.file, f.id))
            .collect();
        assert_eq!(ids, vec!["a.cs:WPF0001", "a.cs:WPF0003", "b.cs:WPF0001"]);
    }

    #[test]
    fn test_finding_text_line() {
        let f = finding("Foo.cs", 12, "WPF0032");
        assert_eq!(f.to_text_line(), "Foo.cs:12:1: warning[WPF0032]: message");
    }

    #[test]
    fn test_emit_response_json_shape() {
        let response = CheckResponse::new(1, vec![finding("a.cs", 1, "WPF0001")]);
        let mut buf = Vec::new();
        emit_response(&response, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["schema_version"], SCHEMA_VERSION);
        assert_eq!(value["findings"][0]["id"], "WPF0001");
        assert_eq!(value["findings"][0]["severity"], "warning");
        assert!(value["findings"][0].get("related").is_none());
    }

    #[test]
    fn test_error_response_from_error() {
        let err = CheckError::file_not_found("x.cs");
        let response = ErrorResponse::from(&err);
        assert_eq!(response.status, "error");
        assert_eq!(response.error.code, 3);
        let mut buf = Vec::new();
        emit_response(&response, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["error"]["message"], "file not found: x.cs");
    }
}
