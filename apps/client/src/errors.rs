use thiserror::Error;

use crate::intake::MediaType;

/// Rejections raised while filling a document slot.
/// These never reach the workflow state machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntakeError {
    #[error("Invalid file type '{declared}'. Please upload a PDF or Word document.")]
    InvalidFileType { declared: String },
}

impl IntakeError {
    pub fn invalid_type(media_type: &MediaType) -> Self {
        IntakeError::InvalidFileType {
            declared: media_type.as_str().to_string(),
        }
    }
}

/// Failures of a single analysis request.
///
/// Every variant collapses into `WorkflowState::Failed` carrying `user_message()`;
/// the variants only exist so logs can tell them apart.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error (status {status}): {reason}")]
    Http { status: u16, reason: String },

    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("inconsistent analysis result: {0}")]
    Inconsistent(String),
}

impl AnalysisError {
    /// Human-readable text shown in the `Failed` state.
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::Transport(e) => {
                if e.is_timeout() {
                    "Error: the analysis service did not respond in time".to_string()
                } else if e.is_connect() {
                    "Error: could not reach the analysis service".to_string()
                } else {
                    format!("Error: {e}")
                }
            }
            AnalysisError::Http { status, reason } => {
                format!("Error: {status} {reason}").trim_end().to_string()
            }
            AnalysisError::Parse(e) => {
                format!("Error: the analysis service returned an unreadable result ({e})")
            }
            AnalysisError::Inconsistent(detail) => {
                format!("Error: the analysis service returned an inconsistent result ({detail})")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message_matches_status_line() {
        let err = AnalysisError::Http {
            status: 503,
            reason: "Service Unavailable".to_string(),
        };
        assert_eq!(err.user_message(), "Error: 503 Service Unavailable");
    }

    #[test]
    fn test_http_error_message_without_reason() {
        let err = AnalysisError::Http {
            status: 599,
            reason: String::new(),
        };
        assert_eq!(err.user_message(), "Error: 599");
    }

    #[test]
    fn test_parse_error_message_is_not_empty() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let msg = AnalysisError::Parse(parse).user_message();
        assert!(msg.starts_with("Error:"));
        assert!(msg.contains("unreadable"));
    }

    #[test]
    fn test_invalid_type_mentions_declared_type() {
        let err = IntakeError::invalid_type(&MediaType::Other("image/png".to_string()));
        assert!(err.to_string().contains("image/png"));
        assert!(err.to_string().contains("PDF or Word"));
    }
}
