//! Analysis service client — the only place that talks to the remote skill-match service.
//!
//! One multipart POST per analysis, no retries: a failure goes straight back to the
//! controller, which surfaces it to the user.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::analysis::AnalysisResult;
use crate::errors::AnalysisError;
use crate::intake::{AnalysisRequest, SlotKind, UploadedFile};

/// The analysis backend. `AnalysisController` only ever sees this trait.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(
        &self,
        attempt_id: Uuid,
        request: AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError>;
}

/// HTTP implementation posting `resume` and `job_description` parts to a single endpoint.
#[derive(Clone)]
pub struct HttpAnalysisService {
    client: Client,
    endpoint: String,
}

impl HttpAnalysisService {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AnalysisError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn file_part(file: UploadedFile) -> Result<Part, AnalysisError> {
    let part = Part::bytes(file.content.to_vec())
        .file_name(file.file_name)
        .mime_str(file.media_type.as_str())?;
    Ok(part)
}

fn build_form(request: AnalysisRequest) -> Result<Form, AnalysisError> {
    Ok(Form::new()
        .part(SlotKind::Resume.field_name(), file_part(request.resume)?)
        .part(
            SlotKind::JobDescription.field_name(),
            file_part(request.job_description)?,
        ))
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn analyze(
        &self,
        attempt_id: Uuid,
        request: AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError> {
        let form = build_form(request)?;

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                %attempt_id,
                status = status.as_u16(),
                body = %body,
                "Analysis service returned an error"
            );
            return Err(AnalysisError::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let body = response.bytes().await?;
        let result: AnalysisResult = serde_json::from_slice(&body)?;

        debug!(
            %attempt_id,
            score = result.score,
            jd_skills = result.jd_skills.len(),
            matched = result.matched_skills.len(),
            "Analysis response decoded"
        );

        Ok(result)
    }
}
