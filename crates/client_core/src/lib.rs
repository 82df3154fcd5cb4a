use anyhow::{anyhow, Context, Result};
use reqwest::{multipart, Client, StatusCode};
use shared::{
    domain::InterviewId,
    error::{ApiException, ErrorCode},
    protocol::{InterviewDraft, InterviewRecord},
};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod config;
mod upload;

pub use config::{load_settings, Settings};
pub use upload::{has_accepted_extension, PendingFile, UploadForm};

/// How many characters of the trimmed description carry over into the
/// submission title.
const TITLE_MAX_CHARS: usize = 120;

pub const NO_FILES_MESSAGE: &str =
    "Please upload at least one transcript file (.pdf or .txt).";
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed. Please try again.";

/// Thin wrapper over the analysis service HTTP API. One method per endpoint;
/// callers own all workflow state.
pub struct InterviewApi {
    http: Client,
    base_url: String,
}

impl InterviewApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.api_base_url.clone())
    }

    pub async fn list_interviews(&self) -> Result<Vec<InterviewRecord>> {
        let interviews = self
            .http
            .get(format!("{}/api/v1/interviews", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("invalid interview list payload from service")?;
        Ok(interviews)
    }

    pub async fn fetch_interview(&self, id: InterviewId) -> Result<InterviewRecord> {
        let response = self
            .http
            .get(format!("{}/api/v1/interviews/{}", self.base_url, id.0))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiException::new(
                ErrorCode::NotFound,
                format!("interview {} not found", id.0),
            )
            .into());
        }

        let interview = response
            .error_for_status()?
            .json()
            .await
            .context("invalid interview payload from service")?;
        Ok(interview)
    }

    /// Creates an interview from a typed transcript, bypassing file upload.
    pub async fn create_interview(&self, draft: &InterviewDraft) -> Result<InterviewRecord> {
        let interview = self
            .http
            .post(format!("{}/api/v1/interviews", self.base_url))
            .json(draft)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("invalid interview payload from service")?;
        Ok(interview)
    }

    /// Submits every pending file under the repeated `files` field. When a
    /// description is present, its full trimmed text travels as
    /// `product_description` and its first 120 characters as `title`;
    /// neither field is sent otherwise.
    ///
    /// The response body only matters as a success signal; state after a
    /// successful upload comes from the next list fetch.
    pub async fn upload(&self, files: &[PendingFile], description: Option<&str>) -> Result<()> {
        if files.is_empty() {
            return Err(anyhow!("upload requires at least one file"));
        }

        let mut form = multipart::Form::new();
        for file in files {
            let mime = mime_guess::from_path(&file.name).first_or_octet_stream();
            let part = multipart::Part::bytes(file.bytes.clone())
                .file_name(file.name.clone())
                .mime_str(mime.essence_str())
                .with_context(|| format!("invalid mime type for '{}'", file.name))?;
            form = form.part("files", part);
        }
        if let Some(description) = description {
            let title: String = description.chars().take(TITLE_MAX_CHARS).collect();
            form = form
                .text("product_description", description.to_string())
                .text("title", title);
        }

        let response = self
            .http
            .post(format!("{}/api/v1/interviews/upload", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiException::from_response(status.as_u16(), &body).into());
        }
        Ok(())
    }
}

/// Submission lifecycle. `InFlight` and `Error` cannot coexist; transitions
/// are driven solely by [`SubmissionController`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight,
    Error(String),
}

impl SubmissionState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{}", NO_FILES_MESSAGE)]
    NoFiles,
    #[error("{}", UPLOAD_FAILED_MESSAGE)]
    Upload(#[source] anyhow::Error),
}

/// Owns the request lifecycle and the cached interview snapshot.
///
/// Single-writer by construction: every mutating operation takes `&mut self`,
/// so one submission at most is in flight and only this controller replaces
/// the snapshot. Rendering layers read [`state`](Self::state) and
/// [`interviews`](Self::interviews).
pub struct SubmissionController {
    api: InterviewApi,
    state: SubmissionState,
    interviews: Vec<InterviewRecord>,
}

impl SubmissionController {
    pub fn new(api: InterviewApi) -> Self {
        Self {
            api,
            state: SubmissionState::Idle,
            interviews: Vec::new(),
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn interviews(&self) -> &[InterviewRecord] {
        &self.interviews
    }

    pub fn api(&self) -> &InterviewApi {
        &self.api
    }

    /// Submits the form contents as one atomic unit.
    ///
    /// Failure of any kind leaves the form untouched so the user can retry
    /// without re-entering data. On acceptance the pending files and the
    /// description clear together, then the snapshot refreshes wholesale;
    /// a failed refresh is logged and never disturbs the cleared form.
    pub async fn submit(&mut self, form: &mut UploadForm) -> Result<(), SubmitError> {
        if self.state.is_in_flight() {
            // Callers disable their submit trigger while a request is
            // running; a stray call is dropped, not queued.
            debug!("ignoring submit while a submission is in flight");
            return Ok(());
        }

        // Any previous user-visible error clears before validation runs.
        self.state = SubmissionState::Idle;

        if !form.has_files() {
            self.state = SubmissionState::Error(NO_FILES_MESSAGE.to_string());
            return Err(SubmitError::NoFiles);
        }

        self.state = SubmissionState::InFlight;
        let file_count = form.file_count();
        let description = form.description().trim().to_string();
        let description = (!description.is_empty()).then_some(description);

        if let Err(err) = self.api.upload(form.files(), description.as_deref()).await {
            warn!(file_count, "interview upload failed: {err:#}");
            self.state = SubmissionState::Error(UPLOAD_FAILED_MESSAGE.to_string());
            return Err(SubmitError::Upload(err));
        }

        info!(file_count, "interview upload accepted");
        form.clear();

        if let Err(err) = self.refresh_interviews().await {
            // Best-effort: the submission already succeeded and the cleared
            // form must stay cleared.
            warn!("interview list refresh failed after upload: {err:#}");
        }

        self.state = SubmissionState::Idle;
        Ok(())
    }

    /// Replaces the snapshot wholesale with the service's current list. The
    /// service order is authoritative; nothing is merged locally.
    ///
    /// Failures leave the previous snapshot in place and never touch the
    /// form error slot.
    pub async fn refresh_interviews(&mut self) -> Result<()> {
        let interviews = self.api.list_interviews().await?;
        debug!(count = interviews.len(), "interview snapshot replaced");
        self.interviews = interviews;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
