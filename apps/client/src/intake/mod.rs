//! Document Intake — holds at most one validated file per slot until submission.

use std::fmt;

use tracing::{debug, warn};

use crate::errors::IntakeError;

pub mod file;

pub use file::{MediaType, UploadedFile};

/// The two document roles a submission needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Resume,
    JobDescription,
}

impl SlotKind {
    /// Multipart field name expected by the analysis service.
    pub fn field_name(self) -> &'static str {
        match self {
            SlotKind::Resume => "resume",
            SlotKind::JobDescription => "job_description",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "resume" | "cv" => Some(SlotKind::Resume),
            "jd" | "job" | "job_description" | "job-description" => {
                Some(SlotKind::JobDescription)
            }
            _ => None,
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKind::Resume => write!(f, "Resume"),
            SlotKind::JobDescription => write!(f, "Job Description"),
        }
    }
}

/// How the user handed the file over. Both go through the same validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Picker,
    Drop,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IntakeOutcome {
    Accepted,
    Rejected(IntakeError),
    /// Slots are frozen while a request runs or results are showing.
    Locked,
}

/// A single-file holding location.
#[derive(Debug, Clone, Default)]
pub struct DocumentSlot {
    file: Option<UploadedFile>,
}

impl DocumentSlot {
    pub fn file(&self) -> Option<&UploadedFile> {
        self.file.as_ref()
    }

    pub fn is_populated(&self) -> bool {
        self.file.is_some()
    }
}

/// Both documents, guaranteed present. Only `DocumentIntake::build_request` creates one.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub resume: UploadedFile,
    pub job_description: UploadedFile,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentIntake {
    resume: DocumentSlot,
    job_description: DocumentSlot,
}

impl DocumentIntake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, kind: SlotKind) -> &DocumentSlot {
        match kind {
            SlotKind::Resume => &self.resume,
            SlotKind::JobDescription => &self.job_description,
        }
    }

    fn slot_mut(&mut self, kind: SlotKind) -> &mut DocumentSlot {
        match kind {
            SlotKind::Resume => &mut self.resume,
            SlotKind::JobDescription => &mut self.job_description,
        }
    }

    /// Validates `file` and stores it in `kind`, replacing any previous file.
    /// A rejected file leaves the slot exactly as it was.
    pub fn submit_file(
        &mut self,
        kind: SlotKind,
        file: UploadedFile,
        source: InputSource,
    ) -> IntakeOutcome {
        if !file.media_type.is_allowed() {
            warn!(
                slot = %kind,
                file = %file.file_name,
                media_type = file.media_type.as_str(),
                ?source,
                "Rejected upload with invalid file type"
            );
            return IntakeOutcome::Rejected(IntakeError::invalid_type(&file.media_type));
        }

        debug!(
            slot = %kind,
            file = %file.file_name,
            size = file.size(),
            ?source,
            "Accepted upload"
        );
        self.slot_mut(kind).file = Some(file);
        IntakeOutcome::Accepted
    }

    pub fn clear_slot(&mut self, kind: SlotKind) {
        self.slot_mut(kind).file = None;
    }

    pub fn clear_all(&mut self) {
        self.resume.file = None;
        self.job_description.file = None;
    }

    pub fn is_ready(&self) -> bool {
        self.resume.is_populated() && self.job_description.is_populated()
    }

    /// Snapshot of both files, or `None` while either slot is empty.
    pub fn build_request(&self) -> Option<AnalysisRequest> {
        match (&self.resume.file, &self.job_description.file) {
            (Some(resume), Some(jd)) => Some(AnalysisRequest {
                resume: resume.clone(),
                job_description: jd.clone(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use bytes::Bytes;

    pub(crate) fn pdf(name: &str) -> UploadedFile {
        UploadedFile::new(name, MediaType::Pdf, Bytes::from_static(b"%PDF-1.4"))
    }

    fn png(name: &str) -> UploadedFile {
        UploadedFile::new(
            name,
            MediaType::Other("image/png".to_string()),
            Bytes::from_static(b"\x89PNG"),
        )
    }

    #[test]
    fn test_accepts_allowed_types() {
        let mut intake = DocumentIntake::new();
        for mt in [MediaType::Pdf, MediaType::Docx, MediaType::Doc] {
            let file = UploadedFile::new("cv", mt, Bytes::new());
            assert_eq!(
                intake.submit_file(SlotKind::Resume, file, InputSource::Picker),
                IntakeOutcome::Accepted
            );
        }
    }

    #[test]
    fn test_rejected_type_leaves_slot_unchanged() {
        let mut intake = DocumentIntake::new();
        intake.submit_file(SlotKind::Resume, pdf("cv.pdf"), InputSource::Picker);

        let outcome = intake.submit_file(SlotKind::Resume, png("photo.png"), InputSource::Picker);
        assert!(matches!(
            outcome,
            IntakeOutcome::Rejected(IntakeError::InvalidFileType { .. })
        ));
        assert_eq!(
            intake.slot(SlotKind::Resume).file().unwrap().file_name,
            "cv.pdf"
        );
    }

    #[test]
    fn test_rejected_type_into_empty_slot_stays_empty() {
        let mut intake = DocumentIntake::new();
        let outcome =
            intake.submit_file(SlotKind::JobDescription, png("jd.png"), InputSource::Drop);
        assert!(matches!(outcome, IntakeOutcome::Rejected(_)));
        assert!(!intake.slot(SlotKind::JobDescription).is_populated());
    }

    #[test]
    fn test_drop_and_picker_share_rules() {
        let mut a = DocumentIntake::new();
        let mut b = DocumentIntake::new();
        assert_eq!(
            a.submit_file(SlotKind::Resume, png("x.png"), InputSource::Picker),
            b.submit_file(SlotKind::Resume, png("x.png"), InputSource::Drop)
        );
        assert_eq!(
            a.submit_file(SlotKind::Resume, pdf("x.pdf"), InputSource::Picker),
            b.submit_file(SlotKind::Resume, pdf("x.pdf"), InputSource::Drop)
        );
    }

    #[test]
    fn test_acceptance_replaces_only_target_slot() {
        let mut intake = DocumentIntake::new();
        intake.submit_file(SlotKind::Resume, pdf("old.pdf"), InputSource::Picker);
        intake.submit_file(SlotKind::JobDescription, pdf("jd.pdf"), InputSource::Picker);
        intake.submit_file(SlotKind::Resume, pdf("new.pdf"), InputSource::Drop);

        assert_eq!(intake.slot(SlotKind::Resume).file().unwrap().file_name, "new.pdf");
        assert_eq!(
            intake.slot(SlotKind::JobDescription).file().unwrap().file_name,
            "jd.pdf"
        );
    }

    #[test]
    fn test_ready_truth_table() {
        for (resume, jd) in [(false, false), (true, false), (false, true), (true, true)] {
            let mut intake = DocumentIntake::new();
            if resume {
                intake.submit_file(SlotKind::Resume, pdf("cv.pdf"), InputSource::Picker);
            }
            if jd {
                intake.submit_file(SlotKind::JobDescription, pdf("jd.pdf"), InputSource::Picker);
            }
            assert_eq!(intake.is_ready(), resume && jd, "resume={resume} jd={jd}");
            assert_eq!(intake.build_request().is_some(), resume && jd);
        }
    }

    #[test]
    fn test_clear_slot_is_unconditional() {
        let mut intake = DocumentIntake::new();
        intake.clear_slot(SlotKind::Resume);
        intake.submit_file(SlotKind::Resume, pdf("cv.pdf"), InputSource::Picker);
        intake.submit_file(SlotKind::JobDescription, pdf("jd.pdf"), InputSource::Picker);
        intake.clear_slot(SlotKind::Resume);

        assert!(!intake.slot(SlotKind::Resume).is_populated());
        assert!(intake.slot(SlotKind::JobDescription).is_populated());
        assert!(!intake.is_ready());
    }

    #[test]
    fn test_slot_kind_parse_and_field_names() {
        assert_eq!(SlotKind::parse("resume"), Some(SlotKind::Resume));
        assert_eq!(SlotKind::parse("JD"), Some(SlotKind::JobDescription));
        assert_eq!(SlotKind::parse("cover-letter"), None);
        assert_eq!(SlotKind::Resume.field_name(), "resume");
        assert_eq!(SlotKind::JobDescription.field_name(), "job_description");
    }
}
