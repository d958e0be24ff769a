//! ReceiveFileHandler - Finalizes an exemption request once the syllabus arrives.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use crate::domain::conversation::{params, ConversationContext, Intent, Reply, SubjectSelection};
use crate::domain::exemption::{fields, Collection, ExemptionRequest, Student};
use crate::domain::foundation::{CourseCode, DocumentId, RegistrationId, Timestamp};
use crate::ports::{to_fields, DocumentStore, Filter, Query, WriteBatch};

use super::catalog::{open_request_notice, open_request_since, ordered_subjects};
use super::deferred::DeferredWriter;
use super::error::{accept, HandlerError};

/// Everything the intake gathered, plus the uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveFileCommand {
    pub download_url: String,
    pub registration: RegistrationId,
    pub course: CourseCode,
    pub selection: SubjectSelection,
}

impl ReceiveFileCommand {
    /// Reads the carried values; the first one missing aborts the intake.
    pub fn from_context(ctx: &ConversationContext) -> Result<Self, HandlerError> {
        let download_url = ctx
            .attachment_url()
            .ok_or_else(|| HandlerError::missing(params::DOWNLOAD_URL))?
            .to_string();

        let intake = ctx.context(Intent::NewRequest.platform_name());
        let registration = accept(
            params::REGISTRATION,
            intake.and_then(|carried| carried.text(params::REGISTRATION)),
            RegistrationId::new,
        )
        .ok_or_else(|| HandlerError::missing(params::REGISTRATION))?;
        let course = accept(
            params::COURSE,
            intake.and_then(|carried| carried.text(params::COURSE)),
            CourseCode::new,
        )
        .ok_or_else(|| HandlerError::missing(params::COURSE))?;

        let numbers = ctx
            .context(Intent::SelectSubjects.platform_name())
            .and_then(|carried| carried.numbers(params::SUBJECT_NUMBERS))
            .ok_or_else(|| HandlerError::missing(params::SUBJECT_NUMBERS))?;

        Ok(Self {
            download_url,
            registration,
            course,
            selection: SubjectSelection::from_numbers(&numbers),
        })
    }
}

/// Result of a finalized intake.
#[derive(Debug)]
pub struct ReceiveFileResult {
    pub reply: Reply,
    /// `None` when the registration already had an OPEN request.
    pub request_id: Option<DocumentId>,
    /// Background student upsert; dropping it does not cancel the write.
    pub student_write: Option<JoinHandle<()>>,
}

/// Handler for the file upload that closes the intake.
pub struct ReceiveFileHandler {
    store: Arc<dyn DocumentStore>,
    deferred: DeferredWriter,
}

impl ReceiveFileHandler {
    pub fn new(store: Arc<dyn DocumentStore>, deferred: DeferredWriter) -> Self {
        Self { store, deferred }
    }

    pub async fn handle(&self, cmd: ReceiveFileCommand) -> Result<ReceiveFileResult, HandlerError> {
        // A re-sent file must not open a second request
        if let Some(opened_at) = open_request_since(self.store.as_ref(), &cmd.registration).await? {
            info!(registration = %cmd.registration, "Ignoring file while a request is open");
            return Ok(ReceiveFileResult {
                reply: open_request_notice(&cmd.registration, &opened_at),
                request_id: None,
                student_write: None,
            });
        }

        let subjects = ordered_subjects(self.store.as_ref(), &cmd.course).await?;
        let subject_ids: Vec<String> = cmd
            .selection
            .pick(&subjects)
            .into_iter()
            .map(|subject| subject.id.clone())
            .collect();

        let now = Timestamp::now();
        let student_write = self
            .deferred
            .commit("student upsert", self.student_upsert(&cmd, now).await?);

        let request = ExemptionRequest::open(&cmd.registration, cmd.download_url, subject_ids, now);
        let request_id = self
            .store
            .create(Collection::Requests, to_fields(&request)?)
            .await?;

        info!(
            request_id = %request_id,
            registration = %cmd.registration,
            subjects = request.subject_ids.len(),
            "Exemption request registered"
        );

        Ok(ReceiveFileResult {
            reply: Reply::text(format!(
                "Exemption request registered! Request identifier: {}.",
                request_id
            )),
            request_id: Some(request_id),
            student_write: Some(student_write),
        })
    }

    /// Creates the student, or refreshes it keeping its registration date.
    async fn student_upsert(
        &self,
        cmd: &ReceiveFileCommand,
        now: Timestamp,
    ) -> Result<WriteBatch, HandlerError> {
        let lookup = Query::new()
            .filter(Filter::ne(
                fields::REGISTRATION,
                Collection::Students.sentinel_key(),
            ))
            .filter(Filter::eq(fields::REGISTRATION, cmd.registration.as_str()))
            .limit(1);
        let existing = self.store.query(Collection::Students, &lookup).await?;

        let student = Student::register(&cmd.registration, &cmd.course, now);
        let mut batch = WriteBatch::new();
        match existing.first() {
            None => {
                batch.create(Collection::Students, to_fields(&student)?);
            }
            Some(doc) => {
                let stored: Student = doc.decode()?;
                let student = student.preserving_created_at(stored.created_at);
                batch.update(Collection::Students, doc.id.clone(), to_fields(&student)?);
            }
        }
        Ok(batch)
    }
}
