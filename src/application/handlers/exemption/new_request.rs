//! NewRequestHandler - Opens the intake of a new exemption request.
//!
//! Walks the user through the listing steps one turn at a time: refuse
//! while a request is still open, then list courses until a known course
//! code arrives, then list that course's subjects.

use std::sync::Arc;

use tracing::info;

use crate::domain::conversation::{params, ConversationContext, Reply};
use crate::domain::foundation::{CourseCode, RegistrationId};
use crate::ports::DocumentStore;

use super::catalog::{
    course_exists, course_listing, list_courses, open_request_notice, open_request_since,
    ordered_subjects, subject_listing,
};
use super::error::{accept, HandlerError};
use super::settings::ReplySettings;

pub const ASK_REGISTRATION_FOR_NEW_REQUEST: &str =
    "Please type your registration number to open a new exemption request.";

/// Command carrying the values gathered so far in the intake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequestCommand {
    pub registration: Option<RegistrationId>,
    pub course: Option<CourseCode>,
}

impl NewRequestCommand {
    pub fn from_context(ctx: &ConversationContext) -> Self {
        Self {
            registration: accept(
                params::REGISTRATION,
                ctx.parameter(params::REGISTRATION),
                RegistrationId::new,
            ),
            course: accept(params::COURSE, ctx.parameter(params::COURSE), CourseCode::new),
        }
    }
}

/// Handler for the new-request intake.
pub struct NewRequestHandler {
    store: Arc<dyn DocumentStore>,
    settings: ReplySettings,
}

impl NewRequestHandler {
    pub fn new(store: Arc<dyn DocumentStore>, settings: ReplySettings) -> Self {
        Self { store, settings }
    }

    pub async fn handle(&self, cmd: NewRequestCommand) -> Result<Reply, HandlerError> {
        let Some(registration) = cmd.registration else {
            return Ok(Reply::text(ASK_REGISTRATION_FOR_NEW_REQUEST));
        };

        if let Some(opened_at) = open_request_since(self.store.as_ref(), &registration).await? {
            info!(registration = %registration, "Refusing intake while a request is open");
            return Ok(open_request_notice(&registration, &opened_at));
        }

        let mut course = cmd.course;
        if let Some(code) = &course {
            if !course_exists(self.store.as_ref(), code).await? {
                course = None;
            }
        }
        let Some(course) = course else {
            let courses = list_courses(self.store.as_ref()).await?;
            return Ok(course_listing(&self.settings, &courses));
        };

        let subjects = ordered_subjects(self.store.as_ref(), &course).await?;
        Ok(subject_listing(&self.settings, &course, &subjects))
    }
}
