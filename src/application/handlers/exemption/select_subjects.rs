//! SelectSubjectsHandler - Echoes the subjects picked by listing number.

use std::sync::Arc;

use crate::domain::conversation::{params, ConversationContext, Intent, Reply, SubjectSelection};
use crate::domain::foundation::CourseCode;
use crate::ports::DocumentStore;

use super::catalog::ordered_subjects;
use super::error::{accept, HandlerError};
use super::settings::ReplySettings;

pub const NO_VALID_SUBJECT: &str = "You did not choose any valid subject number.\n\nType the number of one or more subjects to exempt.";

const SELECTION_HEADER: &str = "You chose the following subject(s):\n";

const SELECTION_FOOTER: &str = "\n\nType the number of one or more subjects to exempt. Or send the syllabus file of the institution where you took the subjects to finish.";

/// Command with the numbers typed this turn and the course chosen earlier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectSubjectsCommand {
    pub selection: SubjectSelection,
    /// Carried over from the new-request intake.
    pub course: Option<CourseCode>,
}

impl SelectSubjectsCommand {
    pub fn from_context(ctx: &ConversationContext) -> Self {
        let numbers = ctx
            .parameter_numbers(params::SUBJECT_NUMBERS)
            .unwrap_or_default();
        Self {
            selection: SubjectSelection::from_numbers(&numbers),
            course: accept(
                params::COURSE,
                ctx.context(Intent::NewRequest.platform_name())
                    .and_then(|carried| carried.text(params::COURSE)),
                CourseCode::new,
            ),
        }
    }
}

/// Handler for subject selection.
pub struct SelectSubjectsHandler {
    store: Arc<dyn DocumentStore>,
    settings: ReplySettings,
}

impl SelectSubjectsHandler {
    pub fn new(store: Arc<dyn DocumentStore>, settings: ReplySettings) -> Self {
        Self { store, settings }
    }

    pub async fn handle(&self, cmd: SelectSubjectsCommand) -> Result<Reply, HandlerError> {
        if cmd.selection.is_empty() {
            return Ok(Reply::text(NO_VALID_SUBJECT));
        }

        let course = cmd
            .course
            .ok_or_else(|| HandlerError::missing(params::COURSE))?;

        let subjects = ordered_subjects(self.store.as_ref(), &course).await?;
        let picked = cmd.selection.pick(&subjects);
        if picked.is_empty() {
            return Ok(Reply::text(NO_VALID_SUBJECT));
        }

        let mut acc = self.settings.accumulator(SELECTION_HEADER);
        for subject in picked {
            acc.push(&format!("\n{} - {}", subject.id, subject.name));
        }
        acc.push(SELECTION_FOOTER);
        Ok(acc.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryDocumentStore;
    use crate::application::handlers::exemption::fixtures;
    use crate::domain::conversation::CarriedContext;
    use serde_json::json;

    fn handler(store: InMemoryDocumentStore) -> SelectSubjectsHandler {
        SelectSubjectsHandler::new(Arc::new(store), ReplySettings::default())
    }

    fn context(numbers: serde_json::Value) -> ConversationContext {
        ConversationContext::new(fixtures::fields(json!({ "number": numbers }))).with_context(
            CarriedContext::new(
                "projects/p/agent/sessions/s/contexts/novaisencao",
                fixtures::fields(json!({"matricula": "a1", "id_curso": "bcc"})),
            ),
        )
    }

    #[tokio::test]
    async fn echoes_only_indices_in_range() {
        let store = fixtures::catalog_store(&[("BCC", 3)]).await;
        let cmd = SelectSubjectsCommand::from_context(&context(json!([1, 4, -1])));

        let reply = handler(store).handle(cmd).await.unwrap();
        assert_eq!(
            reply.joined(),
            format!(
                "{}\nBCC001 - Subject number 1 of BCC{}",
                SELECTION_HEADER, SELECTION_FOOTER
            )
        );
    }

    #[tokio::test]
    async fn all_invalid_indices_get_the_retry_message() {
        let store = fixtures::catalog_store(&[("BCC", 3)]).await;
        let cmd = SelectSubjectsCommand::from_context(&context(json!([3, 7])));

        let reply = handler(store).handle(cmd).await.unwrap();
        assert_eq!(reply.joined(), NO_VALID_SUBJECT);
    }

    #[tokio::test]
    async fn empty_selection_skips_the_store() {
        let store = InMemoryDocumentStore::new();
        store.set_unavailable(true);
        let cmd = SelectSubjectsCommand::from_context(&context(json!([])));

        let reply = handler(store).handle(cmd).await.unwrap();
        assert_eq!(reply.joined(), NO_VALID_SUBJECT);
    }

    #[tokio::test]
    async fn single_number_counts_as_a_selection() {
        let store = fixtures::catalog_store(&[("BCC", 3)]).await;
        let cmd = SelectSubjectsCommand::from_context(&context(json!(0)));

        let reply = handler(store).handle(cmd).await.unwrap();
        assert!(reply.joined().contains("\nBCC000 - Subject number 0 of BCC"));
    }

    #[tokio::test]
    async fn missing_course_context_is_an_error() {
        let store = fixtures::catalog_store(&[("BCC", 3)]).await;
        let ctx = ConversationContext::new(fixtures::fields(json!({"number": [0]})));

        let result = handler(store)
            .handle(SelectSubjectsCommand::from_context(&ctx))
            .await;
        assert!(matches!(
            result,
            Err(HandlerError::MissingContext { field: "id_curso" })
        ));
    }
}
