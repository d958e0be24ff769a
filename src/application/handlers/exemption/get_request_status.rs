//! GetRequestStatusHandler - Reports the status of a student's latest request.

use std::sync::Arc;

use crate::domain::conversation::{params, ConversationContext, Reply};
use crate::domain::exemption::{fields, Collection, RequestStatus};
use crate::domain::foundation::RegistrationId;
use crate::ports::{DocumentStore, Filter, Query, SortDirection, StoreError};

use super::error::{accept, HandlerError};

pub const ASK_REGISTRATION_FOR_STATUS: &str =
    "Please type your registration number to check the status of your exemption request.";

/// Query for the status of the latest request of a registration id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetRequestStatusQuery {
    /// `None` when the user has not typed a usable registration id yet.
    pub registration: Option<RegistrationId>,
}

impl GetRequestStatusQuery {
    pub fn from_context(ctx: &ConversationContext) -> Self {
        Self {
            registration: accept(
                params::REGISTRATION,
                ctx.parameter(params::REGISTRATION),
                RegistrationId::new,
            ),
        }
    }
}

/// Handler for status lookups.
pub struct GetRequestStatusHandler {
    store: Arc<dyn DocumentStore>,
}

impl GetRequestStatusHandler {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetRequestStatusQuery) -> Result<Reply, HandlerError> {
        let Some(registration) = query.registration else {
            return Ok(Reply::text(ASK_REGISTRATION_FOR_STATUS));
        };

        // Two rows are enough to tell "the request" from "the latest of several"
        let lookup = Query::new()
            .filter(Filter::ne(
                fields::REGISTRATION,
                Collection::Requests.sentinel_key(),
            ))
            .filter(Filter::eq(fields::REGISTRATION, registration.as_str()))
            .order_by(fields::CREATED_AT, SortDirection::Descending)
            .select(&[fields::STATUS])
            .limit(2);

        let requests = self.store.query(Collection::Requests, &lookup).await?;
        let Some(latest) = requests.first() else {
            return Ok(Reply::text(format!(
                "No exemption request found for {}.",
                registration
            )));
        };

        let status: RequestStatus = latest
            .get(fields::STATUS)
            .cloned()
            .ok_or_else(|| {
                StoreError::Serialization(format!("request {} has no status", latest.id))
            })
            .and_then(|value| {
                serde_json::from_value(value)
                    .map_err(|e| StoreError::Serialization(format!("request {}: {}", latest.id, e)))
            })?;

        let text = if requests.len() == 1 {
            format!(
                "The status of the exemption request of {} is: {}.",
                registration, status
            )
        } else {
            format!(
                "The status of the most recent exemption request of {} is: {}.",
                registration, status
            )
        };
        Ok(Reply::text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryDocumentStore;
    use crate::application::handlers::exemption::fixtures;
    use serde_json::json;

    fn query(registration: &str) -> GetRequestStatusQuery {
        GetRequestStatusQuery {
            registration: Some(RegistrationId::new(registration).unwrap()),
        }
    }

    #[tokio::test]
    async fn unknown_registration_is_reported_by_id() {
        let store = InMemoryDocumentStore::new();
        fixtures::insert_sentinels(&store).await;
        let handler = GetRequestStatusHandler::new(Arc::new(store));

        let reply = handler.handle(query("2019001")).await.unwrap();
        assert_eq!(reply.joined(), "No exemption request found for 2019001.");
    }

    #[tokio::test]
    async fn single_request_uses_singular_phrasing() {
        let store = InMemoryDocumentStore::new();
        fixtures::insert_request(&store, "A1", "2023-01-01T10:00:00.000000Z", "DEFERIDA").await;
        let handler = GetRequestStatusHandler::new(Arc::new(store));

        let reply = handler.handle(query("a1")).await.unwrap();
        assert_eq!(
            reply.joined(),
            "The status of the exemption request of A1 is: GRANTED."
        );
    }

    #[tokio::test]
    async fn several_requests_report_the_most_recent() {
        let store = InMemoryDocumentStore::new();
        fixtures::insert_request(&store, "A1", "2023-06-01T10:00:00.000000Z", "ABERTA").await;
        fixtures::insert_request(&store, "A1", "2022-01-01T10:00:00.000000Z", "INDEFERIDA").await;
        fixtures::insert_request(&store, "B2", "2024-01-01T10:00:00.000000Z", "DEFERIDA").await;
        let handler = GetRequestStatusHandler::new(Arc::new(store));

        let reply = handler.handle(query("A1")).await.unwrap();
        assert_eq!(
            reply.joined(),
            "The status of the most recent exemption request of A1 is: OPEN."
        );
    }

    #[tokio::test]
    async fn missing_registration_prompts_for_it() {
        let handler = GetRequestStatusHandler::new(Arc::new(InMemoryDocumentStore::new()));
        let ctx = ConversationContext::new(fixtures::fields(json!({"matricula": ""})));

        let reply = handler
            .handle(GetRequestStatusQuery::from_context(&ctx))
            .await
            .unwrap();
        assert_eq!(reply.joined(), ASK_REGISTRATION_FOR_STATUS);
    }

    #[tokio::test]
    async fn registration_with_spaces_is_asked_again() {
        let handler = GetRequestStatusHandler::new(Arc::new(InMemoryDocumentStore::new()));
        let ctx = ConversationContext::new(fixtures::fields(json!({"matricula": "2019 001"})));

        let query = GetRequestStatusQuery::from_context(&ctx);
        assert_eq!(query.registration, None);
        let reply = handler.handle(query).await.unwrap();
        assert_eq!(reply.joined(), ASK_REGISTRATION_FOR_STATUS);
    }

    #[tokio::test]
    async fn unreadable_status_is_a_store_error() {
        let store = InMemoryDocumentStore::new();
        fixtures::insert_request(&store, "A1", "2023-01-01T10:00:00.000000Z", "PENDENTE").await;
        let handler = GetRequestStatusHandler::new(Arc::new(store));

        let result = handler.handle(query("A1")).await;
        assert!(matches!(
            result,
            Err(HandlerError::Store(StoreError::Serialization(_)))
        ));
    }
}
