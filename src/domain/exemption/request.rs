//! Exemption request entity and its status.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::collection::Collection;
use crate::domain::foundation::{RegistrationId, Timestamp};

/// Review status of an exemption request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    #[serde(rename = "ABERTA")]
    Open,
    #[serde(rename = "DEFERIDA")]
    Granted,
    #[serde(rename = "INDEFERIDA")]
    Denied,
}

impl RequestStatus {
    /// Value as stored in the `SITUACAO` field.
    pub fn stored_value(&self) -> &'static str {
        match self {
            RequestStatus::Open => "ABERTA",
            RequestStatus::Granted => "DEFERIDA",
            RequestStatus::Denied => "INDEFERIDA",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestStatus::Open => "OPEN",
            RequestStatus::Granted => "GRANTED",
            RequestStatus::Denied => "DENIED",
        };
        write!(f, "{}", s)
    }
}

/// A student's application to be excused from specific subjects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExemptionRequest {
    #[serde(rename = "MATRICULA")]
    pub registration: String,
    #[serde(rename = "DATA_CADASTRO")]
    pub created_at: Timestamp,
    /// Download reference of the syllabus the student uploaded.
    #[serde(rename = "ESTRUTURA_CURRICULAR")]
    pub syllabus_url: String,
    #[serde(rename = "ID_DISCIPLINAS")]
    pub subject_ids: Vec<String>,
    #[serde(rename = "SITUACAO")]
    pub status: RequestStatus,
}

impl ExemptionRequest {
    /// A freshly submitted request, always OPEN.
    pub fn open(
        registration: &RegistrationId,
        syllabus_url: impl Into<String>,
        subject_ids: Vec<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            registration: registration.to_string(),
            created_at: now,
            syllabus_url: syllabus_url.into(),
            subject_ids,
            status: RequestStatus::Open,
        }
    }

    /// Placeholder row kept in the request collection.
    pub fn sentinel() -> Self {
        Self {
            registration: Collection::Requests.sentinel_key().to_string(),
            created_at: Timestamp::now(),
            syllabus_url: String::new(),
            subject_ids: Vec::new(),
            status: RequestStatus::Open,
        }
    }
}
