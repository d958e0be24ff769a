//! Course and subject reference entities.

use serde::{Deserialize, Serialize};

use super::collection::Collection;

/// A degree course offered by the university.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    #[serde(rename = "ID_CURSO")]
    pub code: String,
    #[serde(rename = "NOME")]
    pub name: String,
}

impl Course {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Placeholder row kept in the course collection.
    pub fn sentinel() -> Self {
        Self::new(Collection::Courses.sentinel_key(), "MOCK")
    }

    /// `"{code} - {name}"` listing line.
    pub fn listing_line(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }
}

/// A subject of a course that a student may ask to be exempted from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(rename = "ID_DISCIPLINA")]
    pub id: String,
    #[serde(rename = "ID_CURSO")]
    pub course: String,
    #[serde(rename = "CARGA_HORARIA")]
    pub credit_hours: u32,
    #[serde(rename = "NOME")]
    pub name: String,
}

impl Subject {
    /// Placeholder row kept in the subject collection.
    pub fn sentinel() -> Self {
        Self {
            id: Collection::Subjects.sentinel_key().to_string(),
            course: Collection::Courses.sentinel_key().to_string(),
            credit_hours: 0,
            name: "MOCK".to_string(),
        }
    }
}
