//! Student entity.

use serde::{Deserialize, Serialize};

use super::collection::Collection;
use crate::domain::foundation::{CourseCode, RegistrationId, Timestamp};

/// A student known to the exemption desk.
///
/// Created on the first successful file submission and refreshed on later
/// submissions; `created_at` never changes after the first write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "MATRICULA")]
    pub registration: String,
    #[serde(rename = "ID_CURSO")]
    pub course: String,
    #[serde(rename = "NOME_COMPLETO", default)]
    pub full_name: String,
    #[serde(rename = "DATA_CADASTRO")]
    pub created_at: Timestamp,
    #[serde(rename = "DATA_ATUALIZACAO")]
    pub updated_at: Timestamp,
}

impl Student {
    /// A student registered now.
    pub fn register(registration: &RegistrationId, course: &CourseCode, now: Timestamp) -> Self {
        Self {
            registration: registration.to_string(),
            course: course.to_string(),
            full_name: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Same student, keeping the original creation time.
    pub fn preserving_created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = created_at;
        self
    }

    /// Placeholder row kept in the student collection.
    pub fn sentinel() -> Self {
        let now = Timestamp::now();
        Self {
            registration: Collection::Students.sentinel_key().to_string(),
            course: Collection::Courses.sentinel_key().to_string(),
            full_name: "MOCK".to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_sets_both_timestamps() {
        let now = Timestamp::now();
        let student = Student::register(
            &RegistrationId::new("a1").unwrap(),
            &CourseCode::new("bcc").unwrap(),
            now,
        );
        assert_eq!(student.registration, "A1");
        assert_eq!(student.course, "BCC");
        assert_eq!(student.created_at, now);
        assert_eq!(student.updated_at, now);
    }

    #[test]
    fn preserving_created_at_only_touches_creation() {
        let original = Timestamp::parse("2022-01-01T00:00:00Z").unwrap();
        let now = Timestamp::now();
        let student = Student::register(
            &RegistrationId::new("a1").unwrap(),
            &CourseCode::new("bcc").unwrap(),
            now,
        )
        .preserving_created_at(original);
        assert_eq!(student.created_at, original);
        assert_eq!(student.updated_at, now);
    }

    #[test]
    fn missing_full_name_defaults_to_empty() {
        let doc = serde_json::json!({
            "MATRICULA": "A1",
            "ID_CURSO": "BCC",
            "DATA_CADASTRO": "2022-01-01T00:00:00Z",
            "DATA_ATUALIZACAO": "2022-01-01T00:00:00Z"
        });
        let student: Student = serde_json::from_value(doc).unwrap();
        assert!(student.full_name.is_empty());
    }
}
