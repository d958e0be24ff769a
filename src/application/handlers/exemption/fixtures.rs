//! Test fixtures for the exemption handlers.

use serde_json::{json, Value};

use crate::adapters::storage::InMemoryDocumentStore;
use crate::domain::exemption::{Collection, Course, ExemptionRequest, Student, Subject};
use crate::ports::{to_fields, Fields};

pub(crate) fn fields(value: Value) -> Fields {
    value.as_object().cloned().unwrap()
}

/// `count` subjects of `course`, ids `{course}000`, `{course}001`, ...
pub(crate) fn subjects(course: &str, count: usize) -> Vec<Subject> {
    (0..count)
        .map(|i| Subject {
            id: format!("{}{:03}", course, i),
            course: course.to_string(),
            credit_hours: 72,
            name: format!("Subject number {} of {}", i, course),
        })
        .collect()
}

/// Store holding the given courses with that many subjects each.
///
/// Subjects are inserted in reverse id order so tests see the store
/// ordering at work.
pub(crate) async fn catalog_store(courses: &[(&str, usize)]) -> InMemoryDocumentStore {
    let store = InMemoryDocumentStore::new();
    for (code, subject_count) in courses {
        let course = Course::new(*code, format!("Course {}", code));
        store
            .insert(Collection::Courses, to_fields(&course).unwrap())
            .await;
        for subject in subjects(code, *subject_count).iter().rev() {
            store
                .insert(Collection::Subjects, to_fields(subject).unwrap())
                .await;
        }
    }
    store
}

pub(crate) async fn insert_sentinels(store: &InMemoryDocumentStore) {
    store
        .insert(Collection::Students, to_fields(&Student::sentinel()).unwrap())
        .await;
    store
        .insert(Collection::Courses, to_fields(&Course::sentinel()).unwrap())
        .await;
    store
        .insert(Collection::Subjects, to_fields(&Subject::sentinel()).unwrap())
        .await;
    store
        .insert(
            Collection::Requests,
            to_fields(&ExemptionRequest::sentinel()).unwrap(),
        )
        .await;
}

pub(crate) async fn insert_request(
    store: &InMemoryDocumentStore,
    registration: &str,
    created_at: &str,
    status: &str,
) {
    store
        .insert(
            Collection::Requests,
            fields(json!({
                "MATRICULA": registration,
                "DATA_CADASTRO": created_at,
                "ESTRUTURA_CURRICULAR": "https://files.example/plan.pdf",
                "ID_DISCIPLINAS": ["BCC000"],
                "SITUACAO": status
            })),
        )
        .await;
}
