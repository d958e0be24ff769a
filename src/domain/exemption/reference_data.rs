//! Embedded reference catalogue (courses and subjects).

use once_cell::sync::Lazy;
use serde::Deserialize;

use super::catalog::{Course, Subject};

const RAW_REFERENCE_DATA: &str = include_str!("reference_data.yaml");

#[derive(Debug, Deserialize)]
struct RawCourse {
    code: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawSubject {
    id: String,
    course: String,
    hours: u32,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawReferenceData {
    courses: Vec<RawCourse>,
    subjects: Vec<RawSubject>,
}

/// Fixed dataset the seeder reconciles the reference collections against.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub courses: Vec<Course>,
    pub subjects: Vec<Subject>,
}

impl ReferenceData {
    /// Parses a catalogue document.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        let raw: RawReferenceData = serde_yaml::from_str(text)?;
        Ok(Self {
            courses: raw
                .courses
                .into_iter()
                .map(|c| Course::new(c.code, c.name))
                .collect(),
            subjects: raw
                .subjects
                .into_iter()
                .map(|s| Subject {
                    id: s.id,
                    course: s.course,
                    credit_hours: s.hours,
                    name: s.name,
                })
                .collect(),
        })
    }

    /// The catalogue compiled into the binary.
    pub fn embedded() -> &'static ReferenceData {
        &EMBEDDED
    }
}

static EMBEDDED: Lazy<ReferenceData> = Lazy::new(|| {
    ReferenceData::from_yaml(RAW_REFERENCE_DATA).expect("embedded reference catalogue must parse")
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn embedded_catalogue_parses() {
        let data = ReferenceData::embedded();
        assert_eq!(data.courses.len(), 1);
        assert_eq!(data.courses[0].code, "BCC");
        assert_eq!(data.subjects.len(), 79);
    }

    #[test]
    fn subject_ids_are_unique() {
        let data = ReferenceData::embedded();
        let ids: HashSet<_> = data.subjects.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), data.subjects.len());
    }

    #[test]
    fn every_subject_belongs_to_a_known_course() {
        let data = ReferenceData::embedded();
        let codes: HashSet<_> = data.courses.iter().map(|c| c.code.as_str()).collect();
        assert!(data.subjects.iter().all(|s| codes.contains(s.course.as_str())));
    }

    #[test]
    fn from_yaml_reports_malformed_documents() {
        assert!(ReferenceData::from_yaml("courses: 3").is_err());
    }
}
