//! Exemption module - Courses, subjects, students and exemption requests.

mod catalog;
mod collection;
mod reference_data;
mod request;
mod student;

pub use catalog::{Course, Subject};
pub use collection::{fields, Collection};
pub use reference_data::ReferenceData;
pub use request::{ExemptionRequest, RequestStatus};
pub use student::Student;
