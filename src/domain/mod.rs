//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `exemption` - Courses, subjects, students, exemption requests and the reference catalogue
//! - `conversation` - Intents, carried context, subject selection and reply assembly

pub mod conversation;
pub mod exemption;
pub mod foundation;
