//! Exemption Desk - Fulfillment webhook for subject exemption requests
//!
//! Students talk to a dialogue agent that classifies each utterance into an
//! intent; this crate answers the agent's fulfillment calls by querying and
//! updating the course catalogue and the exemption requests.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
