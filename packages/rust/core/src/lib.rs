//! Core pipeline orchestration for qsocat.
//!
//! This crate ties together record generation, catalogue validation and
//! site rendering into end-to-end workflows (`generate`, `validate`,
//! `build`).

pub mod pipeline;
pub mod site;
