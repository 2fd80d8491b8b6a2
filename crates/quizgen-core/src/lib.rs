//! quizgen-core: Quiz model, prompt building, response validation, and
//! the session engine.
//!
//! This crate defines the data model, error taxonomy and traits that the
//! provider, store and CLI crates build on.

pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod session;
pub mod traits;
