//! Quiz Utility Functions
//!
//! ## Current API
//!
//! - List, create, update, and delete questions
//! - Score a quiz submission
//!
pub mod error;
pub mod question;
pub mod score;
