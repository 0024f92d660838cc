//! Mock infrastructure for testing against the OpenAI API
//!
//! All mocks are reusable across test files and cover success, error and
//! not-found scenarios.

#![allow(dead_code)]


pub use openai::*;
