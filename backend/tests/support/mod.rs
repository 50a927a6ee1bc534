//! Shared helpers for the backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! each test file pulls these in with `mod support;`.

#![allow(dead_code)]

pub mod harness;
pub mod in_memory;
