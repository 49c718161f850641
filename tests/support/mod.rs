//! Shared fixtures for integration tests.
#![allow(dead_code)]

pub mod mock_model;

pub use mock_model::*;
