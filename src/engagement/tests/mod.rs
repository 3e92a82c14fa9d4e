//! Unit tests for the engagement domain and services.

pub mod support;
