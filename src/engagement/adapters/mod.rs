//! Adapter implementations of the engagement ports.

pub mod memory;
