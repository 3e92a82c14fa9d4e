//! Adapter implementations of the digest ports.

pub mod memory;
