//! Per-user digest counter maintenance.
//!
//! The dashboard digest shows a denormalized count of open engagement work
//! per user. This module keeps that counter in sync via delta arithmetic.
//! It never recomputes the value from a full task enumeration, so
//! independent decrements from other flows are preserved.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
