//! Convoy Core
//!
//! Core types for the Convoy work-unit pipeline.
//!
//! This crate contains:
//! - Domain types: unit statuses, snapshots, and execution results
//! - The error taxonomy shared across the workspace
//!
//! Note: execution logic lives in the pipeline crate; this crate is pure
//! data so that front ends can inspect results without pulling in the
//! engine.

pub mod domain;
pub mod error;
