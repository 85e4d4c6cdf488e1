//! Core domain types
//!
//! This module contains the structures shared between the pipeline engine
//! (which executes units) and anything that displays or inspects them.
//! Values here use snapshot semantics: whatever crosses the worker/store
//! boundary is a plain serializable copy, never a live handle.

pub mod result;
pub mod unit;
