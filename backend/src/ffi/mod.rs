//! FFI (Foreign Function Interface) module
//!
//! PyO3 bindings exposing the matching engine to the Python plotting layer.
//!
//! # Design Principles
//!
//! 1. **Minimal boundary**: only the step call and read-only queries
//! 2. **Simple types**: floats, ints, dicts and lists at the boundary
//! 3. **Safe errors**: every Rust error becomes a Python exception
//! 4. **No references**: Python gets copies, never references to Rust state

pub mod market;
pub mod types;
