//! Core primitives shared by every part of the engine

pub mod time;
