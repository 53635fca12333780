//! Common types and utilities shared by the gridsolve engines.

pub mod board;
pub mod cancel;
pub mod error;
pub mod event;
pub mod grid;
