//! citywx library
//!
//! This module exposes the CLI, data, and pagination modules for use in
//! integration tests.

pub mod cli;
pub mod data;
pub mod pagination;
