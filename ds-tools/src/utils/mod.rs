//! Shared utilities for the ds-tools CLI

pub mod format;
pub mod tree;

pub use format::*;
pub use tree::*;
