//! Shared utilities for the skel-rs CLI

pub mod io;
pub mod tree;

pub use io::*;
pub use tree::*;
