//! Shared helpers for the skel-anim workspace

pub mod debug;
