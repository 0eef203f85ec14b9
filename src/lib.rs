//! Simulated hierarchical filesystem with permission-aware files, a
//! cursor-based command console and a flat text snapshot format.

#![allow(clippy::enum_variant_names)]

pub mod application;
pub mod cli;
pub mod config;
pub mod filesystem;
pub mod shell;
pub mod snapshot;
