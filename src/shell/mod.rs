//! Console front end: line parsing and command dispatch.

mod command;
mod session;

pub use command::{Command, USAGE};
pub use session::Session;
