mod application;
pub mod data;
mod runtime_config;

pub use application::{Application, ApplicationError, Startup};
pub use runtime_config::RuntimeConfig;
