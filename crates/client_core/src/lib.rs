//! Client side of the agent pipeline: HTTP transport, settings and the session controller.

pub mod config;
pub mod controller;
pub mod error;
pub mod transport;

pub use config::{load_settings, ClientSettings};
pub use controller::{OperationState, SessionController, SessionSnapshot};
pub use error::InvokeError;
pub use transport::{AgentTransport, Endpoint, HttpAgentClient};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
