//! API Lambda handler and request processing

pub mod envelope;
pub mod handler;
pub mod parsing;

// Re-export the main handler for convenience
pub use handler::handler;
