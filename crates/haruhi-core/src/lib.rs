pub mod backend;
pub mod config;
pub mod error;
pub mod faq;
pub mod session;
pub mod state;

// Re-export common error type
pub use error::HaruhiError;
