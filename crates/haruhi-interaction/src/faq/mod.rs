//! FAQ source implementations.
//!
//! Both implement the same `FaqSource` trait; configuration picks one.

mod backend;
mod direct;

pub use backend::BackendFaqSource;
pub use direct::DirectFaqSource;
