//! Client state domain.

pub mod model;
pub mod repository;

pub use model::ClientState;
pub use repository::StateRepository;
