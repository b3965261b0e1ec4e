pub mod paths;
pub mod settings;
pub mod state_repository;
pub mod storage;

pub use crate::state_repository::StateRepositoryImpl;
