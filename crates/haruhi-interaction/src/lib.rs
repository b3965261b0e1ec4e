pub mod api;
pub mod faq;

pub use crate::api::HaruhiApi;
pub use crate::faq::{BackendFaqSource, DirectFaqSource};
