//! Application layer for the HARUHI client.
//!
//! This crate provides use case implementations that coordinate between the
//! domain traits and a concrete front: transcript state, the chat flows
//! (send, switch, new session, directory sync, startup restore) and the FAQ
//! popup flows.

pub mod chat_usecase;
pub mod faq_usecase;
pub mod transcript;

pub use chat_usecase::ChatUseCase;
pub use faq_usecase::FaqUseCase;
pub use transcript::{Transcript, TranscriptSink};
