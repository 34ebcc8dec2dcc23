//! Retrieval-augmented answering over the shared collection

mod chat;

pub use chat::ChatService;
