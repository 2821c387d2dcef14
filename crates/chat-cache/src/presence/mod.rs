//! Presence storage module.
//!
//! Holds the typing records behind the chat-core `TypingRepository` port.

mod typing;

pub use typing::RedisTypingRepository;
