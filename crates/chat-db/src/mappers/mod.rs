//! Entity <-> model mappers
//!
//! - `From<Model> for Entity` (or `TryFrom` where a column can be invalid)
//! - [`NotificationColumns`] prepares a batch for a single `UNNEST` insert

mod channel;
mod message;
mod notification;
mod user;

pub use notification::NotificationColumns;
