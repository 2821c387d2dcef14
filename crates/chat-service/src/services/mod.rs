//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] for the duration of a
//! request.

pub mod context;
pub mod error;
pub mod identity;
pub mod message;
pub mod notification;
pub mod presence;

pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use identity::IdentityService;
pub use message::MessageService;
pub use notification::{FanOutReport, NotificationService};
pub use presence::PresenceService;
