//! Types shared by the Huddle store and client crates: identifiers, the
//! wire payloads of the remote messaging API and its endpoint constants.

pub mod constants;
pub mod error;
pub mod protocol;
pub mod types;

pub use error::ApiError;
pub use types::{ChatId, MessageId, UserId};
