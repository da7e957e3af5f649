//! # huddle-store
//!
//! Client-side state of the Huddle chat client.
//!
//! The [`EntityStore`] is a normalized, merge-only cache of chats, users and
//! messages. [`ChatsState`] holds everything about chats that is not an
//! entity: list order, per-resource fetch states ([`pagination`]), member
//! lists, typing sets and the current selection. [`views`] derives the
//! records list and detail screens render from.

pub mod chats;
pub mod entities;
pub mod models;
pub mod pagination;
pub mod views;

pub use chats::{ChatsState, MemberList};
pub use entities::EntityStore;
pub use models::*;
pub use pagination::{LastMessageState, LoadState, PageRequest, PageState};
