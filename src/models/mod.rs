//! Data models for the travelhub service
//!
//! All records are transient: they are built for a single request and
//! serialized to the UI with camelCase field names.
//! - Record: normalized hotel, restaurant, rental and tour search results
//! - Destination: a place resolved to an upstream destination id
//! - Product: a bookable tour offering
//! - Chat: conversation turns exchanged with the assistant

pub mod chat;
pub mod destination;
pub mod product;
pub mod record;

pub use chat::{ChatMessage, Role};
pub use destination::{Destination, DestinationLocation};
pub use product::{Price, Product};
pub use record::{ResourceKind, SearchResult};
