//! Helpdesk client library
//!
//! The client-side layer of an IT helpdesk: searchable and exportable
//! tables, multi-step dialog forms with validation, audit-trail queries and
//! printable records. Persistence and business rules stay on the server,
//! reached through the [`bridge::Backend`] trait.

pub mod audit;
pub mod bridge;
pub mod error;
pub mod form;
pub mod model;
pub mod print;
pub mod table;

pub use bridge::Backend;
pub use bridge::BackendRequest;
