//! Data models for the asset desk
//!
//! `asset` holds the server-owned records and wire envelopes, `pending` holds
//! the client-side queue entries that exist only until submission.

mod asset;
mod pending;

pub use asset::*;
pub use pending::*;
