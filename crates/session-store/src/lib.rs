//! In-memory registration session storage.
//!
//! Sessions live only in process memory and are lost on restart.
//! Abandoned sessions are kept until the participant starts over.

mod store;
mod types;

pub use store::SessionStore;
pub use types::*;
