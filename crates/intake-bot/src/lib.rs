//! Training registration intake bot.
//!
//! Collects a participant's name, phone number and payment receipt photo
//! over Telegram, one message at a time, and forwards the finished
//! registration to a single operator chat.

pub mod api;
pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod flow;
pub mod registrar;
pub mod relay;

pub use crate::config::Config;
pub use dispatcher::Dispatcher;
pub use error::{AppError, AppResult};
pub use registrar::Registrar;
pub use relay::{AdminRelay, RelayError};
