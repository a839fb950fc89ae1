pub mod calendar;
pub mod chat;
pub mod config;
pub mod error;
pub mod events;
pub mod geo;
pub mod notify;
pub mod proximity;
pub mod ui;

pub use error::{Error, ErrorKind, Result};
