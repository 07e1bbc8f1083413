//! Error types

mod color;
mod config;
mod server;
mod store;

pub use color::*;
pub use config::*;
pub use server::*;
pub use store::*;
