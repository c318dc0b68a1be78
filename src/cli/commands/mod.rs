//! Command implementations for protected-keys CLI

pub mod add;
pub mod completion;
pub mod config;
pub mod remove;
pub mod status;
pub mod version;
