//! Core logic — types, config parsing, the provisioning initializer.

pub mod initializer;
pub mod parser;
pub mod types;
