//! Transport — launching the external provisioning tool.
//!
//! Only local execution: the provisioning tool itself handles any
//! remote cloud access.

pub mod local;

pub use local::exec_command;
