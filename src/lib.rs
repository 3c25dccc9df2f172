//! Provinit — run an infrastructure-as-code tool's init step and report it.
//!
//! One external command, fully captured output, verbatim report.
//! Optional JSONL provenance log with BLAKE3 output hashes.

pub mod cli;
pub mod core;
pub mod provenance;
pub mod transport;
