//! Provenance — BLAKE3 output hashing and the JSONL run log.

pub mod eventlog;
pub mod hasher;
