//! BLAKE3 hashing of captured process output.

/// Hash a string. Returns `"blake3:{hex}"`.
pub fn hash_string(s: &str) -> String {
    format!("blake3:{}", blake3::hash(s.as_bytes()).to_hex())
}

/// Hash stdout and stderr of one run. Returns `(stdout_hash, stderr_hash)`.
pub fn hash_streams(stdout: &str, stderr: &str) -> (String, String) {
    (hash_string(stdout), hash_string(stderr))
}
