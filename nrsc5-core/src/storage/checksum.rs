use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::models::error::RadioError;

/// SHA-256 hex digest of a byte slice.
pub fn sha256_hex(data: &[u8]) -> String {
    hex_encode(&Sha256::digest(data))
}

/// SHA-256 hex digest of a file.
pub fn sha256_file(path: &Path) -> Result<String, RadioError> {
    let data = fs::read(path)
        .map_err(|e| RadioError::StorageError(format!("failed to read file for checksum: {}", e)))?;
    Ok(sha256_hex(&data))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_of_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
