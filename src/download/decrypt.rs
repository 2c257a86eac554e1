use crate::{Result, TankobonError};

/// XORs `data` in place with the repeating `key`
///
/// Applying the same key twice restores the original bytes. An empty key leaves the
/// data untouched.
pub fn xor_with_key(data: &mut [u8], key: &[u8]) {
    if key.is_empty() {
        return;
    }

    for (byte, k) in data.iter_mut().zip(key.iter().cycle()) {
        *byte ^= k;
    }
}

/// Decrypts an encrypted page payload in place using a hex-encoded key
///
/// # Errors
///
/// Returns [`TankobonError::InvalidKey`] when `key_hex` is not valid, non-empty hex.
pub fn decrypt_image(data: &mut [u8], key_hex: &str) -> Result<()> {
    let key = hex::decode(key_hex.trim())
        .map_err(|e| TankobonError::InvalidKey(format!("{}: {}", key_hex, e)))?;

    if key.is_empty() {
        return Err(TankobonError::InvalidKey("empty key".to_string()));
    }

    xor_with_key(data, &key);
    Ok(())
}
