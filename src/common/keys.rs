use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;

const NAME_ENTROPY_BYTES: usize = 32;

/// A fresh object name: 32 random bytes, URL-safe base64, plus extension.
pub fn random_object_name(extension: &str) -> String {
    let mut bytes = [0u8; NAME_ENTROPY_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    format!("{}.{}", URL_SAFE_NO_PAD.encode(bytes), extension)
}

/// `<prefix>/<random>.<extension>`
pub fn storage_key(prefix: &str, extension: &str) -> String {
    format!("{}/{}", prefix, random_object_name(extension))
}
