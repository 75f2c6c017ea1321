//! Stored GitHub credential.

use serde::{Deserialize, Serialize};

/// The single signed-in account's credential, as kept in the local store.
///
/// The encryption key sits next to the ciphertext, so this only keeps the
/// token out of casual view of the store file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    /// AES-GCM ciphertext of the access token, tag appended (base64)
    pub encrypted_token: String,
    /// 12-byte nonce used for `encrypted_token` (base64)
    pub iv: String,
    /// Raw 256-bit key (base64)
    pub encryption_key: String,
    /// GitHub login the token belongs to
    pub username: String,
}
