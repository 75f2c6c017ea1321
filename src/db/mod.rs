//! Local key-value storage layer.

pub mod local_store;

pub use local_store::LocalStore;

/// Storage keys, shared with the browser extension's own storage layout.
pub mod keys {
    pub const ENCRYPTED_TOKEN: &str = "encryptedToken";
    pub const IV: &str = "iv";
    pub const ENCRYPTION_KEY: &str = "encryptionKey";
    pub const GITHUB_USERNAME: &str = "githubUsername";
    /// Map of username → stats
    pub const USER_STATS: &str = "userStats";
    pub const THEME: &str = "theme";
}
