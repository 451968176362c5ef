use crate::error::KVError;

/// KVStore holds short-lived, keyed state that does not belong in the
/// relational store (pending email verifications and similar tokens).
///
/// Keys are namespaced with `/`: `account/verify/{user_id}`.
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Set a key-value pair, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), KVError>;

    /// Remove a key and return its previous value in one step.
    fn take(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;
}
