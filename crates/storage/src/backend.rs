//! Raw key-value backend abstraction
//!
//! A `RawBackend` is the narrowest possible persistence surface: string keys,
//! string values, get/set/remove. It knows nothing about collections, JSON or
//! records; namespacing and encoding happen in [`crate::StorageAdapter`].
//!
//! Implementations use interior mutability (`&self` receivers) so one backend
//! can be shared by several adapters through an `Arc`.

use docstore_core::Result;

/// Key-value persistence consumed by the storage adapter
///
/// Thread safety: implementations must be `Send + Sync`. The record store
/// assumes a single logical writer per collection; backends do not need to
/// coordinate concurrent read-modify-write sequences.
pub trait RawBackend: Send + Sync {
    /// Read the value stored under `key`
    ///
    /// Returns `None` if the key is absent.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: String) -> Result<()>;

    /// Remove `key`; removing an absent key is not an error
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Short human-readable backend name, used in logs
    fn name(&self) -> &'static str {
        "custom"
    }
}
