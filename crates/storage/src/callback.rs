//! CallbackBackend: a raw backend assembled from closures
//!
//! Used to bridge storage that is only reachable through callbacks (an FFI
//! host, a scripting runtime, a test double). Each of the three operations
//! is supplied separately and the set is validated once, at build time:
//! a backend missing any operation is rejected with `InvalidArgument`.
//!
//! ```ignore
//! let backend = CallbackBackend::builder()
//!     .get_item(move |k| Ok(host.read(k)))
//!     .set_item(move |k, v| host.write(k, v))
//!     .remove_item(move |k| host.erase(k))
//!     .build()?;
//! ```

use std::fmt;

use docstore_core::{Error, Result};

use crate::backend::RawBackend;

type GetFn = Box<dyn Fn(&str) -> Result<Option<String>> + Send + Sync>;
type SetFn = Box<dyn Fn(&str, String) -> Result<()> + Send + Sync>;
type RemoveFn = Box<dyn Fn(&str) -> Result<()> + Send + Sync>;

/// Raw backend whose operations are closures
pub struct CallbackBackend {
    get: GetFn,
    set: SetFn,
    remove: RemoveFn,
}

impl CallbackBackend {
    /// Start assembling a callback backend
    pub fn builder() -> CallbackBackendBuilder {
        CallbackBackendBuilder::default()
    }
}

impl fmt::Debug for CallbackBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackBackend").finish_non_exhaustive()
    }
}

impl RawBackend for CallbackBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (self.get)(key)
    }

    fn set_item(&self, key: &str, value: String) -> Result<()> {
        (self.set)(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (self.remove)(key)
    }

    fn name(&self) -> &'static str {
        "callback"
    }
}

/// Builder for [`CallbackBackend`]
#[derive(Default)]
pub struct CallbackBackendBuilder {
    get: Option<GetFn>,
    set: Option<SetFn>,
    remove: Option<RemoveFn>,
}

impl CallbackBackendBuilder {
    /// Supply the read operation
    pub fn get_item<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<Option<String>> + Send + Sync + 'static,
    {
        self.get = Some(Box::new(f));
        self
    }

    /// Supply the write operation
    pub fn set_item<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, String) -> Result<()> + Send + Sync + 'static,
    {
        self.set = Some(Box::new(f));
        self
    }

    /// Supply the remove operation
    pub fn remove_item<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<()> + Send + Sync + 'static,
    {
        self.remove = Some(Box::new(f));
        self
    }

    /// Validate and build
    ///
    /// # Errors
    ///
    /// `InvalidArgument` listing every missing operation.
    pub fn build(self) -> Result<CallbackBackend> {
        match (self.get, self.set, self.remove) {
            (Some(get), Some(set), Some(remove)) => Ok(CallbackBackend { get, set, remove }),
            (get, set, remove) => {
                let missing: Vec<&str> = [
                    (get.is_none(), "get_item"),
                    (set.is_none(), "set_item"),
                    (remove.is_none(), "remove_item"),
                ]
                .into_iter()
                .filter_map(|(absent, name)| absent.then_some(name))
                .collect();
                Err(Error::invalid_argument(format!(
                    "storage backend doesn't provide {}",
                    missing.join(", ")
                )))
            }
        }
    }
}
