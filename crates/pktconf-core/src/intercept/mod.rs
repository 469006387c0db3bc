//! Observable attributes: writes that trigger a side effect.
//!
//! An [`Interceptor`] describes one attribute.  It does not hold the value
//! itself: the value lives in the owning object's [`AttributeStore`] under a
//! private key, so one interceptor can serve many owners without them sharing
//! state.
//!
//! ```text
//! set(owner, v)  ──►  owner.store("_intercepted_<name>", v)  ──►  hook(owner, name, v, args)
//! get(owner)     ──►  owner.load(...)  or  store(default) then return it
//! ```
//!
//! Hook errors are returned to the writer as-is.  Hooks that must never fail a
//! write (the prompt refresher, for instance) swallow their own errors.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

pub mod log_level;
pub mod prompt;

/// Prefix of the private storage key used by every interceptor.
const STORAGE_PREFIX: &str = "_intercepted_";

/// Per-owner attribute storage an [`Interceptor`] reads from and writes to.
///
/// Stores use interior mutability so that reads, which may materialise a
/// default, only need a shared reference.
pub trait AttributeStore<V> {
    /// Returns the value stored under `key`, if any.
    fn load(&self, key: &str) -> Option<V>;
    /// Stores `value` under `key`, replacing any previous value.
    fn store(&self, key: &str, value: V);
}

/// Error raised by a write hook.
#[derive(Debug, Error, PartialEq)]
pub enum HookError {
    /// The hook rejected the new value of `attribute`.
    #[error("write hook for `{attribute}` failed: {reason}")]
    Failed { attribute: String, reason: String },
}

/// Extra arguments bound at construction and handed to every hook call.
#[derive(Debug, Clone, PartialEq)]
pub struct HookArgs<V> {
    pub positional: Vec<V>,
    pub keyword: BTreeMap<String, V>,
}

impl<V> Default for HookArgs<V> {
    fn default() -> Self {
        Self {
            positional: Vec::new(),
            keyword: BTreeMap::new(),
        }
    }
}

/// Callback run after every write: `(owner, attribute name, new value, extra args)`.
pub type WriteHook<O, V> = Box<dyn Fn(&O, &str, &V, &HookArgs<V>) -> Result<(), HookError>>;

/// Descriptor for one observable attribute.
pub struct Interceptor<O, V> {
    name: String,
    storage_key: String,
    default: V,
    hook: WriteHook<O, V>,
    args: HookArgs<V>,
}

impl<O, V> Interceptor<O, V>
where
    O: AttributeStore<V>,
    V: Clone,
{
    /// Creates an interceptor for attribute `name`.
    ///
    /// `default` is materialised into the owner's storage on the first read
    /// that finds nothing stored.
    pub fn new<F>(name: impl Into<String>, default: V, hook: F) -> Self
    where
        F: Fn(&O, &str, &V, &HookArgs<V>) -> Result<(), HookError> + 'static,
    {
        let name = name.into();
        Self {
            storage_key: format!("{STORAGE_PREFIX}{name}"),
            name,
            default,
            hook: Box::new(hook),
            args: HookArgs::default(),
        }
    }

    /// Binds extra arguments forwarded to every hook call.
    pub fn with_args(mut self, args: HookArgs<V>) -> Self {
        self.args = args;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key under which owners store this attribute.
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Returns the owner's value, storing the default first if nothing is set.
    pub fn get(&self, owner: &O) -> V {
        if let Some(value) = owner.load(&self.storage_key) {
            return value;
        }
        owner.store(&self.storage_key, self.default.clone());
        self.default.clone()
    }

    /// Stores `value` on `owner`, then runs the hook exactly once.
    ///
    /// # Errors
    ///
    /// Returns whatever the hook returns.  The value stays stored even when the
    /// hook fails.
    pub fn set(&self, owner: &O, value: V) -> Result<(), HookError> {
        owner.store(&self.storage_key, value.clone());
        (self.hook)(owner, &self.name, &value, &self.args)
    }
}

impl<O, V: fmt::Debug> fmt::Debug for Interceptor<O, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("name", &self.name)
            .field("storage_key", &self.storage_key)
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}
