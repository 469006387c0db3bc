//! Capability probes and the crypto gate.

use thiserror::Error;
use tracing::warn;

use super::Conf;

/// A required optional dependency is missing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DependencyError {
    #[error("cannot execute crypto-related operation: crypto support is not available")]
    CryptoUnavailable,
}

/// Whether the toolkit runs on an alternative, JIT-compiled runtime.  Native
/// builds never do.
pub fn is_pypy() -> bool {
    false
}

/// Wraps `func` so that it only runs when `conf` reports a usable crypto
/// backend (`crypto_valid`).
///
/// The check happens on every call, so flipping `crypto_valid` later takes
/// effect immediately.
///
/// ```
/// use pktconf_core::{crypto_validator, Conf, DependencyError, SettingValue};
///
/// let double = crypto_validator(|_: &Conf, n: u32| n * 2);
/// let conf = Conf::new();
/// assert_eq!(double(&conf, 4), Err(DependencyError::CryptoUnavailable));
///
/// conf.set("crypto_valid", SettingValue::Bool(true)).unwrap();
/// assert_eq!(double(&conf, 4), Ok(8));
/// ```
pub fn crypto_validator<F, A, R>(func: F) -> impl Fn(&Conf, A) -> Result<R, DependencyError>
where
    F: Fn(&Conf, A) -> R,
{
    move |conf: &Conf, args: A| {
        if !conf.crypto_valid() {
            warn!("crypto-related operation refused: crypto_valid is false");
            return Err(DependencyError::CryptoUnavailable);
        }
        Ok(func(conf, args))
    }
}
