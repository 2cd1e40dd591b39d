//! Result/Option helpers used at repository call sites.
//!
//! # Responsibility
//! - Keep expected failures as values (`Result`/`Option`) end to end.
//! - Provide the one sanctioned conversion from an empty/failed value into a
//!   propagated failure (`unwrap_or_raise`).
//!
//! # Invariants
//! - Helpers are pure: no I/O, no logging, no panics.
//! - `Err`/`None` inputs are never inspected by mapping closures.
//! - `unwrap()` stays the native panicking accessor; it signals a programmer
//!   error and must not be used for expected failures.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default failure signal for `raise_unwrap_error`.
///
/// Carries a rendered description of the failed value, or `None` when the
/// source was an empty `Option`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnwrapError {
    detail: Option<String>,
}

impl UnwrapError {
    /// Signal for an empty `Option`.
    pub fn empty() -> Self {
        Self { detail: None }
    }

    /// Signal for a failed `Result`, keeping the error's rendering.
    pub fn from_error(error: impl Display) -> Self {
        Self {
            detail: Some(error.to_string()),
        }
    }

    /// Description of the failed value, if any.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl Display for UnwrapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "unwrap of error value: {detail}"),
            None => write!(f, "unwrap of empty value"),
        }
    }
}

impl Error for UnwrapError {}

/// Boundary helpers for `Result`.
pub trait ResultExt<T, E> {
    /// Returns the success value, or `Err(raise)` for the caller to
    /// propagate with `?`.
    fn unwrap_or_raise<X>(self, raise: X) -> Result<T, X>;

    /// Same as `unwrap_or_raise` with the default `UnwrapError` signal.
    fn raise_unwrap_error(self) -> Result<T, UnwrapError>
    where
        E: Display;

    /// Maps the success value with a fallible function.
    ///
    /// A failing `f` turns the result into `Err`. An existing `Err` is
    /// returned unchanged and `f` is never called.
    fn try_map<U, X, F>(self, f: F) -> Result<U, E>
    where
        F: FnOnce(T) -> Result<U, X>,
        X: Into<E>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn unwrap_or_raise<X>(self, raise: X) -> Result<T, X> {
        self.map_err(|_| raise)
    }

    fn raise_unwrap_error(self) -> Result<T, UnwrapError>
    where
        E: Display,
    {
        self.map_err(UnwrapError::from_error)
    }

    fn try_map<U, X, F>(self, f: F) -> Result<U, E>
    where
        F: FnOnce(T) -> Result<U, X>,
        X: Into<E>,
    {
        self.and_then(|value| f(value).map_err(Into::into))
    }
}

/// Boundary helpers for `Option`, where `None` acts as the failure arm.
pub trait OptionExt<T> {
    /// Returns the present value, or `Err(raise)`.
    fn unwrap_or_raise<X>(self, raise: X) -> Result<T, X>;

    /// Same as `unwrap_or_raise` with the default `UnwrapError` signal.
    fn raise_unwrap_error(self) -> Result<T, UnwrapError>;

    /// Maps the present value with a function that may itself yield nothing.
    fn try_map<U, F>(self, f: F) -> Option<U>
    where
        F: FnOnce(T) -> Option<U>;
}

impl<T> OptionExt<T> for Option<T> {
    fn unwrap_or_raise<X>(self, raise: X) -> Result<T, X> {
        self.ok_or(raise)
    }

    fn raise_unwrap_error(self) -> Result<T, UnwrapError> {
        self.ok_or_else(UnwrapError::empty)
    }

    fn try_map<U, F>(self, f: F) -> Option<U>
    where
        F: FnOnce(T) -> Option<U>,
    {
        self.and_then(f)
    }
}
