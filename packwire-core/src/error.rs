// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Error type shared by every packwire module.
//!
//! Error constructors sit on the failure path of every codec read and
//! write. They are marked `#[cold]` so the hot paths stay small; keep the
//! attributes when adding new constructors.

use std::borrow::Cow;

use thiserror::Error;

/// Set `PACKWIRE_PANIC_ON_ERROR=1` at compile time to panic where an error
/// is created instead of returning it.
pub const PANIC_ON_ERROR: bool = option_env!("PACKWIRE_PANIC_ON_ERROR").is_some();

/// Returns whether errors panic at their creation site.
#[inline(always)]
pub const fn should_panic_on_error() -> bool {
    PANIC_ON_ERROR
}

/// Error type for block, codec, formatter and compression operations.
///
/// # Always use the constructor functions
///
/// Build errors through [`Error::buffer_out_of_bound`],
/// [`Error::invalid_format`] and the other constructors rather than the
/// variant syntax. The constructors accept anything convertible into a
/// `Cow<'static, str>` and honour `PACKWIRE_PANIC_ON_ERROR`.
///
/// ```rust
/// use packwire_core::error::Error;
///
/// let err = Error::invalid_format("unexpected map header");
/// let err = Error::truncated(16, 3);
/// let err = Error::buffer_too_small(9, 4);
/// assert_eq!(err.required_len(), Some(9));
/// ```
///
/// ## Debugging with `PACKWIRE_PANIC_ON_ERROR`
///
/// ```bash
/// RUST_BACKTRACE=1 PACKWIRE_PANIC_ON_ERROR=1 cargo test
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// An advance, rewind, slice or read crossed the bounds of a block.
    ///
    /// Do not construct this variant directly; use [`Error::buffer_out_of_bound`] instead.
    #[error("Buffer out of bound: {0} + {1} > {2}")]
    BufferOutOfBound(usize, usize, usize),

    /// A try-write destination is too small. `required` is the exact number
    /// of bytes the write needs.
    ///
    /// Do not construct this variant directly; use [`Error::buffer_too_small`] instead.
    #[error("Destination too small: {required} bytes required, {available} available")]
    BufferTooSmall { required: usize, available: usize },

    /// Malformed or unrecognized data.
    ///
    /// Do not construct this variant directly; use [`Error::invalid_format`] instead.
    #[error("{0}")]
    InvalidFormat(Cow<'static, str>),

    /// A format code that is not valid for the value being decoded.
    ///
    /// Do not construct this variant directly; use [`Error::unexpected_code`] instead.
    #[error("Unexpected format code 0x{code:02x} while reading {expected}")]
    UnexpectedCode { code: u8, expected: &'static str },

    /// Input ended before a fixed-size value or payload was complete.
    ///
    /// Do not construct this variant directly; use [`Error::truncated`] instead.
    #[error("Truncated input: {0} bytes required, {1} remaining")]
    Truncated(usize, usize),

    /// Releasing a block that is not bound to a provider, or releasing twice.
    ///
    /// Do not construct this variant directly; use [`Error::ownership`] instead.
    #[error("{0}")]
    Ownership(Cow<'static, str>),

    /// Compressed input is corrupt or does not decode to the expected length.
    ///
    /// Do not construct this variant directly; use [`Error::corrupted`] instead.
    #[error("{0}")]
    Corrupted(Cow<'static, str>),

    /// Text could not be decoded.
    ///
    /// Do not construct this variant directly; use [`Error::encoding_error`] instead.
    #[error("{0}")]
    EncodingError(Cow<'static, str>),

    /// Maximum nesting depth exceeded.
    ///
    /// Do not construct this variant directly; use [`Error::depth_exceed`] instead.
    #[error("{0}")]
    DepthExceed(Cow<'static, str>),

    /// Unsupported operation or value shape.
    ///
    /// Do not construct this variant directly; use [`Error::unsupported`] instead.
    #[error("{0}")]
    Unsupported(Cow<'static, str>),

    /// Generic error.
    ///
    /// Do not construct this variant directly; use [`Error::unknown`] instead.
    #[error("{0}")]
    Unknown(Cow<'static, str>),
}

impl Error {
    /// Creates a new [`Error::BufferOutOfBound`].
    ///
    /// ```
    /// use packwire_core::error::Error;
    ///
    /// let err = Error::buffer_out_of_bound(10, 20, 25);
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn buffer_out_of_bound(offset: usize, length: usize, capacity: usize) -> Self {
        let err = Error::BufferOutOfBound(offset, length, capacity);
        if PANIC_ON_ERROR {
            panic!("PACKWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::BufferTooSmall`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn buffer_too_small(required: usize, available: usize) -> Self {
        let err = Error::BufferTooSmall {
            required,
            available,
        };
        if PANIC_ON_ERROR {
            panic!("PACKWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::InvalidFormat`].
    ///
    /// ```
    /// use packwire_core::error::Error;
    ///
    /// let err = Error::invalid_format(format!("array of {} elements, expected {}", 3, 4));
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn invalid_format<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::InvalidFormat(s.into());
        if PANIC_ON_ERROR {
            panic!("PACKWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::UnexpectedCode`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn unexpected_code(code: u8, expected: &'static str) -> Self {
        let err = Error::UnexpectedCode { code, expected };
        if PANIC_ON_ERROR {
            panic!("PACKWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::Truncated`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn truncated(required: usize, remaining: usize) -> Self {
        let err = Error::Truncated(required, remaining);
        if PANIC_ON_ERROR {
            panic!("PACKWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::Ownership`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn ownership<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::Ownership(s.into());
        if PANIC_ON_ERROR {
            panic!("PACKWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::Corrupted`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn corrupted<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::Corrupted(s.into());
        if PANIC_ON_ERROR {
            panic!("PACKWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::EncodingError`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn encoding_error<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::EncodingError(s.into());
        if PANIC_ON_ERROR {
            panic!("PACKWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::DepthExceed`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn depth_exceed<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::DepthExceed(s.into());
        if PANIC_ON_ERROR {
            panic!("PACKWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::Unsupported`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn unsupported<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::Unsupported(s.into());
        if PANIC_ON_ERROR {
            panic!("PACKWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::Unknown`].
    ///
    /// ```
    /// use packwire_core::error::Error;
    ///
    /// let err = Error::unknown("Something went wrong");
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn unknown<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::Unknown(s.into());
        if PANIC_ON_ERROR {
            panic!("PACKWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Exact byte count a failed try-write needed, if this is a
    /// [`Error::BufferTooSmall`].
    pub fn required_len(&self) -> Option<usize> {
        match self {
            Error::BufferTooSmall { required, .. } => Some(*required),
            _ => None,
        }
    }

    /// Appends the Rust type name to format errors raised while decoding `T`.
    #[inline(never)]
    pub fn with_type_context<T: ?Sized + 'static>(err: Error) -> Error {
        match err {
            Error::InvalidFormat(s) => {
                let mut msg = s.into_owned();
                msg.push_str(" (type: ");
                msg.push_str(std::any::type_name::<T>());
                msg.push(')');
                Error::InvalidFormat(msg.into())
            }
            other => other,
        }
    }
}

/// Ensures a condition is true; otherwise returns an [`enum@Error`].
///
/// ```
/// use packwire_core::ensure;
/// use packwire_core::error::Error;
///
/// fn check_len(n: usize) -> Result<(), Error> {
///     ensure!(n > 0, "length must be positive");
///     ensure!(n < 10, Error::invalid_format("too long"));
///     ensure!(n != 5, "length {} is reserved", n);
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal) => {
        if !$cond {
            return Err($crate::error::Error::unknown($msg));
        }
    };
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::error::Error::unknown(format!($fmt, $($arg)*)));
        }
    };
}

/// Returns early with an [`enum@Error`].
///
/// ```
/// use packwire_core::bail;
/// use packwire_core::error::Error;
///
/// fn fail_fast() -> Result<(), Error> {
///     bail!("something went wrong");
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($crate::error::Error::unknown($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::unknown(format!($fmt, $($arg)*)))
    };
}
