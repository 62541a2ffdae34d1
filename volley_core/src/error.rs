// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by every fallible engine operation.
//!
//! All failures are local and synchronous: they propagate out of the
//! [`Play::step`](crate::gun::Play::step) call that hit them, and no
//! combinator catches or retries a child's failure. A host should treat an
//! error as fatal to the pattern instance that produced it.

use alloc::string::String;
use core::fmt;

/// Errors raised while building fire data or stepping a gun tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GunError {
    /// A named repeat position was requested but no repetition with that
    /// name is active.
    UnknownRepeatName(String),
    /// `finish` was called while only the permanent root repetition remained.
    RepeatUnderflow,
    /// `finish` was called with a repetition that is not the innermost one
    /// for its stack.
    RepeatMismatch,
    /// An `iterate` value ran past the end of its list with no default.
    IterateOutOfRange {
        /// Repeat position that was requested.
        index: usize,
        /// Number of values available.
        len: usize,
    },
    /// A parameter operation targeted a name that was never set.
    UnsetParameter(String),
    /// A virtual muzzle was used before being bound to a base muzzle.
    MuzzleNotBound,
    /// A bullet was fired while the firing state had no muzzle.
    NoMuzzleSet,
    /// The player has no muzzle registered under this name.
    UnknownMuzzle(String),
    /// The player cannot resolve a location with this name.
    UnknownLocation(String),
    /// A [`GunPlayer`](crate::player::GunPlayer) was ticked before `start`.
    NotStarted,
}

impl fmt::Display for GunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRepeatName(name) => write!(f, "no active repetition named `{name}`"),
            Self::RepeatUnderflow => f.write_str("repeat finished with no repetition in progress"),
            Self::RepeatMismatch => f.write_str("repeat finished out of nesting order"),
            Self::IterateOutOfRange { index, len } => {
                write!(f, "iterate index {index} is out of range for {len} values")
            }
            Self::UnsetParameter(name) => write!(f, "parameter `{name}` is not set"),
            Self::MuzzleNotBound => f.write_str("virtual muzzle used before being bound"),
            Self::NoMuzzleSet => f.write_str("fired with no muzzle set"),
            Self::UnknownMuzzle(name) => write!(f, "unknown muzzle `{name}`"),
            Self::UnknownLocation(name) => write!(f, "unknown location `{name}`"),
            Self::NotStarted => f.write_str("player ticked before start"),
        }
    }
}

impl core::error::Error for GunError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_names_the_offending_value() {
        let err = GunError::UnsetParameter("speed".into());
        assert_eq!(err.to_string(), "parameter `speed` is not set");

        let err = GunError::IterateOutOfRange { index: 3, len: 3 };
        assert_eq!(
            err.to_string(),
            "iterate index 3 is out of range for 3 values"
        );
    }
}
