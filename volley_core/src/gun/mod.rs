// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gun combinators and the stepwise play contract.
//!
//! A [`Gun`] is an immutable description of a firing pattern. Calling
//! [`play`](Gun::play) produces a fresh [`Play`]: a resumable object that
//! the parent advances by calling [`step`](Play::step) once per frame.
//!
//! `step` runs until the playback either needs the next frame
//! ([`Step::Continue`], one frame consumed) or finishes ([`Step::Done`]).
//! Zero-duration work such as firing or setting a parameter happens inside a
//! single call, so a parent that sees `Done` immediately moves on to its next
//! child in the same frame. A gun's duration in frames is the number of
//! `Continue` results it returns before `Done`.
//!
//! The [`FiringState`] passed to `step` is borrowed from the parent. Guns
//! that branch ([`Sequential`], [`Parallel`], [`Repeat`], [`ParallelRepeat`]
//! and the inverted half of [`Mirror`] / [`Alternate`]) fork it and own the
//! forks for as long as the branch plays. The parent passes the same state on
//! every call, so a playback that does not fork may keep working on it across
//! frames.
//!
//! Errors propagate out of `step` unchanged; no combinator catches or retries
//! a child's failure.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::error::GunError;
use crate::lazy::Lazy;
use crate::state::FiringState;

mod fire;
mod mirror;
pub mod modifier;
mod parallel;
mod repeat;
mod sequence;
pub mod setter;
mod wait;

pub use fire::{Fire, fire};
pub use mirror::{Alternate, InvertOptions, Mirror, alternate, mirror};
pub use modifier::ModifierGun;
pub use parallel::{Parallel, parallel};
pub use repeat::{ParallelRepeat, Repeat, RepeatOptions, parallel_repeat, repeat};
pub use sequence::{Concat, Sequential, concat, sequential};
pub use setter::SetterGun;
pub use wait::{Nop, Wait, nop, wait};

/// Outcome of one [`Play::step`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    /// One frame consumed; call `step` again next frame.
    Continue,
    /// Finished during this call.
    Done,
}

impl Step {
    /// Returns `true` for [`Step::Done`].
    #[inline]
    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

/// A playing gun.
pub trait Play {
    /// Advances the playback by at most one frame.
    ///
    /// Calling `step` again after it returned [`Step::Done`] is allowed and
    /// keeps returning `Done` without side effects.
    ///
    /// # Errors
    ///
    /// Propagates any failure from the gun or its children.
    fn step(&mut self, state: &mut FiringState) -> Result<Step, GunError>;
}

/// An immutable firing pattern.
pub trait Gun: fmt::Debug {
    /// Starts a fresh, independent playback of this gun.
    fn play(&self) -> Box<dyn Play>;
}

/// Shared handle to a gun; gun trees share subtrees freely.
pub type GunRef = Rc<dyn Gun>;

/// Resolves a frame count: rounds up, and clamps negative or NaN to zero.
pub(crate) fn frame_count(value: &Lazy<f64>, state: &FiringState) -> Result<u32, GunError> {
    let frames = value.resolve(state)?;
    if frames > 0.0 {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "float to int casts saturate; anything past u32::MAX is effectively forever"
        )]
        let frames = frames.ceil() as u32;
        Ok(frames)
    } else {
        Ok(0)
    }
}

/// Resolves a repeat count to `(iterations, total)`.
///
/// Iterations round up like [`frame_count`]; `total` keeps the resolved value
/// (0 when clamped) for the repetitions' [`RepeatState`](crate::repeat::RepeatState).
pub(crate) fn repeat_count(
    value: &Lazy<f64>,
    state: &FiringState,
) -> Result<(u32, f64), GunError> {
    let times = value.resolve(state)?;
    if times > 0.0 {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "float to int casts saturate; anything past u32::MAX is effectively forever"
        )]
        let iterations = times.ceil() as u32;
        Ok((iterations, times))
    } else {
        Ok((0, 0.0))
    }
}

/// Playback that finishes on its first step after running `f` once.
///
/// Used by every zero-duration gun.
struct Instant<F> {
    f: Option<F>,
}

impl<F> Instant<F>
where
    F: FnOnce(&mut FiringState) -> Result<(), GunError>,
{
    fn new(f: F) -> Self {
        Self { f: Some(f) }
    }
}

impl<F> Play for Instant<F>
where
    F: FnOnce(&mut FiringState) -> Result<(), GunError>,
{
    fn step(&mut self, state: &mut FiringState) -> Result<Step, GunError> {
        if let Some(f) = self.f.take() {
            f(state)?;
        }
        Ok(Step::Done)
    }
}

/// Boxes a zero-duration playback.
pub(crate) fn instant<F>(f: F) -> Box<dyn Play>
where
    F: FnOnce(&mut FiringState) -> Result<(), GunError> + 'static,
{
    Box::new(Instant::new(f))
}
