// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Constant-or-lazy values.
//!
//! Most gun inputs (repeat counts, intervals, angles, parameter deltas) may
//! be either a constant or a value computed from the [`FiringState`] at the
//! moment it is needed. [`Lazy<T>`] is that choice, and
//! [`resolve`](Lazy::resolve) is the single place it is made.
//!
//! Computed values implement [`LazyEvaluative`]. Evaluators must be pure:
//! resolving the same value twice against the same state gives the same
//! result, because a value referenced from several places may be resolved
//! more than once per frame.
//!
//! The stock evaluators live in [`evaluators`] and are re-exported here.

use alloc::rc::Rc;
use core::fmt;

use kurbo::{Point, Vec2};

use crate::error::GunError;
use crate::state::FiringState;

pub mod evaluators;

pub use evaluators::{
    CalcDirection, CenterizedLinear, GetLocation, GlobalizeVector, Iterate, Linear, Round,
    calc_direction, centerized_linear, get_location, globalize_vector, iterate, linear, round,
};

/// A value computed from the firing state on demand.
pub trait LazyEvaluative<T>: fmt::Debug {
    /// Computes the value for `state`.
    ///
    /// # Errors
    ///
    /// Evaluator specific; typically [`GunError::UnknownRepeatName`] or
    /// [`GunError::IterateOutOfRange`].
    fn calc(&self, state: &FiringState) -> Result<T, GunError>;
}

/// Either a constant or a lazily computed value.
#[derive(Clone, Debug)]
pub enum Lazy<T> {
    /// Used as is.
    Constant(T),
    /// Computed from the firing state when resolved.
    Computed(Rc<dyn LazyEvaluative<T>>),
}

impl<T: Clone> Lazy<T> {
    /// Wraps an evaluator.
    pub fn computed(evaluator: impl LazyEvaluative<T> + 'static) -> Self {
        Self::Computed(Rc::new(evaluator))
    }

    /// Returns the constant, or runs the evaluator against `state`.
    ///
    /// # Errors
    ///
    /// Propagates the evaluator's failure.
    pub fn resolve(&self, state: &FiringState) -> Result<T, GunError> {
        match self {
            Self::Constant(value) => Ok(value.clone()),
            Self::Computed(evaluator) => evaluator.calc(state),
        }
    }

    /// Returns `true` for [`Lazy::Constant`].
    #[must_use]
    pub const fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }
}

impl Lazy<f64> {
    /// Derives a new value by applying `f` after resolution.
    #[must_use]
    pub fn map(self, f: impl Fn(f64) -> f64 + 'static) -> Self {
        match self {
            Self::Constant(value) => Self::Constant(f(value)),
            computed => from_fn(move |state| computed.resolve(state).map(&f)),
        }
    }
}

/// Builds a lazy value from a closure.
pub fn from_fn<T, F>(f: F) -> Lazy<T>
where
    T: Clone + 'static,
    F: Fn(&FiringState) -> Result<T, GunError> + 'static,
{
    Lazy::computed(FnEvaluative(f))
}

struct FnEvaluative<F>(F);

impl<F> fmt::Debug for FnEvaluative<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnEvaluative")
    }
}

impl<T, F> LazyEvaluative<T> for FnEvaluative<F>
where
    F: Fn(&FiringState) -> Result<T, GunError>,
{
    fn calc(&self, state: &FiringState) -> Result<T, GunError> {
        (self.0)(state)
    }
}

impl From<f64> for Lazy<f64> {
    fn from(value: f64) -> Self {
        Self::Constant(value)
    }
}

impl From<u32> for Lazy<f64> {
    fn from(value: u32) -> Self {
        Self::Constant(f64::from(value))
    }
}

impl From<i32> for Lazy<f64> {
    fn from(value: i32) -> Self {
        Self::Constant(f64::from(value))
    }
}

impl From<Vec2> for Lazy<Vec2> {
    fn from(value: Vec2) -> Self {
        Self::Constant(value)
    }
}

impl From<Point> for Lazy<Vec2> {
    fn from(value: Point) -> Self {
        Self::Constant(value.to_vec2())
    }
}

impl From<(f64, f64)> for Lazy<Vec2> {
    fn from(value: (f64, f64)) -> Self {
        Self::Constant(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestPlayer;

    #[test]
    fn constants_resolve_to_themselves() {
        let state = FiringState::new(TestPlayer::empty());
        assert_eq!(Lazy::from(4.0).resolve(&state), Ok(4.0));
        assert!(Lazy::from(4).is_constant());
    }

    #[test]
    fn closures_see_the_state() {
        let mut state = FiringState::new(TestPlayer::empty());
        state.set_parameter("speed", 3.0);
        let lazy = from_fn(|s| Ok(s.parameter("speed").unwrap_or_default() * 2.0));
        assert!(!lazy.is_constant());
        assert_eq!(lazy.resolve(&state), Ok(6.0));
    }

    #[test]
    fn map_applies_after_resolution() {
        let state = FiringState::new(TestPlayer::empty());
        assert_eq!(Lazy::from(2.0).map(|v| v + 1.0).resolve(&state), Ok(3.0));

        let doubled = from_fn(|_| Ok(5.0)).map(|v| v * 2.0);
        assert!(!doubled.is_constant());
        assert_eq!(doubled.resolve(&state), Ok(10.0));
    }
}
