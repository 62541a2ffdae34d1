// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stock evaluators.
//!
//! The repeat-driven evaluators ([`Linear`], [`CenterizedLinear`],
//! [`Iterate`]) read the innermost repetition by default, or the innermost
//! one with a given name when a target is set with `.target(name)`.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Vec2;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use super::{Lazy, LazyEvaluative};
use crate::error::GunError;
use crate::repeat::RepeatState;
use crate::state::FiringState;
use crate::transform::{direction, rotate_vector};

fn repeat_state(state: &FiringState, target: Option<&str>) -> Result<RepeatState, GunError> {
    state.repeat_states().get(target).map(|handle| **handle)
}

/// Interpolates from `start` to `stop` across a repetition.
#[derive(Clone, Debug)]
pub struct Linear {
    start: Lazy<f64>,
    stop: Lazy<f64>,
    target: Option<String>,
}

/// `stop * rate + start * (1 - rate)`, where `rate = finished / total`.
///
/// The last iteration does not reach `stop`; with 4 iterations from 0 to 1
/// the values are 0, 0.25, 0.5, 0.75.
pub fn linear(start: impl Into<Lazy<f64>>, stop: impl Into<Lazy<f64>>) -> Linear {
    Linear {
        start: start.into(),
        stop: stop.into(),
        target: None,
    }
}

impl Linear {
    /// Reads the repetition named `name` instead of the innermost one.
    #[must_use]
    pub fn target(mut self, name: &str) -> Self {
        self.target = Some(name.into());
        self
    }
}

impl LazyEvaluative<f64> for Linear {
    fn calc(&self, state: &FiringState) -> Result<f64, GunError> {
        let start = self.start.resolve(state)?;
        let stop = self.stop.resolve(state)?;
        let rate = repeat_state(state, self.target.as_deref())?.rate();
        Ok(stop * rate + start * (1.0 - rate))
    }
}

/// Spreads a range symmetrically around zero across a repetition.
#[derive(Clone, Debug)]
pub struct CenterizedLinear {
    total_range: Lazy<f64>,
    target: Option<String>,
}

/// `total_range * rate - (total_range - total_range / total) / 2`.
///
/// Three iterations over a range of 15 give -5, 0 and 5.
pub fn centerized_linear(total_range: impl Into<Lazy<f64>>) -> CenterizedLinear {
    CenterizedLinear {
        total_range: total_range.into(),
        target: None,
    }
}

impl CenterizedLinear {
    /// Reads the repetition named `name` instead of the innermost one.
    #[must_use]
    pub fn target(mut self, name: &str) -> Self {
        self.target = Some(name.into());
        self
    }
}

impl LazyEvaluative<f64> for CenterizedLinear {
    fn calc(&self, state: &FiringState) -> Result<f64, GunError> {
        let total_range = self.total_range.resolve(state)?;
        let repeat = repeat_state(state, self.target.as_deref())?;
        let diff = if repeat.total > 0.0 {
            total_range / repeat.total
        } else {
            0.0
        };
        Ok(total_range * repeat.rate() - (total_range - diff) / 2.0)
    }
}

/// Picks the value at the current iteration index.
#[derive(Clone, Debug)]
pub struct Iterate<T> {
    values: Vec<Lazy<T>>,
    default: Option<Lazy<T>>,
    target: Option<String>,
}

/// `values[finished]`, falling back to the default (if any) past the end.
pub fn iterate<T, I>(values: I) -> Iterate<T>
where
    I: IntoIterator,
    I::Item: Into<Lazy<T>>,
{
    Iterate {
        values: values.into_iter().map(Into::into).collect(),
        default: None,
        target: None,
    }
}

impl<T> Iterate<T> {
    /// Value used once the iteration index runs past the list.
    #[must_use]
    pub fn default(mut self, value: impl Into<Lazy<T>>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Reads the repetition named `name` instead of the innermost one.
    #[must_use]
    pub fn target(mut self, name: &str) -> Self {
        self.target = Some(name.into());
        self
    }
}

impl<T: Clone + core::fmt::Debug> LazyEvaluative<T> for Iterate<T> {
    fn calc(&self, state: &FiringState) -> Result<T, GunError> {
        let index = repeat_state(state, self.target.as_deref())?.finished as usize;
        match (self.values.get(index), &self.default) {
            (Some(value), _) | (None, Some(value)) => value.resolve(state),
            (None, None) => Err(GunError::IterateOutOfRange {
                index,
                len: self.values.len(),
            }),
        }
    }
}

/// Rounds to the nearest integer, ties toward positive infinity.
#[derive(Clone, Debug)]
pub struct Round {
    input: Lazy<f64>,
}

/// See [`Round`].
pub fn round(input: impl Into<Lazy<f64>>) -> Round {
    Round {
        input: input.into(),
    }
}

impl LazyEvaluative<f64> for Round {
    fn calc(&self, state: &FiringState) -> Result<f64, GunError> {
        let x = self.input.resolve(state)?;
        let f = x.floor();
        Ok(if x - f >= 0.5 { f + 1.0 } else { f })
    }
}

/// A named world location, resolved by the player.
#[derive(Clone, Debug)]
pub struct GetLocation {
    name: String,
}

/// See [`GetLocation`].
pub fn get_location(name: &str) -> GetLocation {
    GetLocation { name: name.into() }
}

impl LazyEvaluative<Vec2> for GetLocation {
    fn calc(&self, state: &FiringState) -> Result<Vec2, GunError> {
        state.player().location(&self.name)
    }
}

/// Angle in degrees of the vector from `src` to `dest`.
#[derive(Clone, Debug)]
pub struct CalcDirection {
    src: Lazy<Vec2>,
    dest: Lazy<Vec2>,
}

/// See [`CalcDirection`].
pub fn calc_direction(src: impl Into<Lazy<Vec2>>, dest: impl Into<Lazy<Vec2>>) -> CalcDirection {
    CalcDirection {
        src: src.into(),
        dest: dest.into(),
    }
}

impl LazyEvaluative<f64> for CalcDirection {
    fn calc(&self, state: &FiringState) -> Result<f64, GunError> {
        let src = self.src.resolve(state)?;
        let dest = self.dest.resolve(state)?;
        Ok(direction(src.to_point(), dest.to_point()))
    }
}

/// Rotates a vector by an angle in degrees.
#[derive(Clone, Debug)]
pub struct GlobalizeVector {
    vector: Lazy<Vec2>,
    angle: Lazy<f64>,
}

/// See [`GlobalizeVector`].
pub fn globalize_vector(
    vector: impl Into<Lazy<Vec2>>,
    angle: impl Into<Lazy<f64>>,
) -> GlobalizeVector {
    GlobalizeVector {
        vector: vector.into(),
        angle: angle.into(),
    }
}

impl LazyEvaluative<Vec2> for GlobalizeVector {
    fn calc(&self, state: &FiringState) -> Result<Vec2, GunError> {
        let vector = self.vector.resolve(state)?;
        let angle = self.angle.resolve(state)?;
        Ok(rotate_vector(vector, angle))
    }
}

macro_rules! impl_into_lazy {
    ($($evaluator:ty => $value:ty),* $(,)?) => {
        $(
            impl From<$evaluator> for Lazy<$value> {
                fn from(evaluator: $evaluator) -> Self {
                    Lazy::computed(evaluator)
                }
            }
        )*
    };
}

impl_into_lazy! {
    Linear => f64,
    CenterizedLinear => f64,
    Round => f64,
    CalcDirection => f64,
    GetLocation => Vec2,
    GlobalizeVector => Vec2,
}

impl<T: Clone + core::fmt::Debug + 'static> From<Iterate<T>> for Lazy<T> {
    fn from(evaluator: Iterate<T>) -> Self {
        Self::computed(evaluator)
    }
}
