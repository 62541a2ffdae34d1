// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named scalar slots carried by firing state and fire data.

/// A scalar with an add/multiply/reset mutation protocol.
///
/// Adds are scaled by an *adding multiplier* which starts at 1. Changing the
/// multiplier with [`multiply_later_adding`](Self::multiply_later_adding)
/// only affects adds made afterwards; the current value is left alone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parameter {
    value: f64,
    adding_multiplier: f64,
}

impl Parameter {
    /// Creates a parameter holding `value` with an adding multiplier of 1.
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self {
            value,
            adding_multiplier: 1.0,
        }
    }

    /// Returns the current value.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Returns the multiplier applied to future adds.
    #[inline]
    #[must_use]
    pub const fn adding_multiplier(&self) -> f64 {
        self.adding_multiplier
    }

    /// Adds `delta * adding_multiplier` and returns the delta actually applied.
    pub fn add(&mut self, delta: f64) -> f64 {
        let applied = delta * self.adding_multiplier;
        self.value += applied;
        applied
    }

    /// Scales the value.
    pub fn multiply(&mut self, factor: f64) {
        self.value *= factor;
    }

    /// Scales the multiplier used by later [`add`](Self::add) calls.
    pub fn multiply_later_adding(&mut self, factor: f64) {
        self.adding_multiplier *= factor;
    }

    /// Overwrites the value. The adding multiplier is kept.
    pub fn reset(&mut self, value: f64) {
        self.value = value;
    }
}

impl Default for Parameter {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_returns_applied_delta() {
        let mut p = Parameter::new(1.0);
        assert_eq!(p.add(2.0), 2.0);
        assert_eq!(p.value(), 3.0);
    }

    #[test]
    fn multiplier_only_affects_later_adds() {
        let mut p = Parameter::new(10.0);
        p.multiply_later_adding(3.0);
        assert_eq!(p.value(), 10.0, "multiplier must not touch the value");
        assert_eq!(p.add(2.0), 6.0);
        assert_eq!(p.value(), 16.0);
    }

    #[test]
    fn reset_keeps_multiplier() {
        let mut p = Parameter::new(5.0);
        p.multiply_later_adding(2.0);
        p.reset(0.0);
        assert_eq!(p.value(), 0.0);
        assert_eq!(p.adding_multiplier(), 2.0);
        p.add(1.0);
        assert_eq!(p.value(), 2.0);
    }

    #[test]
    fn multiply_scales_value_directly() {
        let mut p = Parameter::new(4.0);
        p.multiply_later_adding(10.0);
        p.multiply(0.5);
        assert_eq!(p.value(), 2.0);
    }

    #[test]
    fn copies_are_independent() {
        let original = Parameter::new(1.0);
        let mut copy = original;
        copy.add(1.0);
        copy.multiply_later_adding(2.0);
        assert_eq!(original.value(), 1.0);
        assert_eq!(original.adding_multiplier(), 1.0);
    }
}
