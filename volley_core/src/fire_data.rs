// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The value delivered to a muzzle when a bullet is fired.

use alloc::string::String;

use hashbrown::HashMap;
use kurbo::{Affine, Point};

use crate::error::GunError;
use crate::parameter::Parameter;
use crate::transform::TransformParts;

/// Spawn transform plus a snapshot of named parameters and texts.
///
/// A `FireData` is built fresh for every fire: the firing state's parameters
/// and texts are copied in, pending modifiers edit the copy, and the muzzle
/// transform is prepended last. Parameters are kept as [`Parameter`] so that
/// an adding multiplier set on the state still scales deferred adds.
#[derive(Clone, Debug, PartialEq)]
pub struct FireData {
    /// Spawn transform. Relative to the muzzle until the muzzle transform
    /// has been applied.
    pub transform: Affine,
    parameters: HashMap<String, Parameter>,
    texts: HashMap<String, String>,
}

impl Default for FireData {
    fn default() -> Self {
        Self::new()
    }
}

impl FireData {
    /// Creates fire data with an identity transform and no parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            transform: Affine::IDENTITY,
            parameters: HashMap::new(),
            texts: HashMap::new(),
        }
    }

    pub(crate) fn from_snapshot(
        parameters: HashMap<String, Parameter>,
        texts: HashMap<String, String>,
    ) -> Self {
        Self {
            transform: Affine::IDENTITY,
            parameters,
            texts,
        }
    }

    /// Returns the value of a parameter, if set.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.parameters.get(name).map(Parameter::value)
    }

    /// Iterates over all parameter names and values, in no particular order.
    pub fn parameters(&self) -> impl Iterator<Item = (&str, f64)> {
        self.parameters
            .iter()
            .map(|(name, p)| (name.as_str(), p.value()))
    }

    /// Returns a text, if set.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts.get(name).map(String::as_str)
    }

    /// Iterates over all texts, in no particular order.
    pub fn texts(&self) -> impl Iterator<Item = (&str, &str)> {
        self.texts
            .iter()
            .map(|(name, text)| (name.as_str(), text.as_str()))
    }

    /// Declares (or redeclares) a parameter with a fresh multiplier.
    pub fn set_parameter(&mut self, name: &str, value: f64) {
        self.parameters.insert(name.into(), Parameter::new(value));
    }

    /// Adds to a parameter and returns the delta actually applied.
    ///
    /// # Errors
    ///
    /// Returns [`GunError::UnsetParameter`] if `name` was never set.
    pub fn add_parameter(&mut self, name: &str, delta: f64) -> Result<f64, GunError> {
        Ok(self.parameter_mut(name)?.add(delta))
    }

    /// Scales a parameter.
    ///
    /// # Errors
    ///
    /// Returns [`GunError::UnsetParameter`] if `name` was never set.
    pub fn multiply_parameter(&mut self, name: &str, factor: f64) -> Result<(), GunError> {
        self.parameter_mut(name)?.multiply(factor);
        Ok(())
    }

    /// Overwrites a parameter's value, keeping its multiplier.
    ///
    /// # Errors
    ///
    /// Returns [`GunError::UnsetParameter`] if `name` was never set.
    pub fn reset_parameter(&mut self, name: &str, value: f64) -> Result<(), GunError> {
        self.parameter_mut(name)?.reset(value);
        Ok(())
    }

    /// Sets a text.
    pub fn set_text(&mut self, name: &str, text: &str) {
        self.texts.insert(name.into(), text.into());
    }

    /// Spawn position (the transform's translation).
    #[must_use]
    pub fn position(&self) -> Point {
        self.transform.translation().to_point()
    }

    /// Spawn angle in degrees.
    #[must_use]
    pub fn angle(&self) -> f64 {
        TransformParts::decompose(self.transform).rotation
    }

    fn parameter_mut(&mut self, name: &str) -> Result<&mut Parameter, GunError> {
        self.parameters
            .get_mut(name)
            .ok_or_else(|| GunError::UnsetParameter(name.into()))
    }
}
