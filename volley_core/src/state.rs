// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-branch mutable firing context.
//!
//! A [`FiringState`] is what every gun reads and writes while it plays:
//!
//! - named [`Parameter`]s, texts and vectors (live, immediate values);
//! - the current [`Muzzle`], if any;
//! - pending [`FireDataModifier`]s, applied at fire time in reverse order;
//! - a [`RepeatStateManager`] describing the active repetitions;
//! - a shared reference to the [`Player`] that owns the muzzles.
//!
//! Combinators that branch call [`fork`](FiringState::fork) and own the
//! result. Parameters, texts, vectors, modifiers and repeat stacks are
//! snapshotted by a fork; the muzzle and the player are shared.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use kurbo::Vec2;

use crate::error::GunError;
use crate::fire_data::FireData;
use crate::muzzle::Muzzle;
use crate::parameter::Parameter;
use crate::player::Player;
use crate::repeat::RepeatStateManager;

/// A deferred edit of [`FireData`], run when a bullet is fired.
///
/// The state passed in is the one firing the bullet.
pub type FireDataModifier = Rc<dyn Fn(&FiringState, &mut FireData) -> Result<(), GunError>>;

/// Wraps a closure as a [`FireDataModifier`].
pub fn modifier_fn<F>(f: F) -> FireDataModifier
where
    F: Fn(&FiringState, &mut FireData) -> Result<(), GunError> + 'static,
{
    Rc::new(f)
}

/// Mutable context for one branch of a playing gun tree.
#[derive(Clone)]
pub struct FiringState {
    parameters: HashMap<String, Parameter>,
    texts: HashMap<String, String>,
    vectors: HashMap<String, Vec2>,
    muzzle: Option<Rc<dyn Muzzle>>,
    modifiers: Vec<FireDataModifier>,
    repeat_states: RepeatStateManager,
    player: Rc<dyn Player>,
}

impl fmt::Debug for FiringState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FiringState")
            .field("parameters", &self.parameters)
            .field("texts", &self.texts)
            .field("vectors", &self.vectors)
            .field("muzzle", &self.muzzle)
            .field("modifiers", &self.modifiers.len())
            .field("repeat_states", &self.repeat_states)
            .field("player", &self.player)
            .finish()
    }
}

impl FiringState {
    /// Creates an empty state owned by `player`.
    #[must_use]
    pub fn new(player: Rc<dyn Player>) -> Self {
        Self {
            parameters: HashMap::new(),
            texts: HashMap::new(),
            vectors: HashMap::new(),
            muzzle: None,
            modifiers: Vec::new(),
            repeat_states: RepeatStateManager::new(),
            player,
        }
    }

    /// Returns an independently owned branch of this state.
    #[must_use]
    pub fn fork(&self) -> Self {
        self.clone()
    }

    // -- Parameters --

    /// Returns a parameter's current value.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.parameters.get(name).map(Parameter::value)
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

    /// Scales the multiplier applied to later adds of a parameter.
    ///
    /// # Errors
    ///
    /// Returns [`GunError::UnsetParameter`] if `name` was never set.
    pub fn multiply_later_adding(&mut self, name: &str, factor: f64) -> Result<(), GunError> {
        self.parameter_mut(name)?.multiply_later_adding(factor);
        Ok(())
    }

    fn parameter_mut(&mut self, name: &str) -> Result<&mut Parameter, GunError> {
        self.parameters
            .get_mut(name)
            .ok_or_else(|| GunError::UnsetParameter(name.into()))
    }

    // -- Texts and vectors --

    /// Returns a text, if set.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts.get(name).map(String::as_str)
    }

    /// Sets a text.
    pub fn set_text(&mut self, name: &str, text: &str) {
        self.texts.insert(name.into(), text.into());
    }

    /// Returns a vector, if set.
    #[must_use]
    pub fn vector(&self, name: &str) -> Option<Vec2> {
        self.vectors.get(name).copied()
    }

    /// Sets a vector.
    pub fn set_vector(&mut self, name: &str, vector: Vec2) {
        self.vectors.insert(name.into(), vector);
    }

    // -- Muzzle --

    /// Returns the current muzzle.
    #[must_use]
    pub fn muzzle(&self) -> Option<&Rc<dyn Muzzle>> {
        self.muzzle.as_ref()
    }

    /// Replaces the current muzzle.
    pub fn set_muzzle(&mut self, muzzle: Rc<dyn Muzzle>) {
        self.muzzle = Some(muzzle);
    }

    // -- Modifiers --

    /// Queues a deferred fire-data modifier.
    pub fn push_modifier(&mut self, modifier: FireDataModifier) {
        self.modifiers.push(modifier);
    }

    /// Number of pending modifiers.
    #[must_use]
    pub fn modifier_count(&self) -> usize {
        self.modifiers.len()
    }

    // -- Collaborators --

    /// Returns the repeat bookkeeping for this branch.
    #[must_use]
    pub fn repeat_states(&self) -> &RepeatStateManager {
        &self.repeat_states
    }

    /// Returns the repeat bookkeeping for this branch, mutably.
    pub fn repeat_states_mut(&mut self) -> &mut RepeatStateManager {
        &mut self.repeat_states
    }

    /// Returns the player this state belongs to.
    #[must_use]
    pub fn player(&self) -> &Rc<dyn Player> {
        &self.player
    }

    /// Builds the fire data a bullet fired now would receive, before the
    /// muzzle transform is applied.
    ///
    /// Parameters and texts are snapshotted, then pending modifiers run from
    /// the most recently pushed to the oldest, so an outer wrapper gets the
    /// final say over anything nested inside it.
    ///
    /// # Errors
    ///
    /// Propagates the first modifier failure.
    pub fn fire_data(&self) -> Result<FireData, GunError> {
        let mut data = FireData::from_snapshot(self.parameters.clone(), self.texts.clone());
        for modifier in self.modifiers.iter().rev() {
            modifier(self, &mut data)?;
        }
        Ok(data)
    }
}
