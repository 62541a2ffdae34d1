// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Guns that queue deferred edits of the fire data.
//!
//! Each gun here takes zero frames: it pushes a [`FireDataModifier`] onto the
//! state and finishes. The modifier runs only when a later [`Fire`] builds
//! its fire data, newest modifier first, so an outer wrapper always has the
//! final say over what is nested inside it.
//!
//! Lazy inputs (`rotate(linear(..))` and the like) are resolved when the
//! gun plays, against the state at that point. A modifier built with
//! [`custom`] instead sees the state of the gun that fires.
//!
//! [`Fire`]: super::Fire

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::fmt;

use kurbo::{Affine, Vec2};

use super::{Gun, GunRef, Play, instant};
use crate::error::GunError;
use crate::fire_data::FireData;
use crate::lazy::Lazy;
use crate::state::{FireDataModifier, FiringState, modifier_fn};
use crate::transform::TransformParts;

type Factory = dyn Fn(&FiringState) -> Result<FireDataModifier, GunError>;

/// Pushes a deferred fire-data modifier. Takes zero frames.
#[derive(Clone)]
pub struct ModifierGun {
    label: &'static str,
    factory: Rc<Factory>,
}

impl fmt::Debug for ModifierGun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModifierGun")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl ModifierGun {
    /// Creates a gun that builds its modifier from the state it plays on.
    ///
    /// `label` only shows up in `Debug` output.
    pub fn new<F>(label: &'static str, factory: F) -> Self
    where
        F: Fn(&FiringState) -> Result<FireDataModifier, GunError> + 'static,
    {
        Self {
            label,
            factory: Rc::new(factory),
        }
    }
}

impl Gun for ModifierGun {
    fn play(&self) -> Box<dyn Play> {
        let factory = Rc::clone(&self.factory);
        instant(move |state| {
            let modifier = factory(state)?;
            state.push_modifier(modifier);
            Ok(())
        })
    }
}

fn modifier_gun<F>(label: &'static str, factory: F) -> GunRef
where
    F: Fn(&FiringState) -> Result<FireDataModifier, GunError> + 'static,
{
    Rc::new(ModifierGun::new(label, factory))
}

/// Pushes `f` as is; it runs against the firing state at fire time.
pub fn custom<F>(f: F) -> GunRef
where
    F: Fn(&FiringState, &mut FireData) -> Result<(), GunError> + 'static,
{
    let modifier = modifier_fn(f);
    modifier_gun("custom", move |_| Ok(Rc::clone(&modifier)))
}

/// Pre-multiplies the spawn transform by `m`.
pub fn transform(m: Affine) -> GunRef {
    modifier_gun("transform", move |_| Ok(transform_modifier(m)))
}

/// Offsets the spawn position, in the frame of any enclosing modifiers.
pub fn translate(offset: impl Into<Lazy<Vec2>>) -> GunRef {
    let offset = offset.into();
    modifier_gun("translate", move |state| {
        Ok(transform_modifier(Affine::translate(offset.resolve(state)?)))
    })
}

/// Rotates the spawn transform by `degrees`.
pub fn rotate(degrees: impl Into<Lazy<f64>>) -> GunRef {
    let degrees = degrees.into();
    modifier_gun("rotate", move |state| {
        Ok(transform_modifier(Affine::rotate(
            degrees.resolve(state)?.to_radians(),
        )))
    })
}

/// Scales the spawn transform per axis.
pub fn scale(factors: impl Into<Lazy<Vec2>>) -> GunRef {
    let factors = factors.into();
    modifier_gun("scale", move |state| {
        let factors = factors.resolve(state)?;
        Ok(transform_modifier(Affine::scale_non_uniform(
            factors.x, factors.y,
        )))
    })
}

/// Adds to a parameter of the fire data, scaled by its adding multiplier.
///
/// Firing fails with [`GunError::UnsetParameter`] if the parameter was
/// never set.
pub fn add_parameter(name: &str, delta: impl Into<Lazy<f64>>) -> GunRef {
    let name: Rc<str> = name.into();
    let delta = delta.into();
    modifier_gun("add_parameter", move |state| {
        let name = Rc::clone(&name);
        let delta = delta.resolve(state)?;
        Ok(modifier_fn(move |_, data| {
            data.add_parameter(&name, delta).map(drop)
        }))
    })
}

/// Scales a parameter of the fire data.
///
/// Firing fails with [`GunError::UnsetParameter`] if the parameter was
/// never set.
pub fn multiply_parameter(name: &str, factor: impl Into<Lazy<f64>>) -> GunRef {
    let name: Rc<str> = name.into();
    let factor = factor.into();
    modifier_gun("multiply_parameter", move |state| {
        let name = Rc::clone(&name);
        let factor = factor.resolve(state)?;
        Ok(modifier_fn(move |_, data| {
            data.multiply_parameter(&name, factor)
        }))
    })
}

/// Overwrites a parameter of the fire data.
///
/// Firing fails with [`GunError::UnsetParameter`] if the parameter was
/// never set.
pub fn reset_parameter(name: &str, value: impl Into<Lazy<f64>>) -> GunRef {
    let name: Rc<str> = name.into();
    let value = value.into();
    modifier_gun("reset_parameter", move |state| {
        let name = Rc::clone(&name);
        let value = value.resolve(state)?;
        Ok(modifier_fn(move |_, data| data.reset_parameter(&name, value)))
    })
}

/// Sets a text of the fire data.
pub fn set_text(name: &str, text: &str) -> GunRef {
    let name: Rc<str> = name.into();
    let text: Rc<str> = text.into();
    let modifier = modifier_fn(move |_, data| {
        data.set_text(&name, &text);
        Ok(())
    });
    modifier_gun("set_text", move |_| Ok(Rc::clone(&modifier)))
}

/// Negates the spawn rotation, and optionally either translation axis.
pub fn invert(mirror_translation_x: bool, mirror_translation_y: bool) -> GunRef {
    let modifier = invert_modifier(mirror_translation_x, mirror_translation_y);
    modifier_gun("invert", move |_| Ok(Rc::clone(&modifier)))
}

fn transform_modifier(m: Affine) -> FireDataModifier {
    modifier_fn(move |_, data| {
        data.transform = m * data.transform;
        Ok(())
    })
}

/// The modifier behind [`invert`] and the inverted half of a mirror.
pub(crate) fn invert_modifier(
    mirror_translation_x: bool,
    mirror_translation_y: bool,
) -> FireDataModifier {
    modifier_fn(move |_, data| {
        let mut parts = TransformParts::decompose(data.transform);
        parts.rotation = -parts.rotation;
        if mirror_translation_x {
            parts.translation.x = -parts.translation.x;
        }
        if mirror_translation_y {
            parts.translation.y = -parts.translation.y;
        }
        data.transform = parts.compose();
        Ok(())
    })
}
