// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Muzzles: named emission points supplied by the host.
//!
//! A [`Muzzle`] provides a spawn transform, an "enemy" reference transform
//! (what aiming muzzles aim at), and receives fired bullets. Muzzles are
//! external collaborators: the engine shares them by reference across
//! firing-state branches and never copies them.
//!
//! A [`VirtualMuzzle`] overrides only the transform of a base muzzle and
//! forwards everything else to it:
//!
//! - [`AimingMuzzle`] re-aims at the enemy every time its transform is read.
//! - [`FixedAimMuzzle`] aims once, when bound, and keeps that angle while
//!   still following the base muzzle's position and scale.
//!
//! Virtual muzzles are produced by a [`VirtualMuzzleGenerator`], which hands
//! out a fresh, unbound muzzle on every call so no two firings share one.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::any::Any;
use core::fmt;

use kurbo::Affine;

use crate::error::GunError;
use crate::fire_data::FireData;
use crate::transform::{TransformParts, direction};

/// Opaque bullet payload, passed through to the muzzle unexamined.
pub type Bullet = Rc<dyn Any>;

/// An emission point.
pub trait Muzzle: fmt::Debug {
    /// Spawns `bullet` with the fully resolved `data`.
    ///
    /// # Errors
    ///
    /// Implementations may fail; virtual muzzles fail with
    /// [`GunError::MuzzleNotBound`] before they are bound.
    fn fire(&self, data: FireData, bullet: Bullet) -> Result<(), GunError>;

    /// Returns the current spawn transform of this muzzle.
    ///
    /// # Errors
    ///
    /// See [`fire`](Self::fire).
    fn muzzle_transform(&self) -> Result<Affine, GunError>;

    /// Returns the current transform of the target this muzzle aims at.
    ///
    /// # Errors
    ///
    /// See [`fire`](Self::fire).
    fn enemy_transform(&self) -> Result<Affine, GunError>;
}

/// A muzzle that layers a transform override on top of a base muzzle.
pub trait VirtualMuzzle: Muzzle {
    /// Binds this muzzle to `base`.
    ///
    /// # Errors
    ///
    /// Propagates failures from reading the base muzzle's transforms.
    fn based_on(&mut self, base: Rc<dyn Muzzle>) -> Result<(), GunError>;
}

/// Produces fresh virtual muzzles.
pub trait VirtualMuzzleGenerator: fmt::Debug {
    /// Returns a new, unbound virtual muzzle.
    fn generate(&self) -> Box<dyn VirtualMuzzle>;
}

/// Computes the aim angle from `base`'s current position to its enemy.
fn aim_angle(base: &dyn Muzzle) -> Result<f64, GunError> {
    let from = base.muzzle_transform()?.translation().to_point();
    let to = base.enemy_transform()?.translation().to_point();
    Ok(direction(from, to))
}

fn with_rotation(base: &dyn Muzzle, rotation: f64) -> Result<Affine, GunError> {
    let mut parts = TransformParts::decompose(base.muzzle_transform()?);
    parts.rotation = rotation;
    Ok(parts.compose())
}

/// A virtual muzzle that points at the enemy on every read.
#[derive(Debug, Default)]
pub struct AimingMuzzle {
    base: Option<Rc<dyn Muzzle>>,
}

impl AimingMuzzle {
    /// Creates an unbound aiming muzzle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn base(&self) -> Result<&dyn Muzzle, GunError> {
        self.base.as_deref().ok_or(GunError::MuzzleNotBound)
    }
}

impl Muzzle for AimingMuzzle {
    fn fire(&self, data: FireData, bullet: Bullet) -> Result<(), GunError> {
        self.base()?.fire(data, bullet)
    }

    fn muzzle_transform(&self) -> Result<Affine, GunError> {
        let base = self.base()?;
        with_rotation(base, aim_angle(base)?)
    }

    fn enemy_transform(&self) -> Result<Affine, GunError> {
        self.base()?.enemy_transform()
    }
}

impl VirtualMuzzle for AimingMuzzle {
    fn based_on(&mut self, base: Rc<dyn Muzzle>) -> Result<(), GunError> {
        self.base = Some(base);
        Ok(())
    }
}

/// A virtual muzzle that aims once, when bound.
#[derive(Debug, Default)]
pub struct FixedAimMuzzle {
    bound: Option<(Rc<dyn Muzzle>, f64)>,
}

impl FixedAimMuzzle {
    /// Creates an unbound fixed-aim muzzle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The frozen aim angle in degrees, once bound.
    #[must_use]
    pub fn angle(&self) -> Option<f64> {
        self.bound.as_ref().map(|(_, angle)| *angle)
    }

    fn bound(&self) -> Result<(&dyn Muzzle, f64), GunError> {
        self.bound
            .as_ref()
            .map(|(base, angle)| (&**base, *angle))
            .ok_or(GunError::MuzzleNotBound)
    }
}

impl Muzzle for FixedAimMuzzle {
    fn fire(&self, data: FireData, bullet: Bullet) -> Result<(), GunError> {
        self.bound()?.0.fire(data, bullet)
    }

    fn muzzle_transform(&self) -> Result<Affine, GunError> {
        let (base, angle) = self.bound()?;
        with_rotation(base, angle)
    }

    fn enemy_transform(&self) -> Result<Affine, GunError> {
        self.bound()?.0.enemy_transform()
    }
}

impl VirtualMuzzle for FixedAimMuzzle {
    fn based_on(&mut self, base: Rc<dyn Muzzle>) -> Result<(), GunError> {
        let angle = aim_angle(&*base)?;
        self.bound = Some((base, angle));
        Ok(())
    }
}

/// Generates [`AimingMuzzle`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct AimingMuzzleGenerator;

impl VirtualMuzzleGenerator for AimingMuzzleGenerator {
    fn generate(&self) -> Box<dyn VirtualMuzzle> {
        Box::new(AimingMuzzle::new())
    }
}

/// Generates [`FixedAimMuzzle`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedAimMuzzleGenerator;

impl VirtualMuzzleGenerator for FixedAimMuzzleGenerator {
    fn generate(&self) -> Box<dyn VirtualMuzzle> {
        Box::new(FixedAimMuzzle::new())
    }
}
