// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::any::Any;

use super::{Gun, GunRef, Play, instant};
use crate::error::GunError;
use crate::muzzle::Bullet;
use crate::state::FiringState;

/// Fires one bullet from the current muzzle. Takes zero frames.
///
/// The fire data is the state's snapshot with pending modifiers applied
/// newest first, then the muzzle transform prepended.
#[derive(Clone, Debug)]
pub struct Fire {
    bullet: Bullet,
}

impl Fire {
    /// Creates a gun firing `bullet`, which the muzzle receives unexamined.
    #[must_use]
    pub fn new(bullet: impl Any) -> Self {
        Self {
            bullet: Rc::new(bullet),
        }
    }

    /// Creates a gun firing an already shared bullet payload.
    #[must_use]
    pub fn shared(bullet: Bullet) -> Self {
        Self { bullet }
    }
}

impl Gun for Fire {
    fn play(&self) -> Box<dyn Play> {
        let bullet = Rc::clone(&self.bullet);
        instant(move |state| fire_now(state, bullet))
    }
}

/// See [`Fire`].
pub fn fire(bullet: impl Any) -> GunRef {
    Rc::new(Fire::new(bullet))
}

fn fire_now(state: &FiringState, bullet: Bullet) -> Result<(), GunError> {
    let muzzle = state.muzzle().ok_or(GunError::NoMuzzleSet)?;
    let mut data = state.fire_data()?;
    data.transform = muzzle.muzzle_transform()? * data.transform;
    muzzle.fire(data.clone(), bullet)?;
    state.player().notify_fired(&data);
    Ok(())
}
