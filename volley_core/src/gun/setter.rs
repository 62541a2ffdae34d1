// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Guns that write straight into the firing state.
//!
//! Unlike the deferred modifiers in [`modifier`](super::modifier), a setter
//! changes the live state the moment it plays, so later siblings in the same
//! [`Concat`](super::Concat) (and every fork taken afterwards) see the new
//! value. All setters take zero frames.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::fmt;

use kurbo::Vec2;

use super::{Gun, GunRef, Play, instant};
use crate::error::GunError;
use crate::lazy::Lazy;
use crate::muzzle::{Muzzle, VirtualMuzzle, VirtualMuzzleGenerator};
use crate::state::FiringState;

type Updater = dyn Fn(&mut FiringState) -> Result<(), GunError>;

/// Applies an immediate update to the firing state. Takes zero frames.
#[derive(Clone)]
pub struct SetterGun {
    label: &'static str,
    updater: Rc<Updater>,
}

impl fmt::Debug for SetterGun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetterGun")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl SetterGun {
    /// Creates a setter running `updater`.
    ///
    /// `label` only shows up in `Debug` output.
    pub fn new<F>(label: &'static str, updater: F) -> Self
    where
        F: Fn(&mut FiringState) -> Result<(), GunError> + 'static,
    {
        Self {
            label,
            updater: Rc::new(updater),
        }
    }
}

impl Gun for SetterGun {
    fn play(&self) -> Box<dyn Play> {
        let updater = Rc::clone(&self.updater);
        instant(move |state| updater(state))
    }
}

fn setter<F>(label: &'static str, updater: F) -> GunRef
where
    F: Fn(&mut FiringState) -> Result<(), GunError> + 'static,
{
    Rc::new(SetterGun::new(label, updater))
}

/// Runs `f` against the live state.
pub fn custom<F>(f: F) -> GunRef
where
    F: Fn(&mut FiringState) -> Result<(), GunError> + 'static,
{
    setter("custom", f)
}

/// Declares a parameter, replacing any previous value and multiplier.
pub fn use_parameter(name: &str, value: impl Into<Lazy<f64>>) -> GunRef {
    let name: Rc<str> = name.into();
    let value = value.into();
    setter("use_parameter", move |state| {
        let value = value.resolve(state)?;
        state.set_parameter(&name, value);
        Ok(())
    })
}

/// Sets a text.
pub fn use_text(name: &str, text: &str) -> GunRef {
    let name: Rc<str> = name.into();
    let text: Rc<str> = text.into();
    setter("use_text", move |state| {
        state.set_text(&name, &text);
        Ok(())
    })
}

/// Sets a named vector.
pub fn use_vector(name: &str, vector: impl Into<Lazy<Vec2>>) -> GunRef {
    let name: Rc<str> = name.into();
    let vector = vector.into();
    setter("use_vector", move |state| {
        let vector = vector.resolve(state)?;
        state.set_vector(&name, vector);
        Ok(())
    })
}

/// Switches to the player's muzzle called `name`.
///
/// Fails with [`GunError::UnknownMuzzle`] if the player has no such muzzle.
pub fn use_muzzle(name: &str) -> GunRef {
    let name: Rc<str> = name.into();
    setter("use_muzzle", move |state| {
        let muzzle = state.player().muzzle(&name)?;
        state.set_muzzle(muzzle);
        Ok(())
    })
}

/// Replaces the current muzzle with a fresh virtual muzzle based on it.
///
/// Fails with [`GunError::NoMuzzleSet`] if there is no current muzzle.
pub fn use_virtual_muzzle(generator: impl VirtualMuzzleGenerator + 'static) -> GunRef {
    setter("use_virtual_muzzle", move |state| {
        let base = Rc::clone(state.muzzle().ok_or(GunError::NoMuzzleSet)?);
        let mut muzzle = generator.generate();
        muzzle.based_on(base)?;
        let muzzle: Rc<dyn VirtualMuzzle> = Rc::from(muzzle);
        state.set_muzzle(muzzle as Rc<dyn Muzzle>);
        Ok(())
    })
}

/// Adds to a live parameter, scaled by its adding multiplier.
///
/// Fails with [`GunError::UnsetParameter`] if the parameter was never set.
pub fn add_parameter_now(name: &str, delta: impl Into<Lazy<f64>>) -> GunRef {
    let name: Rc<str> = name.into();
    let delta = delta.into();
    setter("add_parameter_now", move |state| {
        let delta = delta.resolve(state)?;
        state.add_parameter(&name, delta).map(drop)
    })
}

/// Scales a live parameter.
///
/// Fails with [`GunError::UnsetParameter`] if the parameter was never set.
pub fn multiply_parameter_now(name: &str, factor: impl Into<Lazy<f64>>) -> GunRef {
    let name: Rc<str> = name.into();
    let factor = factor.into();
    setter("multiply_parameter_now", move |state| {
        let factor = factor.resolve(state)?;
        state.multiply_parameter(&name, factor)
    })
}

/// Scales the multiplier applied to later adds of a live parameter.
///
/// Fails with [`GunError::UnsetParameter`] if the parameter was never set.
pub fn multiply_later_adding(name: &str, factor: impl Into<Lazy<f64>>) -> GunRef {
    let name: Rc<str> = name.into();
    let factor = factor.into();
    setter("multiply_later_adding", move |state| {
        let factor = factor.resolve(state)?;
        state.multiply_later_adding(&name, factor)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gun::modifier::add_parameter;
    use crate::gun::testing::run;
    use crate::gun::{concat, fire, wait};
    use crate::lazy::get_location;
    use crate::muzzle::{AimingMuzzleGenerator, FixedAimMuzzleGenerator};
    use crate::test_support::TestPlayer;
    use kurbo::Affine;

    #[test]
    fn setters_write_the_live_state() {
        let player = TestPlayer::with_muzzle("main");
        let mut state = player.state();
        concat([
            use_parameter("p", 2.0),
            add_parameter_now("p", 3.0),
            multiply_parameter_now("p", 2.0),
            use_text("sprite", "ball"),
            use_vector("offset", (1.0, 2.0)),
        ])
        .play()
        .step(&mut state)
        .unwrap();
        assert_eq!(state.parameter("p"), Some(10.0));
        assert_eq!(state.text("sprite"), Some("ball"));
        assert_eq!(state.vector("offset"), Some(Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn later_adding_scales_both_immediate_and_deferred_adds() {
        let (_, player) = run(&*concat([
            multiply_later_adding("speed", 2.0),
            add_parameter_now("speed", 1.0),
            add_parameter("speed", 1.0),
            fire(()),
        ]));
        assert_eq!(player.fired()[0].parameter("speed"), Some(5.0));
    }

    #[test]
    fn immediate_ops_on_unset_parameters_fail() {
        let player = TestPlayer::with_muzzle("main");
        let mut state = player.state();
        assert_eq!(
            add_parameter_now("nope", 1.0).play().step(&mut state),
            Err(GunError::UnsetParameter("nope".into()))
        );
    }

    #[test]
    fn use_muzzle_switches_muzzle() {
        let player = TestPlayer::with_muzzles(&["main", "left"]);
        let mut state = player.state();
        concat([fire(()), use_muzzle("left"), fire(())])
            .play()
            .step(&mut state)
            .unwrap();
        assert_eq!(player.fired_muzzles(), ["main", "left"]);
        assert_eq!(
            use_muzzle("right").play().step(&mut state),
            Err(GunError::UnknownMuzzle("right".into()))
        );
    }

    #[test]
    fn virtual_muzzle_aims_at_enemy() {
        let player = TestPlayer::with_muzzle("main");
        player
            .test_muzzle("main")
            .set_enemy(Affine::translate((0.0, 10.0)));
        let mut state = player.state();
        concat([use_virtual_muzzle(AimingMuzzleGenerator), fire(())])
            .play()
            .step(&mut state)
            .unwrap();
        let fired = player.fired();
        assert!((fired[0].angle() - 90.0).abs() < 1e-9);
        assert_eq!(player.fired_muzzles(), ["main"], "virtual muzzles fire through their base");
    }

    #[test]
    fn fixed_aim_freezes_at_setup() {
        let player = TestPlayer::with_muzzle("main");
        let main = player.test_muzzle("main");
        main.set_enemy(Affine::translate((-10.0, 0.0)));
        let mut state = player.state();
        let mut play = concat([
            use_virtual_muzzle(FixedAimMuzzleGenerator),
            wait(1),
            fire(()),
        ])
        .play();
        play.step(&mut state).unwrap();
        main.set_enemy(Affine::translate((0.0, 10.0)));
        play.step(&mut state).unwrap();
        assert!((player.fired()[0].angle() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn virtual_muzzle_needs_a_base() {
        let mut state = FiringState::new(TestPlayer::empty());
        assert_eq!(
            use_virtual_muzzle(AimingMuzzleGenerator)
                .play()
                .step(&mut state),
            Err(GunError::NoMuzzleSet)
        );
    }

    #[test]
    fn lazy_vectors_resolve_on_play() {
        let player = TestPlayer::with_location("boss", Vec2::new(5.0, 6.0));
        let mut state = FiringState::new(player);
        use_vector("target", get_location("boss"))
            .play()
            .step(&mut state)
            .unwrap();
        assert_eq!(state.vector("target"), Some(Vec2::new(5.0, 6.0)));
    }
}
