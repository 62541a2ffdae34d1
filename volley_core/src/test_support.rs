// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory player and muzzles shared by the unit tests.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use kurbo::{Affine, Vec2};

use crate::error::GunError;
use crate::fire_data::FireData;
use crate::muzzle::{Bullet, Muzzle};
use crate::player::Player;
use crate::state::FiringState;

#[derive(Debug, Default)]
struct Log {
    fired: Vec<(&'static str, FireData, Bullet)>,
    notified: Vec<FireData>,
}

/// A muzzle that records every bullet into its player's log.
#[derive(Debug)]
pub(crate) struct TestMuzzle {
    name: &'static str,
    transform: Cell<Affine>,
    enemy: Cell<Affine>,
    log: Rc<RefCell<Log>>,
}

impl TestMuzzle {
    pub(crate) fn set_transform(&self, transform: Affine) {
        self.transform.set(transform);
    }

    pub(crate) fn set_enemy(&self, enemy: Affine) {
        self.enemy.set(enemy);
    }
}

impl Muzzle for TestMuzzle {
    fn fire(&self, data: FireData, bullet: Bullet) -> Result<(), GunError> {
        self.log.borrow_mut().fired.push((self.name, data, bullet));
        Ok(())
    }

    fn muzzle_transform(&self) -> Result<Affine, GunError> {
        Ok(self.transform.get())
    }

    fn enemy_transform(&self) -> Result<Affine, GunError> {
        Ok(self.enemy.get())
    }
}

/// A player with fixed muzzles and locations.
#[derive(Debug)]
pub(crate) struct TestPlayer {
    muzzles: Vec<Rc<TestMuzzle>>,
    locations: Vec<(&'static str, Vec2)>,
    log: Rc<RefCell<Log>>,
}

impl TestPlayer {
    fn build(names: &[&'static str], locations: Vec<(&'static str, Vec2)>) -> Rc<Self> {
        let log = Rc::new(RefCell::new(Log::default()));
        let muzzles = names
            .iter()
            .map(|&name| {
                Rc::new(TestMuzzle {
                    name,
                    transform: Cell::new(Affine::IDENTITY),
                    enemy: Cell::new(Affine::IDENTITY),
                    log: Rc::clone(&log),
                })
            })
            .collect();
        Rc::new(Self {
            muzzles,
            locations,
            log,
        })
    }

    /// No muzzles, no locations.
    pub(crate) fn empty() -> Rc<Self> {
        Self::build(&[], Vec::new())
    }

    pub(crate) fn with_muzzle(name: &'static str) -> Rc<Self> {
        Self::build(&[name], Vec::new())
    }

    /// The first muzzle becomes the default of [`state`](Self::state).
    pub(crate) fn with_muzzles(names: &[&'static str]) -> Rc<Self> {
        Self::build(names, Vec::new())
    }

    pub(crate) fn with_location(name: &'static str, location: Vec2) -> Rc<Self> {
        Self::build(&[], alloc::vec![(name, location)])
    }

    /// A root state with `speed = 1`, `size = 1` and the first muzzle bound.
    pub(crate) fn state(self: &Rc<Self>) -> FiringState {
        let mut state = FiringState::new(self.clone());
        state.set_parameter("speed", 1.0);
        state.set_parameter("size", 1.0);
        if let Some(muzzle) = self.muzzles.first() {
            state.set_muzzle(muzzle.clone());
        }
        state
    }

    pub(crate) fn test_muzzle(&self, name: &str) -> Rc<TestMuzzle> {
        self.muzzles
            .iter()
            .find(|muzzle| muzzle.name == name)
            .cloned()
            .unwrap_or_else(|| panic!("no test muzzle named {name}"))
    }

    /// Fire data of every bullet, in firing order.
    pub(crate) fn fired(&self) -> Vec<FireData> {
        self.log
            .borrow()
            .fired
            .iter()
            .map(|(_, data, _)| data.clone())
            .collect()
    }

    /// Which muzzle fired each bullet.
    pub(crate) fn fired_muzzles(&self) -> Vec<&'static str> {
        self.log.borrow().fired.iter().map(|(name, ..)| *name).collect()
    }

    pub(crate) fn bullets(&self) -> Vec<Bullet> {
        self.log
            .borrow()
            .fired
            .iter()
            .map(|(_, _, bullet)| Rc::clone(bullet))
            .collect()
    }

    /// Fire data passed to [`Player::notify_fired`].
    pub(crate) fn notified(&self) -> Vec<FireData> {
        self.log.borrow().notified.clone()
    }
}

impl Player for TestPlayer {
    fn muzzle(&self, name: &str) -> Result<Rc<dyn Muzzle>, GunError> {
        self.muzzles
            .iter()
            .find(|muzzle| muzzle.name == name)
            .map(|muzzle| Rc::clone(muzzle) as Rc<dyn Muzzle>)
            .ok_or_else(|| GunError::UnknownMuzzle(name.into()))
    }

    fn location(&self, name: &str) -> Result<Vec2, GunError> {
        self.locations
            .iter()
            .find(|(location, _)| *location == name)
            .map(|&(_, position)| position)
            .ok_or_else(|| GunError::UnknownLocation(name.into()))
    }

    fn notify_fired(&self, data: &FireData) {
        self.log.borrow_mut().notified.push(data.clone());
    }
}
