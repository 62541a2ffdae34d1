// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording stage and run helpers for volley demos and tests.
//!
//! A [`Stage`] is a minimal host: it owns named [`RecordingMuzzle`]s and
//! named locations, and records every bullet as a [`Shot`] stamped with the
//! frame it was fired in. [`run`] drives a gun tree on a stage to completion
//! through [`GunPlayer`].

#![no_std]

extern crate alloc;

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use hashbrown::HashMap;
use volley_core::error::GunError;
use volley_core::fire_data::FireData;
use volley_core::gun::GunRef;
use volley_core::kurbo::{Affine, Vec2};
use volley_core::muzzle::{Bullet, Muzzle};
use volley_core::player::{GunPlayer, PlayStatus, Player, PlayerConfig};
use volley_core::trace::Tracer;

/// Name of the muzzle created by [`Stage::with_main_muzzle`].
pub const MAIN: &str = "main";

/// One bullet as a [`RecordingMuzzle`] received it.
#[derive(Clone, Debug)]
pub struct Shot {
    /// Muzzle that fired the bullet.
    pub muzzle: Rc<str>,
    /// Stage frame at the time of firing.
    pub frame: u64,
    /// Final fire data, in world space.
    pub data: FireData,
    /// The opaque bullet payload.
    pub bullet: Bullet,
}

impl Shot {
    /// Spawn angle in degrees.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.data.angle()
    }
}

#[derive(Debug, Default)]
struct Log {
    frame: Cell<u64>,
    shots: RefCell<Vec<Shot>>,
    notified: Cell<u64>,
}

// ---------------------------------------------------------------------------
// RecordingMuzzle
// ---------------------------------------------------------------------------

/// A movable muzzle that records every bullet into its stage.
#[derive(Debug)]
pub struct RecordingMuzzle {
    name: Rc<str>,
    transform: Cell<Affine>,
    enemy: Cell<Affine>,
    log: Rc<Log>,
}

impl RecordingMuzzle {
    /// The name this muzzle is registered under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Moves or turns the muzzle.
    pub fn set_transform(&self, transform: Affine) {
        self.transform.set(transform);
    }

    /// Moves the enemy this muzzle aims at.
    pub fn set_enemy(&self, enemy: Affine) {
        self.enemy.set(enemy);
    }
}

impl Muzzle for RecordingMuzzle {
    fn fire(&self, data: FireData, bullet: Bullet) -> Result<(), GunError> {
        self.log.shots.borrow_mut().push(Shot {
            muzzle: Rc::clone(&self.name),
            frame: self.log.frame.get(),
            data,
            bullet,
        });
        Ok(())
    }

    fn muzzle_transform(&self) -> Result<Affine, GunError> {
        Ok(self.transform.get())
    }

    fn enemy_transform(&self) -> Result<Affine, GunError> {
        Ok(self.enemy.get())
    }
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// A host [`Player`] with named muzzles and locations.
#[derive(Debug, Default)]
pub struct Stage {
    muzzles: RefCell<HashMap<String, Rc<RecordingMuzzle>>>,
    locations: RefCell<HashMap<String, Vec2>>,
    log: Rc<Log>,
}

impl Stage {
    /// Creates an empty stage.
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Creates a stage with one muzzle called [`MAIN`] at the origin.
    #[must_use]
    pub fn with_main_muzzle() -> Rc<Self> {
        let stage = Self::new();
        stage.add_muzzle(MAIN, Affine::IDENTITY);
        stage
    }

    /// Registers a muzzle, replacing any muzzle with the same name.
    pub fn add_muzzle(&self, name: &str, transform: Affine) -> Rc<RecordingMuzzle> {
        let muzzle = Rc::new(RecordingMuzzle {
            name: name.into(),
            transform: Cell::new(transform),
            enemy: Cell::new(Affine::IDENTITY),
            log: Rc::clone(&self.log),
        });
        self.muzzles
            .borrow_mut()
            .insert(name.into(), Rc::clone(&muzzle));
        muzzle
    }

    /// Returns the muzzle registered as `name`.
    #[must_use]
    pub fn recording_muzzle(&self, name: &str) -> Option<Rc<RecordingMuzzle>> {
        self.muzzles.borrow().get(name).cloned()
    }

    /// Places or moves a named location.
    pub fn set_location(&self, name: &str, position: Vec2) {
        self.locations.borrow_mut().insert(name.into(), position);
    }

    /// Frame stamped onto new shots.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.log.frame.get()
    }

    /// Sets the frame stamped onto new shots.
    pub fn set_frame(&self, frame: u64) {
        self.log.frame.set(frame);
    }

    /// Every recorded shot, in firing order.
    #[must_use]
    pub fn shots(&self) -> Vec<Shot> {
        self.log.shots.borrow().clone()
    }

    /// Number of recorded shots.
    #[must_use]
    pub fn shot_count(&self) -> usize {
        self.log.shots.borrow().len()
    }

    /// Number of [`Player::notify_fired`] calls.
    #[must_use]
    pub fn notified(&self) -> u64 {
        self.log.notified.get()
    }

    /// Forgets all shots and resets the frame to zero.
    pub fn clear(&self) {
        self.log.shots.borrow_mut().clear();
        self.log.frame.set(0);
        self.log.notified.set(0);
    }
}

impl Player for Stage {
    fn muzzle(&self, name: &str) -> Result<Rc<dyn Muzzle>, GunError> {
        self.recording_muzzle(name)
            .map(|muzzle| muzzle as Rc<dyn Muzzle>)
            .ok_or_else(|| GunError::UnknownMuzzle(name.into()))
    }

    fn location(&self, name: &str) -> Result<Vec2, GunError> {
        self.locations
            .borrow()
            .get(name)
            .copied()
            .ok_or_else(|| GunError::UnknownLocation(name.into()))
    }

    fn notify_fired(&self, data: &FireData) {
        _ = data;
        self.log.notified.set(self.log.notified.get() + 1);
    }
}

// ---------------------------------------------------------------------------
// Running
// ---------------------------------------------------------------------------

/// Result of running a gun tree to completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    /// Frames the tree consumed.
    pub frames: u64,
    /// Bullets fired.
    pub bullets: u64,
}

/// Why [`run`] stopped early.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunError {
    /// The gun tree failed.
    Gun(GunError),
    /// The gun tree was still running after this many frames.
    FrameLimit(u64),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gun(error) => write!(f, "gun failed: {error}"),
            Self::FrameLimit(limit) => write!(f, "still running after {limit} frames"),
        }
    }
}

impl core::error::Error for RunError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Gun(error) => Some(error),
            Self::FrameLimit(_) => None,
        }
    }
}

impl From<GunError> for RunError {
    fn from(error: GunError) -> Self {
        Self::Gun(error)
    }
}

/// Frames [`run`] allows before giving up.
pub const DEFAULT_FRAME_LIMIT: u64 = 10_000;

/// Plays `gun` on `stage` until it finishes.
///
/// The stage frame is updated before every tick so shots carry the frame
/// they were fired in.
///
/// # Errors
///
/// - [`RunError::Gun`] if starting or any step fails.
/// - [`RunError::FrameLimit`] if the tree runs longer than `frame_limit`.
pub fn run(
    gun: GunRef,
    stage: &Rc<Stage>,
    config: PlayerConfig,
    tracer: &mut Tracer<'_>,
    frame_limit: u64,
) -> Result<Outcome, RunError> {
    let mut player = GunPlayer::with_config(gun, stage.clone(), config);
    player.start(tracer)?;
    loop {
        stage.set_frame(player.frames());
        if player.tick(tracer)? != PlayStatus::Running {
            break;
        }
        if player.frames() > frame_limit {
            return Err(RunError::FrameLimit(frame_limit));
        }
    }
    Ok(Outcome {
        frames: player.frames(),
        bullets: player.bullets(),
    })
}

/// Plays `gun` from the [`MAIN`] muzzle with default parameters and no
/// tracing.
///
/// # Errors
///
/// See [`run`].
pub fn run_main(gun: GunRef, stage: &Rc<Stage>) -> Result<Outcome, RunError> {
    run(
        gun,
        stage,
        PlayerConfig::new().with_muzzle(MAIN),
        &mut Tracer::none(),
        DEFAULT_FRAME_LIMIT,
    )
}
