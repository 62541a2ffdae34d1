// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host-facing side of the engine.
//!
//! A [`Player`] is what the host game provides: it owns the muzzles, knows
//! where named locations are, and hears about every fired bullet.
//!
//! [`GunPlayer`] is the reference driver. It seeds a fresh [`FiringState`]
//! from a [`PlayerConfig`] when started, then advances the gun tree by one
//! frame per [`tick`](GunPlayer::tick), reporting what happened through a
//! [`Tracer`].
//!
//! ```text
//!   start() ──► PlayerConfig::initial_state() ──► Gun::play()
//!                                                     │
//!                 ┌───────────────────────────────────┘
//!                 ▼
//!   tick() ──► Play::step() ──► Muzzle::fire() ──► Player::notify_fired()
//!     │
//!     └──► Tracer: on_bullet_fired / on_frame / on_play_end / on_play_abort
//! ```

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use kurbo::{Point, Vec2};

use crate::error::GunError;
use crate::fire_data::FireData;
use crate::gun::{GunRef, Play, Step};
use crate::muzzle::Muzzle;
use crate::state::FiringState;
use crate::trace::{
    BulletFiredEvent, FrameEvent, PlayAbortEvent, PlayEndEvent, PlayStartEvent, Tracer,
};

/// Host collaborator: muzzle lookup, location lookup, fire notification.
pub trait Player: fmt::Debug {
    /// Returns the muzzle registered as `name`.
    ///
    /// # Errors
    ///
    /// [`GunError::UnknownMuzzle`] if there is none.
    fn muzzle(&self, name: &str) -> Result<Rc<dyn Muzzle>, GunError>;

    /// Returns the current position of the location called `name`.
    ///
    /// # Errors
    ///
    /// [`GunError::UnknownLocation`] if there is none. The default
    /// implementation knows no locations.
    fn location(&self, name: &str) -> Result<Vec2, GunError> {
        Err(GunError::UnknownLocation(name.into()))
    }

    /// Called after a muzzle accepted a bullet, with its final fire data.
    fn notify_fired(&self, data: &FireData) {
        _ = data;
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What a [`GunPlayer`] seeds the root firing state with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerConfig {
    /// Parameters declared before the gun starts.
    pub parameters: &'static [(&'static str, f64)],
    /// Texts set before the gun starts.
    pub texts: &'static [(&'static str, &'static str)],
    /// Muzzle bound before the gun starts, if any.
    pub muzzle: Option<&'static str>,
}

impl PlayerConfig {
    /// `speed = 1` and `size = 1`.
    pub const DEFAULT_PARAMETERS: &'static [(&'static str, f64)] = &[("speed", 1.0), ("size", 1.0)];

    /// Default parameters, no texts, no muzzle.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            parameters: Self::DEFAULT_PARAMETERS,
            texts: &[],
            muzzle: None,
        }
    }

    /// Binds the muzzle called `name` before the gun starts.
    #[must_use]
    pub const fn with_muzzle(mut self, name: &'static str) -> Self {
        self.muzzle = Some(name);
        self
    }

    /// Replaces the seeded parameters.
    #[must_use]
    pub const fn with_parameters(mut self, parameters: &'static [(&'static str, f64)]) -> Self {
        self.parameters = parameters;
        self
    }

    /// Replaces the seeded texts.
    #[must_use]
    pub const fn with_texts(mut self, texts: &'static [(&'static str, &'static str)]) -> Self {
        self.texts = texts;
        self
    }

    /// Builds a fresh root state owned by `player`.
    ///
    /// # Errors
    ///
    /// [`GunError::UnknownMuzzle`] if the configured muzzle does not exist.
    pub fn initial_state(&self, player: Rc<dyn Player>) -> Result<FiringState, GunError> {
        let mut state = FiringState::new(player);
        for (name, value) in self.parameters {
            state.set_parameter(name, *value);
        }
        for (name, text) in self.texts {
            state.set_text(name, text);
        }
        if let Some(name) = self.muzzle {
            let muzzle = state.player().muzzle(name)?;
            state.set_muzzle(muzzle);
        }
        Ok(state)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// GunPlayer
// ---------------------------------------------------------------------------

/// Where a [`GunPlayer`] is in its life cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayStatus {
    /// Not started yet.
    Idle,
    /// Started and not finished.
    Running,
    /// The gun tree finished.
    Finished,
    /// A step failed; the pattern is abandoned.
    Failed,
}

/// Drives one gun tree frame by frame.
pub struct GunPlayer {
    gun: GunRef,
    host: Rc<dyn Player>,
    config: PlayerConfig,
    run: Option<Run>,
    status: PlayStatus,
    frame_index: u64,
    bullets: u64,
}

impl fmt::Debug for GunPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GunPlayer")
            .field("gun", &self.gun)
            .field("config", &self.config)
            .field("status", &self.status)
            .field("frame_index", &self.frame_index)
            .field("bullets", &self.bullets)
            .finish_non_exhaustive()
    }
}

struct Run {
    play: Box<dyn Play>,
    state: FiringState,
    observer: Rc<Observer>,
}

impl GunPlayer {
    /// Creates an idle player for `gun` with the default configuration.
    #[must_use]
    pub fn new(gun: GunRef, host: Rc<dyn Player>) -> Self {
        Self::with_config(gun, host, PlayerConfig::new())
    }

    /// Creates an idle player for `gun`.
    #[must_use]
    pub fn with_config(gun: GunRef, host: Rc<dyn Player>, config: PlayerConfig) -> Self {
        Self {
            gun,
            host,
            config,
            run: None,
            status: PlayStatus::Idle,
            frame_index: 0,
            bullets: 0,
        }
    }

    /// Seeds a fresh root state and starts a new playback.
    ///
    /// Calling `start` again restarts from scratch.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`PlayerConfig::initial_state`]; the player
    /// is then [`PlayStatus::Failed`].
    pub fn start(&mut self, tracer: &mut Tracer<'_>) -> Result<(), GunError> {
        self.run = None;
        self.frame_index = 0;
        self.bullets = 0;

        let observer = Rc::new(Observer {
            host: Rc::clone(&self.host),
            fired: RefCell::new(Vec::new()),
        });
        let state = match self.config.initial_state(observer.clone()) {
            Ok(state) => state,
            Err(error) => return Err(self.abort(tracer, error)),
        };
        self.run = Some(Run {
            play: self.gun.play(),
            state,
            observer,
        });
        self.status = PlayStatus::Running;
        tracer.play_start(&PlayStartEvent {
            muzzle: self.config.muzzle,
            parameters: self.config.parameters.len(),
        });
        Ok(())
    }

    /// Advances the gun tree by one frame and returns the resulting status.
    ///
    /// Ticking a finished or failed player does nothing and returns that
    /// status again.
    ///
    /// # Errors
    ///
    /// - [`GunError::NotStarted`] before [`start`](Self::start).
    /// - Any failure of the gun tree. The player is then
    ///   [`PlayStatus::Failed`] and will not advance further.
    pub fn tick(&mut self, tracer: &mut Tracer<'_>) -> Result<PlayStatus, GunError> {
        match self.status {
            PlayStatus::Idle => return Err(GunError::NotStarted),
            PlayStatus::Finished | PlayStatus::Failed => return Ok(self.status),
            PlayStatus::Running => {}
        }
        let Some(run) = &mut self.run else {
            return Err(GunError::NotStarted);
        };

        let result = run.play.step(&mut run.state);
        let fired = run.observer.drain();
        for &(position, angle) in &fired {
            tracer.bullet_fired(&BulletFiredEvent {
                frame_index: self.frame_index,
                position,
                angle,
            });
        }
        self.bullets += fired.len() as u64;

        let step = match result {
            Ok(step) => step,
            Err(error) => return Err(self.abort(tracer, error)),
        };
        let finished = step == Step::Done;
        tracer.frame(&FrameEvent {
            frame_index: self.frame_index,
            bullets: u32::try_from(fired.len()).unwrap_or(u32::MAX),
            finished,
        });
        if finished {
            self.run = None;
            self.status = PlayStatus::Finished;
            tracer.play_end(&PlayEndEvent {
                frames: self.frame_index,
                bullets: self.bullets,
            });
        } else {
            self.frame_index += 1;
        }
        Ok(self.status)
    }

    fn abort(&mut self, tracer: &mut Tracer<'_>, error: GunError) -> GunError {
        self.run = None;
        self.status = PlayStatus::Failed;
        tracer.play_abort(&PlayAbortEvent {
            frame_index: self.frame_index,
            error: &error,
        });
        error
    }

    /// Current life-cycle status.
    #[must_use]
    pub fn status(&self) -> PlayStatus {
        self.status
    }

    /// Frames consumed so far. Once finished, this is the gun's duration.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frame_index
    }

    /// Bullets fired so far.
    #[must_use]
    pub fn bullets(&self) -> u64 {
        self.bullets
    }

    /// The root firing state, while running.
    #[must_use]
    pub fn state(&self) -> Option<&FiringState> {
        self.run.as_ref().map(|run| &run.state)
    }
}

/// Forwards to the host and remembers what was fired during the frame.
#[derive(Debug)]
struct Observer {
    host: Rc<dyn Player>,
    fired: RefCell<Vec<(Point, f64)>>,
}

impl Observer {
    fn drain(&self) -> Vec<(Point, f64)> {
        core::mem::take(&mut *self.fired.borrow_mut())
    }
}

impl Player for Observer {
    fn muzzle(&self, name: &str) -> Result<Rc<dyn Muzzle>, GunError> {
        self.host.muzzle(name)
    }

    fn location(&self, name: &str) -> Result<Vec2, GunError> {
        self.host.location(name)
    }

    fn notify_fired(&self, data: &FireData) {
        self.fired.borrow_mut().push((data.position(), data.angle()));
        self.host.notify_fired(data);
    }
}
