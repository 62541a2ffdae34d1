// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;

use super::modifier::invert_modifier;
use super::sequence::body;
use super::{Gun, GunRef, Play, Step};
use crate::error::GunError;
use crate::state::FiringState;

/// Setup of the inverted branch of a [`Mirror`] or [`Alternate`].
///
/// The inverted branch negates the rotation of everything it fires. It may
/// additionally switch to another muzzle and negate either translation axis.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvertOptions {
    /// Muzzle the inverted branch fires from, if not the current one.
    pub inverted_muzzle_name: Option<String>,
    /// Negate the X translation of inverted bullets.
    pub mirror_translation_x: bool,
    /// Negate the Y translation of inverted bullets.
    pub mirror_translation_y: bool,
}

impl InvertOptions {
    /// Rotation-only inversion on the current muzzle.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inverted_muzzle_name: None,
            mirror_translation_x: false,
            mirror_translation_y: false,
        }
    }

    /// Fires the inverted branch from the muzzle called `name`.
    #[must_use]
    pub fn muzzle(mut self, name: &str) -> Self {
        self.inverted_muzzle_name = Some(name.into());
        self
    }

    /// Also negates the X translation.
    #[must_use]
    pub const fn mirror_x(mut self) -> Self {
        self.mirror_translation_x = true;
        self
    }

    /// Also negates the Y translation.
    #[must_use]
    pub const fn mirror_y(mut self) -> Self {
        self.mirror_translation_y = true;
        self
    }

    /// Forks `state` into the inverted branch.
    fn fork(&self, state: &FiringState) -> Result<FiringState, GunError> {
        let mut inverted = state.fork();
        if let Some(name) = &self.inverted_muzzle_name {
            let muzzle = inverted.player().muzzle(name)?;
            inverted.set_muzzle(muzzle);
        }
        inverted.push_modifier(invert_modifier(
            self.mirror_translation_x,
            self.mirror_translation_y,
        ));
        Ok(inverted)
    }
}

/// Plays a gun and its inverted twin concurrently.
///
/// The plain half runs on the incoming state; the inverted half runs on a
/// fork taken before the plain half's first step. Lasts as long as the gun.
#[derive(Clone, Debug)]
pub struct Mirror {
    options: InvertOptions,
    gun: GunRef,
}

impl Mirror {
    /// Creates a mirror of `gun`.
    pub fn new(options: InvertOptions, gun: GunRef) -> Self {
        Self { options, gun }
    }
}

impl Gun for Mirror {
    fn play(&self) -> Box<dyn Play> {
        Box::new(MirrorPlay {
            options: self.options.clone(),
            plain: Some(self.gun.play()),
            inverted: None,
            pending: Some(self.gun.play()),
        })
    }
}

/// See [`Mirror`]. Several guns are concatenated into one body.
pub fn mirror(options: InvertOptions, guns: impl IntoIterator<Item = GunRef>) -> GunRef {
    Rc::new(Mirror::new(options, body(guns)))
}

struct MirrorPlay {
    options: InvertOptions,
    plain: Option<Box<dyn Play>>,
    inverted: Option<(Box<dyn Play>, FiringState)>,
    /// The inverted playback, until its branch has been forked.
    pending: Option<Box<dyn Play>>,
}

impl Play for MirrorPlay {
    fn step(&mut self, state: &mut FiringState) -> Result<Step, GunError> {
        if let Some(play) = self.pending.take() {
            self.inverted = Some((play, self.options.fork(state)?));
        }
        if let Some(plain) = &mut self.plain
            && plain.step(state)?.is_done()
        {
            self.plain = None;
        }
        if let Some((play, branch)) = &mut self.inverted
            && play.step(branch)?.is_done()
        {
            self.inverted = None;
        }
        Ok(if self.plain.is_none() && self.inverted.is_none() {
            Step::Done
        } else {
            Step::Continue
        })
    }
}

/// Plays a gun, then its inverted twin.
///
/// Uses the same setup as [`Mirror`], with the inverted fork also taken
/// before the plain half starts. Lasts twice as long as the gun.
#[derive(Clone, Debug)]
pub struct Alternate {
    options: InvertOptions,
    gun: GunRef,
}

impl Alternate {
    /// Creates an alternation of `gun`.
    pub fn new(options: InvertOptions, gun: GunRef) -> Self {
        Self { options, gun }
    }
}

impl Gun for Alternate {
    fn play(&self) -> Box<dyn Play> {
        Box::new(AlternatePlay {
            options: self.options.clone(),
            gun: Rc::clone(&self.gun),
            phase: AlternatePhase::Start,
        })
    }
}

/// See [`Alternate`]. Several guns are concatenated into one body.
pub fn alternate(options: InvertOptions, guns: impl IntoIterator<Item = GunRef>) -> GunRef {
    Rc::new(Alternate::new(options, body(guns)))
}

enum AlternatePhase {
    Start,
    Plain(Box<dyn Play>, FiringState),
    Inverted(Box<dyn Play>, FiringState),
    Done,
}

struct AlternatePlay {
    options: InvertOptions,
    gun: GunRef,
    phase: AlternatePhase,
}

impl Play for AlternatePlay {
    fn step(&mut self, state: &mut FiringState) -> Result<Step, GunError> {
        loop {
            match &mut self.phase {
                AlternatePhase::Start => {
                    let inverted = self.options.fork(state)?;
                    self.phase = AlternatePhase::Plain(self.gun.play(), inverted);
                }
                AlternatePhase::Plain(play, _) => {
                    if !play.step(state)?.is_done() {
                        return Ok(Step::Continue);
                    }
                    let AlternatePhase::Plain(_, inverted) =
                        core::mem::replace(&mut self.phase, AlternatePhase::Done)
                    else {
                        return Ok(Step::Done);
                    };
                    self.phase = AlternatePhase::Inverted(self.gun.play(), inverted);
                }
                AlternatePhase::Inverted(play, branch) => {
                    if !play.step(branch)?.is_done() {
                        return Ok(Step::Continue);
                    }
                    self.phase = AlternatePhase::Done;
                }
                AlternatePhase::Done => return Ok(Step::Done),
            }
        }
    }
}
