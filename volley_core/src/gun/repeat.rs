// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use super::sequence::body;
use super::{Gun, GunRef, Play, Step, frame_count, repeat_count};
use crate::error::GunError;
use crate::lazy::Lazy;
use crate::repeat::{RepeatHandle, RepeatState};
use crate::state::FiringState;

/// How often, how spaced out, and under which name a body repeats.
#[derive(Clone, Debug)]
pub struct RepeatOptions {
    /// Number of repetitions, resolved once when the repeat starts.
    pub times: Lazy<f64>,
    /// Frames to wait after each repetition's body.
    pub interval: Lazy<f64>,
    /// Name under which the repetition can be addressed by lazy values.
    pub name: Option<String>,
}

impl RepeatOptions {
    /// Repeats `times` times back to back, unnamed.
    pub fn new(times: impl Into<Lazy<f64>>) -> Self {
        Self {
            times: times.into(),
            interval: Lazy::Constant(0.0),
            name: None,
        }
    }

    /// Sets the frames waited after each repetition.
    #[must_use]
    pub fn interval(mut self, interval: impl Into<Lazy<f64>>) -> Self {
        self.interval = interval.into();
        self
    }

    /// Names the repetition.
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Plays a body `times` times in a row.
///
/// Each repetition runs on a fresh fork of the incoming state with a
/// [`RepeatState`] `{ finished: i, total: times }` started on it. A
/// fractional `times` runs the rounded-up number of repetitions while
/// `total` keeps the fraction. After the
/// body finishes, the interval is resolved against that same fork and waited
/// out, then the repetition is finished. Lasts `times * (body + interval)`
/// frames.
#[derive(Clone, Debug)]
pub struct Repeat {
    options: RepeatOptions,
    gun: GunRef,
}

impl Repeat {
    /// Creates a repeat of `gun`.
    pub fn new(options: RepeatOptions, gun: GunRef) -> Self {
        Self { options, gun }
    }
}

impl Gun for Repeat {
    fn play(&self) -> Box<dyn Play> {
        Box::new(RepeatPlay {
            options: self.options.clone(),
            gun: Rc::clone(&self.gun),
            times: None,
            index: 0,
            current: None,
        })
    }
}

/// See [`Repeat`]. Several guns are concatenated into one body.
pub fn repeat(options: RepeatOptions, guns: impl IntoIterator<Item = GunRef>) -> GunRef {
    Rc::new(Repeat::new(options, body(guns)))
}

struct RepeatPlay {
    options: RepeatOptions,
    gun: GunRef,
    times: Option<(u32, f64)>,
    index: u32,
    current: Option<Repetition>,
}

impl Play for RepeatPlay {
    fn step(&mut self, state: &mut FiringState) -> Result<Step, GunError> {
        let (times, total) = match self.times {
            Some(times) => times,
            None => *self.times.insert(repeat_count(&self.options.times, state)?),
        };
        let name = self.options.name.as_deref();
        loop {
            let repetition = match &mut self.current {
                Some(repetition) => repetition,
                None if self.index < times => {
                    let repetition = Repetition::start(
                        state.fork(),
                        RepeatState::new(self.index, total),
                        name,
                        self.gun.play(),
                        0,
                        Interval::Pending(self.options.interval.clone()),
                    );
                    self.current.insert(repetition)
                }
                None => return Ok(Step::Done),
            };
            match repetition.step(name)? {
                Step::Continue => return Ok(Step::Continue),
                Step::Done => {
                    self.current = None;
                    self.index += 1;
                }
            }
        }
    }
}

/// Plays `times` overlapping repetitions of a body.
///
/// Every repetition gets its own fork and [`RepeatState`] up front, and
/// resolves its own interval against that fork. Repetition `i` boots after
/// the sum of the intervals of repetitions `0..i`, plays the body, waits its
/// interval, then finishes. Live repetitions advance once per frame in index
/// order. Lasts `times * interval + body` frames for a constant interval, and
/// zero frames when `times` is zero.
#[derive(Clone, Debug)]
pub struct ParallelRepeat {
    options: RepeatOptions,
    gun: GunRef,
}

impl ParallelRepeat {
    /// Creates a parallel repeat of `gun`.
    pub fn new(options: RepeatOptions, gun: GunRef) -> Self {
        Self { options, gun }
    }
}

impl Gun for ParallelRepeat {
    fn play(&self) -> Box<dyn Play> {
        Box::new(ParallelRepeatPlay {
            options: self.options.clone(),
            gun: Rc::clone(&self.gun),
            live: None,
        })
    }
}

/// See [`ParallelRepeat`]. Several guns are concatenated into one body.
pub fn parallel_repeat(options: RepeatOptions, guns: impl IntoIterator<Item = GunRef>) -> GunRef {
    Rc::new(ParallelRepeat::new(options, body(guns)))
}

struct ParallelRepeatPlay {
    options: RepeatOptions,
    gun: GunRef,
    live: Option<Vec<Repetition>>,
}

impl ParallelRepeatPlay {
    fn boot(&self, state: &FiringState) -> Result<Vec<Repetition>, GunError> {
        let (times, total) = repeat_count(&self.options.times, state)?;
        let name = self.options.name.as_deref();
        let mut repetitions = Vec::new();
        let mut boot = 0_u32;
        for index in 0..times {
            let mut branch = state.fork();
            let handle = branch
                .repeat_states_mut()
                .start(Rc::new(RepeatState::new(index, total)), name);
            let interval = frame_count(&self.options.interval, &branch)?;
            repetitions.push(Repetition {
                state: branch,
                handle,
                boot,
                play: self.gun.play(),
                interval: Interval::Resolved(interval),
                phase: Phase::Boot,
            });
            boot = boot.saturating_add(interval);
        }
        Ok(repetitions)
    }
}

impl Play for ParallelRepeatPlay {
    fn step(&mut self, state: &mut FiringState) -> Result<Step, GunError> {
        if self.live.is_none() {
            self.live = Some(self.boot(state)?);
        }
        let name = self.options.name.as_deref();
        let Some(live) = &mut self.live else {
            return Ok(Step::Done);
        };
        let mut index = 0;
        while let Some(repetition) = live.get_mut(index) {
            match repetition.step(name)? {
                Step::Continue => index += 1,
                Step::Done => {
                    live.remove(index);
                }
            }
        }
        Ok(if live.is_empty() {
            Step::Done
        } else {
            Step::Continue
        })
    }
}

enum Interval {
    Pending(Lazy<f64>),
    Resolved(u32),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Phase {
    Boot,
    Body,
    Interval,
}

/// One repetition: boot delay, body, interval, then finish.
struct Repetition {
    state: FiringState,
    handle: RepeatHandle,
    boot: u32,
    play: Box<dyn Play>,
    interval: Interval,
    phase: Phase,
}

impl Repetition {
    fn start(
        mut state: FiringState,
        repeat: RepeatState,
        name: Option<&str>,
        play: Box<dyn Play>,
        boot: u32,
        interval: Interval,
    ) -> Self {
        let handle = state.repeat_states_mut().start(Rc::new(repeat), name);
        Self {
            state,
            handle,
            boot,
            play,
            interval,
            phase: Phase::Boot,
        }
    }

    fn step(&mut self, name: Option<&str>) -> Result<Step, GunError> {
        loop {
            match self.phase {
                Phase::Boot => {
                    if self.boot > 0 {
                        self.boot -= 1;
                        return Ok(Step::Continue);
                    }
                    self.phase = Phase::Body;
                }
                Phase::Body => match self.play.step(&mut self.state)? {
                    Step::Continue => return Ok(Step::Continue),
                    Step::Done => self.phase = Phase::Interval,
                },
                Phase::Interval => {
                    let remaining = match &self.interval {
                        Interval::Resolved(remaining) => *remaining,
                        Interval::Pending(lazy) => frame_count(lazy, &self.state)?,
                    };
                    if remaining > 0 {
                        self.interval = Interval::Resolved(remaining - 1);
                        return Ok(Step::Continue);
                    }
                    self.state
                        .repeat_states_mut()
                        .finish(&self.handle, name)?;
                    self.interval = Interval::Resolved(0);
                    return Ok(Step::Done);
                }
            }
        }
    }
}
