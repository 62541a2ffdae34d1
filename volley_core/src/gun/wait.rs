// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::rc::Rc;

use super::{Gun, GunRef, Play, Step, frame_count, instant};
use crate::error::GunError;
use crate::lazy::Lazy;
use crate::state::FiringState;

/// Does nothing for a number of frames.
///
/// The count is resolved once, on the first step.
#[derive(Clone, Debug)]
pub struct Wait {
    frames: Lazy<f64>,
}

impl Wait {
    /// Waits `frames` frames (rounded up; negative counts wait zero).
    #[must_use]
    pub fn new(frames: impl Into<Lazy<f64>>) -> Self {
        Self {
            frames: frames.into(),
        }
    }
}

impl Gun for Wait {
    fn play(&self) -> Box<dyn Play> {
        Box::new(WaitPlay {
            frames: self.frames.clone(),
            remaining: None,
        })
    }
}

/// See [`Wait`].
pub fn wait(frames: impl Into<Lazy<f64>>) -> GunRef {
    Rc::new(Wait::new(frames))
}

struct WaitPlay {
    frames: Lazy<f64>,
    remaining: Option<u32>,
}

impl Play for WaitPlay {
    fn step(&mut self, state: &mut FiringState) -> Result<Step, GunError> {
        let remaining = match self.remaining {
            Some(remaining) => remaining,
            None => frame_count(&self.frames, state)?,
        };
        if remaining == 0 {
            self.remaining = Some(0);
            return Ok(Step::Done);
        }
        self.remaining = Some(remaining - 1);
        Ok(Step::Continue)
    }
}

/// Finishes immediately without doing anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct Nop;

impl Gun for Nop {
    fn play(&self) -> Box<dyn Play> {
        instant(|_| Ok(()))
    }
}

/// See [`Nop`].
pub fn nop() -> GunRef {
    Rc::new(Nop)
}
