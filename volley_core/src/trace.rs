// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for gun playback.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`GunPlayer`](crate::player::GunPlayer) calls as a gun tree plays. All
//! method bodies default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).

use kurbo::Point;

use crate::error::GunError;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a gun tree starts playing.
#[derive(Clone, Copy, Debug)]
pub struct PlayStartEvent {
    /// Name of the initial muzzle, if the player binds one.
    pub muzzle: Option<&'static str>,
    /// Number of parameters seeded into the root state.
    pub parameters: usize,
}

/// Emitted after every playback frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameEvent {
    /// Zero-based frame counter.
    pub frame_index: u64,
    /// Bullets fired during this frame.
    pub bullets: u32,
    /// Whether the gun tree finished during this frame.
    pub finished: bool,
}

/// Emitted for every bullet, after the muzzle has accepted it.
#[derive(Clone, Copy, Debug)]
pub struct BulletFiredEvent {
    /// Frame the bullet was fired in.
    pub frame_index: u64,
    /// World-space spawn position.
    pub position: Point,
    /// World-space spawn angle in degrees.
    pub angle: f64,
}

/// Emitted once when a gun tree finishes.
#[derive(Clone, Copy, Debug)]
pub struct PlayEndEvent {
    /// Total frames the tree consumed.
    pub frames: u64,
    /// Total bullets fired.
    pub bullets: u64,
}

/// Emitted once when playback stops on an error.
#[derive(Clone, Copy, Debug)]
pub struct PlayAbortEvent<'a> {
    /// Frame during which the error occurred.
    pub frame_index: u64,
    /// The error that stopped playback.
    pub error: &'a GunError,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from gun playback.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when playback starts.
    fn on_play_start(&mut self, e: &PlayStartEvent) {
        _ = e;
    }

    /// Called after every frame.
    fn on_frame(&mut self, e: &FrameEvent) {
        _ = e;
    }

    /// Called for every fired bullet.
    fn on_bullet_fired(&mut self, e: &BulletFiredEvent) {
        _ = e;
    }

    /// Called when the gun tree finishes.
    fn on_play_end(&mut self, e: &PlayEndEvent) {
        _ = e;
    }

    /// Called when playback fails.
    fn on_play_abort(&mut self, e: &PlayAbortEvent<'_>) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`PlayStartEvent`].
    #[inline]
    pub fn play_start(&mut self, e: &PlayStartEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_play_start(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameEvent`].
    #[inline]
    pub fn frame(&mut self, e: &FrameEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`BulletFiredEvent`].
    #[inline]
    pub fn bullet_fired(&mut self, e: &BulletFiredEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_bullet_fired(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PlayEndEvent`].
    #[inline]
    pub fn play_end(&mut self, e: &PlayEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_play_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PlayAbortEvent`].
    #[inline]
    pub fn play_abort(&mut self, e: &PlayAbortEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_play_abort(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
