// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON-lines trace recording.
//!
//! [`JsonLinesSink`] implements [`TraceSink`] and writes each event as one
//! JSON object on its own line. Every object carries an `"event"` tag:
//! `start`, `frame`, `bullet`, `end` or `abort`. [`parse`] reads a recording
//! back into [`Value`]s.

use std::io::{self, Write};

use serde_json::{Value, json};

use volley_core::trace::{
    BulletFiredEvent, FrameEvent, PlayAbortEvent, PlayEndEvent, PlayStartEvent, TraceSink,
};

/// Writes one JSON object per trace event.
pub struct JsonLinesSink<W: Write = Box<dyn Write>> {
    writer: W,
    written: u64,
    failed: bool,
}

impl<W: Write> std::fmt::Debug for JsonLinesSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesSink")
            .field("written", &self.written)
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}

impl JsonLinesSink {
    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> JsonLinesSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            failed: false,
        }
    }

    /// Number of events written so far.
    #[must_use]
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Whether any write to the destination failed.
    ///
    /// Events after the first failure are dropped.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Consumes the sink and returns the writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn emit(&mut self, value: &Value) {
        if self.failed {
            return;
        }
        let result = serde_json::to_writer(&mut self.writer, value)
            .map_err(io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        match result {
            Ok(()) => self.written += 1,
            Err(_) => self.failed = true,
        }
    }
}

impl<W: Write> TraceSink for JsonLinesSink<W> {
    fn on_play_start(&mut self, e: &PlayStartEvent) {
        self.emit(&json!({
            "event": "start",
            "muzzle": e.muzzle,
            "parameters": e.parameters,
        }));
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        self.emit(&json!({
            "event": "frame",
            "frame_index": e.frame_index,
            "bullets": e.bullets,
            "finished": e.finished,
        }));
    }

    fn on_bullet_fired(&mut self, e: &BulletFiredEvent) {
        self.emit(&json!({
            "event": "bullet",
            "frame_index": e.frame_index,
            "x": e.position.x,
            "y": e.position.y,
            "angle": e.angle,
        }));
    }

    fn on_play_end(&mut self, e: &PlayEndEvent) {
        self.emit(&json!({
            "event": "end",
            "frames": e.frames,
            "bullets": e.bullets,
        }));
    }

    fn on_play_abort(&mut self, e: &PlayAbortEvent<'_>) {
        self.emit(&json!({
            "event": "abort",
            "frame_index": e.frame_index,
            "error": e.error.to_string(),
        }));
    }
}

/// Parses a JSON-lines recording, skipping blank lines.
///
/// # Errors
///
/// Returns the first line that is not valid JSON.
pub fn parse(input: &str) -> Result<Vec<Value>, serde_json::Error> {
    input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(serde_json::from_str::<Value>)
        .collect()
}
