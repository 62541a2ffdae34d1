// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Per-bullet
//! lines can be switched off for dense patterns.

use std::io::Write;

use volley_core::trace::{
    BulletFiredEvent, FrameEvent, PlayAbortEvent, PlayEndEvent, PlayStartEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    bullets: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("bullets", &self.bullets)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            bullets: true,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            bullets: true,
        }
    }

    /// Skips `[bullet]` lines; frame lines still carry the count.
    #[must_use]
    pub fn without_bullets(mut self) -> Self {
        self.bullets = false;
        self
    }

    /// Consumes the sink and returns the writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_play_start(&mut self, e: &PlayStartEvent) {
        let _ = writeln!(
            self.writer,
            "[start] muzzle={} parameters={}",
            e.muzzle.unwrap_or("-"),
            e.parameters,
        );
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        let done = if e.finished { " done" } else { "" };
        let _ = writeln!(
            self.writer,
            "[frame] frame={} bullets={}{done}",
            e.frame_index, e.bullets,
        );
    }

    fn on_bullet_fired(&mut self, e: &BulletFiredEvent) {
        if !self.bullets {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[bullet] frame={} at=({:.2}, {:.2}) angle={:.2}°",
            e.frame_index, e.position.x, e.position.y, e.angle,
        );
    }

    fn on_play_end(&mut self, e: &PlayEndEvent) {
        let _ = writeln!(
            self.writer,
            "[end] frames={} bullets={}",
            e.frames, e.bullets,
        );
    }

    fn on_play_abort(&mut self, e: &PlayAbortEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[abort] frame={} error={}",
            e.frame_index, e.error,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volley_core::error::GunError;
    use volley_core::kurbo::Point;

    #[test]
    fn pretty_print_frame() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_frame(&FrameEvent {
            frame_index: 3,
            bullets: 2,
            finished: true,
        });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert!(output.contains("[frame]"), "got: {output}");
        assert!(output.contains("frame=3 bullets=2 done"), "got: {output}");
    }

    #[test]
    fn bullets_can_be_muted() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new()).without_bullets();
        sink.on_bullet_fired(&BulletFiredEvent {
            frame_index: 0,
            position: Point::new(1.0, 2.0),
            angle: 45.0,
        });
        assert!(sink.into_writer().is_empty(), "muted sink wrote a bullet line");
    }

    #[test]
    fn abort_shows_the_error() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        let error = GunError::UnsetParameter("speed".into());
        sink.on_play_abort(&PlayAbortEvent {
            frame_index: 7,
            error: &error,
        });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert!(output.starts_with("[abort] frame=7"), "got: {output}");
        assert!(output.contains("speed"), "got: {output}");
    }
}
