// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and JSON-lines output for volley playback traces.
//!
//! This crate provides [`TraceSink`](volley_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`json::JsonLinesSink`]: one JSON object per event, with
//!   [`json::parse`] to read a recording back.

pub mod json;
pub mod pretty;
