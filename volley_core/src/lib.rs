// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-stepped gun trees for bullet patterns.
//!
//! `volley_core` describes firing patterns as trees of small combinators
//! ("guns") and plays them back one frame at a time. It is `no_std`
//! compatible (with `alloc`) and leaves rendering, bullet simulation and
//! timing to the host.
//!
//! # Architecture
//!
//! A host implements [`Player`](player::Player) and [`Muzzle`](muzzle::Muzzle),
//! builds a gun tree, and steps it once per frame:
//!
//! ```text
//!   Gun tree (immutable, shareable)
//!       │ play()
//!       ▼
//!   Play ──► step(&mut FiringState) ──► Step::Continue / Step::Done
//!                   │
//!                   │ Fire: FiringState::fire_data()
//!                   ▼
//!   FireData ──► Muzzle::fire() ──► Player::notify_fired()
//! ```
//!
//! **[`gun`]** — The [`Gun`](gun::Gun) / [`Play`](gun::Play) contract and
//! every combinator: fire, wait, concat, sequential, parallel, repeat,
//! parallel repeat, mirror, alternate, plus the deferred
//! [`modifier`](gun::modifier) and immediate [`setter`](gun::setter) guns.
//!
//! **[`state`]** — [`FiringState`](state::FiringState), the per-branch
//! context of parameters, texts, vectors, muzzle, pending modifiers and
//! repeat stack. Branching combinators fork it.
//!
//! **[`lazy`]** — Values resolved against the firing state when a gun plays,
//! such as [`linear`](lazy::linear) progressions over the enclosing repeat.
//!
//! **[`repeat`]** — The stack of named repetition counters behind
//! `RepeatState` lookups.
//!
//! **[`muzzle`]** — Host muzzles and the aiming virtual muzzles layered on
//! top of them.
//!
//! **[`player`]** — The host [`Player`](player::Player) trait and the
//! reference [`GunPlayer`](player::GunPlayer) driver.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and playback events,
//! with a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! **[`sugar`]** — Shorthand for common shapes (n-way, whip, spiral, aimed).
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub use kurbo;

pub mod error;
pub mod fire_data;
pub mod gun;
pub mod lazy;
pub mod muzzle;
pub mod parameter;
pub mod player;
pub mod repeat;
pub mod state;
pub mod sugar;
pub mod trace;
pub mod transform;

#[cfg(test)]
mod test_support;
