// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shorthand for common patterns.
//!
//! Every function here only assembles the combinators from [`gun`]; none of
//! them carries state of its own.
//!
//! [`gun`]: crate::gun

use crate::gun::modifier::{add_parameter, rotate};
use crate::gun::setter::use_virtual_muzzle;
use crate::gun::{GunRef, RepeatOptions, concat, repeat, sequential};
use crate::lazy::{Lazy, centerized_linear, linear};
use crate::muzzle::FixedAimMuzzleGenerator;

/// Plays `gun` `ways` times in the same frame, fanned evenly across
/// `total_angle` degrees and centered on the current direction.
pub fn nway(ways: u32, total_angle: impl Into<Lazy<f64>>, gun: GunRef) -> GunRef {
    repeat(
        RepeatOptions::new(ways),
        [rotate(centerized_linear(total_angle)), gun],
    )
}

/// Plays `gun` `times` times in the same frame, each one `speed_step`
/// faster than the last.
pub fn whip(times: u32, speed_step: f64, gun: GunRef) -> GunRef {
    repeat(
        RepeatOptions::new(times),
        [
            add_parameter("speed", linear(0.0, speed_step * f64::from(times))),
            gun,
        ],
    )
}

/// Plays `gun` `times` times, `interval` frames apart, turning by
/// `angle_step` degrees each time.
pub fn spiral(
    times: u32,
    interval: impl Into<Lazy<f64>>,
    angle_step: f64,
    gun: GunRef,
) -> GunRef {
    repeat(
        RepeatOptions::new(times).interval(interval),
        [rotate(linear(0.0, angle_step * f64::from(times))), gun],
    )
}

/// Plays `gun` from a muzzle that aims once at the enemy when `gun` starts.
///
/// The aimed muzzle only applies inside `gun`.
pub fn aimed(gun: GunRef) -> GunRef {
    sequential([concat([use_virtual_muzzle(FixedAimMuzzleGenerator), gun])])
}
