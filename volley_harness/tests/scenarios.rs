// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end playback of whole gun trees on a recording stage.

use volley_core::error::GunError;
use volley_core::gun::modifier::{add_parameter, rotate, translate};
use volley_core::gun::setter::{use_parameter, use_vector};
use volley_core::gun::{
    GunRef, InvertOptions, RepeatOptions, alternate, concat, fire, mirror, nop, parallel,
    parallel_repeat, repeat, sequential, wait,
};
use volley_core::kurbo::{Affine, Vec2};
use volley_core::lazy::{calc_direction, centerized_linear, get_location, iterate};
use volley_core::player::PlayerConfig;
use volley_core::sugar::{aimed, nway, spiral};
use volley_core::trace::Tracer;
use volley_harness::{DEFAULT_FRAME_LIMIT, MAIN, Outcome, RunError, Stage, run, run_main};

fn frames_of(gun: GunRef) -> u64 {
    run_main(gun, &Stage::with_main_muzzle()).unwrap().frames
}

fn angles(stage: &Stage) -> Vec<f64> {
    stage.shots().iter().map(|shot| shot.angle()).collect()
}

fn parameters(stage: &Stage, name: &str) -> Vec<f64> {
    stage
        .shots()
        .iter()
        .filter_map(|shot| shot.data.parameter(name))
        .collect()
}

fn assert_all_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "{actual:?} vs {expected:?}");
    }
}

#[test]
fn repeat_lasts_times_body_plus_interval() {
    let cases: [(u32, u32, u32); 4] = [(3, 1, 2), (4, 0, 5), (2, 3, 0), (0, 4, 4)];
    for (times, body, interval) in cases {
        let gun = repeat(
            RepeatOptions::new(times).interval(interval),
            [wait(body), fire(())],
        );
        assert_eq!(
            frames_of(gun),
            u64::from(times * (body + interval)),
            "times={times} body={body} interval={interval}"
        );
    }
}

#[test]
fn parallel_repeat_overlaps_bodies() {
    let cases: [(u32, u32, u32); 3] = [(4, 5, 3), (3, 0, 2), (1, 6, 0)];
    for (times, body, interval) in cases {
        let gun = parallel_repeat(
            RepeatOptions::new(times).interval(interval),
            [wait(body), fire(())],
        );
        assert_eq!(
            frames_of(gun),
            u64::from(times * interval + body),
            "times={times} body={body} interval={interval}"
        );
    }
    assert_eq!(
        frames_of(parallel_repeat(RepeatOptions::new(0).interval(3), [wait(5)])),
        0
    );
}

#[test]
fn parallel_repeat_staggers_shots() {
    let stage = Stage::with_main_muzzle();
    run_main(
        parallel_repeat(
            RepeatOptions::new(3).interval(2),
            [fire(()), wait(3), fire(())],
        ),
        &stage,
    )
    .unwrap();
    let frames: Vec<_> = stage.shots().iter().map(|shot| shot.frame).collect();
    assert_eq!(frames, [0, 2, 3, 4, 5, 7]);
}

#[test]
fn mirror_and_alternate_durations() {
    assert_eq!(frames_of(mirror(InvertOptions::new(), [wait(6)])), 6);
    assert_eq!(frames_of(alternate(InvertOptions::new(), [wait(6)])), 12);
}

#[test]
fn mirror_negates_rotation() {
    let stage = Stage::with_main_muzzle();
    run_main(
        mirror(InvertOptions::new(), [nway(3, 60.0, fire(()))]),
        &stage,
    )
    .unwrap();
    let mut angles = angles(&stage);
    angles.sort_by(f64::total_cmp);
    assert_all_close(&angles, &[-20.0, -20.0, 0.0, 0.0, 20.0, 20.0]);
}

#[test]
fn centerized_linear_spreads_around_zero() {
    let stage = Stage::with_main_muzzle();
    run_main(
        repeat(
            RepeatOptions::new(3),
            [rotate(centerized_linear(15.0)), fire(())],
        ),
        &stage,
    )
    .unwrap();
    assert_all_close(&angles(&stage), &[-5.0, 0.0, 5.0]);
}

#[test]
fn iterate_walks_the_list() {
    let stage = Stage::with_main_muzzle();
    run_main(
        repeat(
            RepeatOptions::new(3),
            [add_parameter("speed", iterate([10.0, 20.0, 30.0])), fire(())],
        ),
        &stage,
    )
    .unwrap();
    assert_eq!(parameters(&stage, "speed"), [11.0, 21.0, 31.0]);

    let result = run_main(
        repeat(
            RepeatOptions::new(4),
            [add_parameter("speed", iterate([10.0, 20.0, 30.0])), fire(())],
        ),
        &stage,
    );
    assert_eq!(
        result,
        Err(RunError::Gun(GunError::IterateOutOfRange { index: 3, len: 3 }))
    );
}

#[test]
fn nested_repeat_values() {
    const PARAMETERS: &[(&str, f64)] = &[("speed", 1.0), ("size", 1.0), ("p", 0.0)];
    let stage = Stage::with_main_muzzle();
    let gun = repeat(
        RepeatOptions::new(3),
        [
            add_parameter("p", centerized_linear(90.0)),
            repeat(
                RepeatOptions::new(2),
                [add_parameter("p", centerized_linear(4.0)), fire(())],
            ),
        ],
    );
    let outcome = run(
        gun,
        &stage,
        PlayerConfig::new()
            .with_muzzle(MAIN)
            .with_parameters(PARAMETERS),
        &mut Tracer::none(),
        DEFAULT_FRAME_LIMIT,
    )
    .unwrap();
    assert_eq!(outcome, Outcome { frames: 0, bullets: 6 });
    assert_eq!(parameters(&stage, "p"), [-31.0, -29.0, -1.0, 1.0, 29.0, 31.0]);
}

#[test]
fn parallel_branches_interleave_by_frame() {
    let stage = Stage::with_main_muzzle();
    run_main(
        parallel([
            repeat(RepeatOptions::new(3).interval(1), [rotate(10.0), fire(())]),
            concat([wait(1), rotate(-10.0), fire(())]),
        ]),
        &stage,
    )
    .unwrap();
    let by_frame: Vec<_> = stage
        .shots()
        .iter()
        .map(|shot| (shot.frame, shot.angle().round()))
        .collect();
    assert_eq!(by_frame, [(0, 10.0), (1, 10.0), (1, -10.0), (2, 10.0)]);
}

#[test]
fn sequential_isolates_its_setters() {
    let stage = Stage::with_main_muzzle();
    run_main(
        concat([
            sequential([use_parameter("speed", 5.0), fire(())]),
            fire(()),
        ]),
        &stage,
    )
    .unwrap();
    assert_eq!(parameters(&stage, "speed"), [5.0, 1.0]);
}

#[test]
fn spiral_from_a_moving_muzzle() {
    let stage = Stage::with_main_muzzle();
    stage
        .recording_muzzle(MAIN)
        .unwrap()
        .set_transform(Affine::translate((100.0, 50.0)));
    let outcome = run_main(spiral(6, 2, 15.0, fire(())), &stage).unwrap();
    assert_eq!(outcome, Outcome { frames: 12, bullets: 6 });
    assert_all_close(&angles(&stage), &[0.0, 15.0, 30.0, 45.0, 60.0, 75.0]);
    for shot in stage.shots() {
        let position = shot.data.position();
        assert_eq!((position.x, position.y), (100.0, 50.0));
    }
}

#[test]
fn aimed_fan_points_at_the_enemy() {
    let stage = Stage::with_main_muzzle();
    stage
        .recording_muzzle(MAIN)
        .unwrap()
        .set_enemy(Affine::translate((0.0, 40.0)));
    run_main(aimed(nway(3, 30.0, fire(()))), &stage).unwrap();
    assert_all_close(&angles(&stage), &[80.0, 90.0, 100.0]);
}

#[test]
fn mirrored_muzzles_fire_from_both_sides() {
    let stage = Stage::with_main_muzzle();
    stage.add_muzzle("left", Affine::translate((-30.0, 0.0)));
    run_main(
        mirror(
            InvertOptions::new().muzzle("left"),
            [translate((5.0, 0.0)), rotate(20.0), fire(())],
        ),
        &stage,
    )
    .unwrap();
    let shots = stage.shots();
    assert_eq!(&*shots[0].muzzle, MAIN);
    assert_eq!(&*shots[1].muzzle, "left");
    assert_all_close(&angles(&stage), &[20.0, -20.0]);
}

#[test]
fn directions_from_stage_locations() {
    let stage = Stage::with_main_muzzle();
    stage.set_location("boss", Vec2::new(0.0, 0.0));
    stage.set_location("player", Vec2::new(0.0, 10.0));
    run_main(
        concat([
            rotate(calc_direction(get_location("boss"), get_location("player"))),
            fire(()),
        ]),
        &stage,
    )
    .unwrap_or_else(|error| panic!("{error}"));
    assert_all_close(&angles(&stage), &[90.0]);

    let result = run_main(use_vector("aim", get_location("nobody")), &stage);
    assert_eq!(
        result,
        Err(RunError::Gun(GunError::UnknownLocation("nobody".into())))
    );
}

#[test]
fn unknown_muzzle_in_config_fails_to_start() {
    let stage = Stage::with_main_muzzle();
    let result = run(
        nop(),
        &stage,
        PlayerConfig::new().with_muzzle("ghost"),
        &mut Tracer::none(),
        DEFAULT_FRAME_LIMIT,
    );
    assert_eq!(
        result,
        Err(RunError::Gun(GunError::UnknownMuzzle("ghost".into())))
    );
}
