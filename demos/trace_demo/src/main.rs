// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plays a mirrored spiral on a recording stage and traces every frame.
//!
//! Events go to both a [`PrettyPrintSink`] on stdout and a
//! [`JsonLinesSink`] writing `trace.jsonl`. The left muzzle sways while the
//! pattern plays, so later bullets spawn from a different spot.

use std::fs::File;
use std::io::BufWriter;

use volley_core::gun::modifier::translate;
use volley_core::gun::{InvertOptions, concat, fire, mirror};
use volley_core::kurbo::Affine;
use volley_core::player::{GunPlayer, PlayStatus, PlayerConfig};
use volley_core::sugar::spiral;
use volley_core::trace::{
    BulletFiredEvent, FrameEvent, PlayAbortEvent, PlayEndEvent, PlayStartEvent, TraceSink, Tracer,
};
use volley_debug::json::JsonLinesSink;
use volley_debug::pretty::PrettyPrintSink;
use volley_harness::Stage;

const FRAME_LIMIT: u64 = 600;
/// Half-width of the sway, in world units.
const SWAY: f64 = 12.0;

/// Forwards every event to two sinks.
struct Tee<'a> {
    first: &'a mut dyn TraceSink,
    second: &'a mut dyn TraceSink,
}

impl TraceSink for Tee<'_> {
    fn on_play_start(&mut self, e: &PlayStartEvent) {
        self.first.on_play_start(e);
        self.second.on_play_start(e);
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        self.first.on_frame(e);
        self.second.on_frame(e);
    }

    fn on_bullet_fired(&mut self, e: &BulletFiredEvent) {
        self.first.on_bullet_fired(e);
        self.second.on_bullet_fired(e);
    }

    fn on_play_end(&mut self, e: &PlayEndEvent) {
        self.first.on_play_end(e);
        self.second.on_play_end(e);
    }

    fn on_play_abort(&mut self, e: &PlayAbortEvent<'_>) {
        self.first.on_play_abort(e);
        self.second.on_play_abort(e);
    }
}

fn main() {
    // -- stage -------------------------------------------------------------
    let stage = Stage::new();
    let left = stage.add_muzzle("left", Affine::translate((-40.0, 0.0)));
    stage.add_muzzle("right", Affine::translate((40.0, 0.0)));

    // -- pattern -----------------------------------------------------------
    let gun = mirror(
        InvertOptions::new().muzzle("right").mirror_x(),
        [spiral(12, 4, 15.0, concat([translate((0.0, 8.0)), fire("orb")]))],
    );
    let config = PlayerConfig::new().with_muzzle("left");
    let mut player = GunPlayer::with_config(gun, stage.clone(), config);

    // -- sinks -------------------------------------------------------------
    let path = "trace.jsonl";
    let file = File::create(path).expect("failed to create trace.jsonl");
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut json = JsonLinesSink::with_writer(BufWriter::new(file));
    let mut tee = Tee {
        first: &mut pretty,
        second: &mut json,
    };
    let mut tracer = Tracer::new(&mut tee);

    // -- loop --------------------------------------------------------------
    player.start(&mut tracer).expect("failed to start");
    loop {
        let phase = player.frames() as f64 / 20.0;
        left.set_transform(Affine::translate((-40.0 + SWAY * phase.sin(), 0.0)));
        stage.set_frame(player.frames());
        match player.tick(&mut tracer) {
            Ok(PlayStatus::Running) if player.frames() < FRAME_LIMIT => {}
            Ok(status) => {
                println!("Stopped with status {status:?}");
                break;
            }
            Err(error) => {
                eprintln!("Pattern failed: {error}");
                break;
            }
        }
    }
    drop(tracer);

    println!(
        "Wrote {path} ({} events, {} frames, {} shots)",
        json.written(),
        player.frames(),
        stage.shot_count(),
    );
}
