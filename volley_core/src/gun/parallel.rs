// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;

use super::{Gun, GunRef, Play, Step};
use crate::error::GunError;
use crate::state::FiringState;

/// Runs children concurrently, each on its own fork of the incoming state.
///
/// Every live child is advanced once per frame, in list order. The gun
/// finishes when the longest child does.
#[derive(Clone, Debug)]
pub struct Parallel {
    guns: Rc<[GunRef]>,
}

impl Parallel {
    /// Creates a parallel group of `guns`.
    pub fn new(guns: impl IntoIterator<Item = GunRef>) -> Self {
        Self {
            guns: guns.into_iter().collect(),
        }
    }
}

impl Gun for Parallel {
    fn play(&self) -> Box<dyn Play> {
        Box::new(ParallelPlay {
            guns: Rc::clone(&self.guns),
            branches: None,
        })
    }
}

/// See [`Parallel`].
pub fn parallel(guns: impl IntoIterator<Item = GunRef>) -> GunRef {
    Rc::new(Parallel::new(guns))
}

struct ParallelPlay {
    guns: Rc<[GunRef]>,
    branches: Option<Branches>,
}

impl Play for ParallelPlay {
    fn step(&mut self, state: &mut FiringState) -> Result<Step, GunError> {
        let guns = &self.guns;
        self.branches
            .get_or_insert_with(|| {
                let mut branches = Branches::default();
                for gun in guns.iter() {
                    branches.push(gun.play(), state.fork());
                }
                branches
            })
            .step()
    }
}

/// A set of independently owned branches advanced in lockstep.
#[derive(Default)]
struct Branches {
    live: Vec<(Box<dyn Play>, FiringState)>,
}

impl Branches {
    fn push(&mut self, play: Box<dyn Play>, state: FiringState) {
        self.live.push((play, state));
    }

    /// Advances every live branch once, in insertion order, dropping those
    /// that finish.
    fn step(&mut self) -> Result<Step, GunError> {
        let mut index = 0;
        while let Some((play, state)) = self.live.get_mut(index) {
            match play.step(state)? {
                Step::Continue => index += 1,
                Step::Done => {
                    self.live.remove(index);
                }
            }
        }
        Ok(if self.live.is_empty() {
            Step::Done
        } else {
            Step::Continue
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gun::setter::add_parameter_now;
    use crate::gun::testing::run;
    use crate::gun::{concat, fire, wait};
    use crate::test_support::TestPlayer;
    use alloc::vec;

    #[test]
    fn lasts_as_long_as_longest_child() {
        assert_eq!(run(&Parallel::new([wait(2), wait(5), wait(1)])).0, 5);
        assert_eq!(run(&Parallel::new([])).0, 0);
    }

    #[test]
    fn children_interleave_frame_by_frame() {
        let player = TestPlayer::with_muzzle("main");
        let mut state = player.state();
        let tagged = |speed: f64, delay: u32| {
            concat([
                add_parameter_now("speed", speed),
                wait(delay),
                fire(()),
            ])
        };
        let mut play = parallel([tagged(10.0, 2), tagged(20.0, 1), tagged(30.0, 0)]).play();

        let mut by_frame = Vec::new();
        loop {
            let before = player.fired().len();
            let step = play.step(&mut state).unwrap();
            let speeds: Vec<_> = player.fired()[before..]
                .iter()
                .filter_map(|data| data.parameter("speed"))
                .collect();
            by_frame.push(speeds);
            if step.is_done() {
                break;
            }
        }
        assert_eq!(by_frame, [vec![31.0], vec![21.0], vec![11.0]]);
    }

    #[test]
    fn branches_do_not_see_each_other() {
        let (_, player) = run(&Parallel::new([
            concat([add_parameter_now("speed", 5.0), fire(())]),
            fire(()),
        ]));
        let speeds: Vec<_> = player
            .fired()
            .iter()
            .map(|data| data.parameter("speed"))
            .collect();
        assert_eq!(speeds, [Some(6.0), Some(1.0)]);
    }
}
