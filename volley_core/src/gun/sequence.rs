// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;

use super::{Gun, GunRef, Play, Step};
use crate::error::GunError;
use crate::state::FiringState;

/// Runs children in order on the same state.
///
/// Mutations made by one child are visible to the next.
#[derive(Clone, Debug)]
pub struct Concat {
    guns: Rc<[GunRef]>,
}

impl Concat {
    /// Creates a concatenation of `guns`.
    pub fn new(guns: impl IntoIterator<Item = GunRef>) -> Self {
        Self {
            guns: guns.into_iter().collect(),
        }
    }
}

impl Gun for Concat {
    fn play(&self) -> Box<dyn Play> {
        Box::new(Chain::new(Rc::clone(&self.guns), false))
    }
}

/// See [`Concat`].
pub fn concat(guns: impl IntoIterator<Item = GunRef>) -> GunRef {
    Rc::new(Concat::new(guns))
}

/// Runs children in order, each on its own fork of the incoming state.
///
/// Mutations made by one child do not leak to the next.
#[derive(Clone, Debug)]
pub struct Sequential {
    guns: Rc<[GunRef]>,
}

impl Sequential {
    /// Creates a sequence of `guns`.
    pub fn new(guns: impl IntoIterator<Item = GunRef>) -> Self {
        Self {
            guns: guns.into_iter().collect(),
        }
    }
}

impl Gun for Sequential {
    fn play(&self) -> Box<dyn Play> {
        Box::new(Chain::new(Rc::clone(&self.guns), true))
    }
}

/// See [`Sequential`].
pub fn sequential(guns: impl IntoIterator<Item = GunRef>) -> GunRef {
    Rc::new(Sequential::new(guns))
}

/// Wraps `guns` in a [`Concat`], unless there is exactly one.
pub(crate) fn body(guns: impl IntoIterator<Item = GunRef>) -> GunRef {
    let mut guns: Vec<GunRef> = guns.into_iter().collect();
    if guns.len() == 1
        && let Some(gun) = guns.pop()
    {
        return gun;
    }
    Rc::new(Concat { guns: guns.into() })
}

struct Chain {
    guns: Rc<[GunRef]>,
    fork: bool,
    index: usize,
    current: Option<(Box<dyn Play>, Option<FiringState>)>,
}

impl Chain {
    fn new(guns: Rc<[GunRef]>, fork: bool) -> Self {
        Self {
            guns,
            fork,
            index: 0,
            current: None,
        }
    }
}

impl Play for Chain {
    fn step(&mut self, state: &mut FiringState) -> Result<Step, GunError> {
        loop {
            let (play, branch) = match &mut self.current {
                Some(current) => current,
                None => {
                    let Some(gun) = self.guns.get(self.index) else {
                        return Ok(Step::Done);
                    };
                    let branch = self.fork.then(|| state.fork());
                    self.current.insert((gun.play(), branch))
                }
            };
            let step = match branch {
                Some(branch) => play.step(branch)?,
                None => play.step(state)?,
            };
            match step {
                Step::Continue => return Ok(Step::Continue),
                Step::Done => {
                    self.current = None;
                    self.index += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gun::modifier::add_parameter;
    use crate::gun::setter::add_parameter_now;
    use crate::gun::testing::run;
    use crate::gun::{fire, nop, wait};
    use crate::test_support::TestPlayer;

    #[test]
    fn durations_add_up() {
        assert_eq!(run(&Concat::new([wait(2), wait(3)])).0, 5);
        assert_eq!(run(&Sequential::new([wait(2), fire(()), wait(3)])).0, 5);
        assert_eq!(run(&Concat::new([])).0, 0);
    }

    #[test]
    fn concat_shares_state() {
        let (_, player) = run(&Concat::new([
            add_parameter_now("speed", 1.0),
            fire(()),
            add_parameter_now("speed", 1.0),
            fire(()),
        ]));
        let speeds: Vec<_> = player
            .fired()
            .iter()
            .map(|data| data.parameter("speed"))
            .collect();
        assert_eq!(speeds, [Some(2.0), Some(3.0)]);
    }

    #[test]
    fn sequential_isolates_children() {
        let (_, player) = run(&Sequential::new([
            concat([add_parameter_now("speed", 1.0), fire(())]),
            concat([add_parameter("speed", 5.0), fire(())]),
            fire(()),
        ]));
        let speeds: Vec<_> = player
            .fired()
            .iter()
            .map(|data| data.parameter("speed"))
            .collect();
        assert_eq!(speeds, [Some(2.0), Some(6.0), Some(1.0)]);
    }

    #[test]
    fn zero_duration_children_chain_in_one_step() {
        let player = TestPlayer::with_muzzle("main");
        let mut state = player.state();
        let mut play = concat([fire(()), nop(), fire(()), wait(1), fire(())]).play();
        assert_eq!(play.step(&mut state), Ok(Step::Continue));
        assert_eq!(player.fired().len(), 2);
        assert_eq!(play.step(&mut state), Ok(Step::Done));
        assert_eq!(player.fired().len(), 3);
    }

    #[test]
    fn single_body_is_not_wrapped() {
        let only = wait(1);
        assert!(Rc::ptr_eq(&body([only.clone()]), &only));
    }
}
