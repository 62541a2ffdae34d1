// Copyright 2026 the Volley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Repeat-position bookkeeping.
//!
//! Every active repetition is described by a [`RepeatState`] ("iteration
//! `finished` of `total`"). The [`RepeatStateManager`] keeps two views of the
//! active repetitions:
//!
//! - a plain stack, innermost last, whose bottom entry is a permanent root
//!   `{0, 1}` so that lazy values always have a position to read;
//! - a per-name stack, so a value can address an outer repetition by name
//!   even while nested inside others (including same-named ones).
//!
//! Starting and finishing are matched by *identity*. Each started repetition
//! is a [`RepeatHandle`]; two structurally equal states started separately
//! are different handles, and finishing with the wrong one is reported as
//! [`GunError::RepeatMismatch`].

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::error::GunError;

/// Progress through one repetition: iteration `finished` of `total`.
///
/// `total` is the repeat count as resolved, so a fractional count such as
/// 2.5 runs three iterations while rates still divide by 2.5.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RepeatState {
    /// Number of iterations completed before this one (0-based index).
    pub finished: u32,
    /// Total number of iterations, as resolved.
    pub total: f64,
}

impl RepeatState {
    /// The implicit outermost position `{0, 1}`.
    pub const ROOT: Self = Self::new(0, 1.0);

    /// Creates a repeat state.
    #[inline]
    #[must_use]
    pub const fn new(finished: u32, total: f64) -> Self {
        Self { finished, total }
    }

    /// Returns `finished / total`, or 0 for an empty repetition.
    #[inline]
    #[must_use]
    pub fn rate(&self) -> f64 {
        if self.total > 0.0 {
            f64::from(self.finished) / self.total
        } else {
            0.0
        }
    }
}

/// Identity handle for a started repetition.
///
/// Clones of a handle refer to the same repetition; compare them with
/// [`Rc::ptr_eq`].
pub type RepeatHandle = Rc<RepeatState>;

/// Tracks the repetitions active on one firing-state branch.
///
/// Cloning (see [`fork`](Self::fork)) copies both stacks but shares the
/// handles inside them: a forked manager reports the same repetitions until
/// one side starts or finishes its own.
#[derive(Clone, Debug)]
pub struct RepeatStateManager {
    stack: Vec<RepeatHandle>,
    named: HashMap<String, Vec<RepeatHandle>>,
}

impl Default for RepeatStateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RepeatStateManager {
    /// Creates a manager holding only the root repetition.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: vec![Rc::new(RepeatState::ROOT)],
            named: HashMap::new(),
        }
    }

    /// Returns the innermost repetition, or the innermost one named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`GunError::UnknownRepeatName`] if no repetition named `name`
    /// is active.
    pub fn get(&self, name: Option<&str>) -> Result<&RepeatHandle, GunError> {
        match name {
            None => Ok(self.top()),
            Some(name) => self
                .named
                .get(name)
                .and_then(|stack| stack.last())
                .ok_or_else(|| GunError::UnknownRepeatName(name.into())),
        }
    }

    /// Pushes a repetition (also under `name`, if given) and returns the
    /// same handle so the caller can finish it later.
    pub fn start(&mut self, state: RepeatHandle, name: Option<&str>) -> RepeatHandle {
        self.stack.push(Rc::clone(&state));
        if let Some(name) = name {
            self.named
                .entry(String::from(name))
                .or_default()
                .push(Rc::clone(&state));
        }
        state
    }

    /// Pops a repetition previously returned by [`start`](Self::start).
    ///
    /// # Errors
    ///
    /// - [`GunError::RepeatUnderflow`] if only the root repetition remains.
    /// - [`GunError::RepeatMismatch`] if `state` is not the innermost
    ///   repetition of the plain stack or of the `name` stack.
    pub fn finish(&mut self, state: &RepeatHandle, name: Option<&str>) -> Result<(), GunError> {
        if self.stack.len() <= 1 {
            return Err(GunError::RepeatUnderflow);
        }
        if !Rc::ptr_eq(self.top(), state) {
            return Err(GunError::RepeatMismatch);
        }
        if let Some(name) = name {
            let named_top = self.named.get(name).and_then(|stack| stack.last());
            if !named_top.is_some_and(|top| Rc::ptr_eq(top, state)) {
                return Err(GunError::RepeatMismatch);
            }
            if let Some(stack) = self.named.get_mut(name) {
                stack.pop();
                if stack.is_empty() {
                    self.named.remove(name);
                }
            }
        }
        self.stack.pop();
        Ok(())
    }

    /// Returns an independently mutable copy sharing the current handles.
    #[must_use]
    pub fn fork(&self) -> Self {
        self.clone()
    }

    /// Number of active repetitions, not counting the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    fn top(&self) -> &RepeatHandle {
        // The root entry is never popped.
        &self.stack[self.stack.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_manager_reports_root() {
        let manager = RepeatStateManager::new();
        assert_eq!(**manager.get(None).unwrap(), RepeatState::ROOT);
        assert_eq!(manager.depth(), 0);
    }

    #[test]
    fn unknown_name_fails() {
        let manager = RepeatStateManager::new();
        assert_eq!(
            manager.get(Some("outer")).unwrap_err(),
            GunError::UnknownRepeatName("outer".into())
        );
    }

    #[test]
    fn named_lookup_sees_through_nesting() {
        let mut manager = RepeatStateManager::new();
        let outer = manager.start(Rc::new(RepeatState::new(1, 3.0)), Some("outer"));
        let inner = manager.start(Rc::new(RepeatState::new(0, 2.0)), None);

        assert!(Rc::ptr_eq(manager.get(None).unwrap(), &inner));
        assert!(Rc::ptr_eq(manager.get(Some("outer")).unwrap(), &outer));

        manager.finish(&inner, None).unwrap();
        manager.finish(&outer, Some("outer")).unwrap();
        assert!(manager.get(Some("outer")).is_err());
        assert_eq!(manager.depth(), 0);
    }

    #[test]
    fn same_named_repetitions_nest() {
        let mut manager = RepeatStateManager::new();
        let a = manager.start(Rc::new(RepeatState::new(0, 2.0)), Some("r"));
        let b = manager.start(Rc::new(RepeatState::new(0, 5.0)), Some("r"));
        assert!(Rc::ptr_eq(manager.get(Some("r")).unwrap(), &b));
        manager.finish(&b, Some("r")).unwrap();
        assert!(Rc::ptr_eq(manager.get(Some("r")).unwrap(), &a));
    }

    #[test]
    fn finish_on_root_underflows() {
        let mut manager = RepeatStateManager::new();
        let stray = Rc::new(RepeatState::new(0, 1.0));
        assert_eq!(
            manager.finish(&stray, None).unwrap_err(),
            GunError::RepeatUnderflow
        );
    }

    #[test]
    fn out_of_order_finish_is_a_mismatch() {
        let mut manager = RepeatStateManager::new();
        let outer = manager.start(Rc::new(RepeatState::new(0, 2.0)), None);
        let _inner = manager.start(Rc::new(RepeatState::new(0, 2.0)), None);
        assert_eq!(
            manager.finish(&outer, None).unwrap_err(),
            GunError::RepeatMismatch
        );
        assert_eq!(manager.depth(), 2, "a failed finish must not pop");
    }

    #[test]
    fn structurally_equal_states_are_distinct() {
        let mut manager = RepeatStateManager::new();
        let started = manager.start(Rc::new(RepeatState::new(0, 2.0)), None);
        let lookalike = Rc::new(RepeatState::new(0, 2.0));
        assert_eq!(*started, *lookalike);
        assert_eq!(
            manager.finish(&lookalike, None).unwrap_err(),
            GunError::RepeatMismatch
        );
    }

    #[test]
    fn named_finish_checks_named_stack() {
        let mut manager = RepeatStateManager::new();
        let state = manager.start(Rc::new(RepeatState::new(0, 2.0)), None);
        assert_eq!(
            manager.finish(&state, Some("never")).unwrap_err(),
            GunError::RepeatMismatch
        );
    }

    #[test]
    fn fork_shares_handles_but_not_stacks() {
        let mut original = RepeatStateManager::new();
        let state = original.start(Rc::new(RepeatState::new(2, 4.0)), Some("n"));

        let mut forked = original.fork();
        assert!(Rc::ptr_eq(forked.get(None).unwrap(), original.get(None).unwrap()));
        assert!(Rc::ptr_eq(
            forked.get(Some("n")).unwrap(),
            original.get(Some("n")).unwrap()
        ));

        forked.finish(&state, Some("n")).unwrap();
        assert_eq!(forked.depth(), 0);
        assert_eq!(original.depth(), 1);
        assert!(Rc::ptr_eq(original.get(Some("n")).unwrap(), &state));
    }

    #[test]
    fn rate_of_empty_repetition_is_zero() {
        assert_eq!(RepeatState::new(0, 0.0).rate(), 0.0);
        assert_eq!(RepeatState::new(1, 4.0).rate(), 0.25);
    }
}
