//! [`ProgressTracker`] – step-by-step cooking progress.
//!
//! Two independent pieces of state live here:
//!
//! * the **completed set** – which steps are checked.  It drives the
//!   percentage (`completed / total * 100`) and the "current step" label
//!   (`Step {min(completed + 1, total)}`).
//! * the **active pointer** – the step currently highlighted.  It starts on
//!   the first step and only moves through [`advance`][ProgressTracker::advance],
//!   [`retreat`][ProgressTracker::retreat] and [`focus`][ProgressTracker::focus];
//!   unchecking a step never moves it.
//!
//! Checking the last step while every other step is already checked raises
//! the "recipe completed" signal exactly once per tracker.
//!
//! # Example
//!
//! ```rust
//! use sabor_runtime::progress::ProgressTracker;
//! use sabor_types::Step;
//!
//! let steps = (1..=5).map(|n| Step::new(n, format!("step {n}"))).collect();
//! let mut tracker = ProgressTracker::new(steps);
//!
//! for i in 0..4 {
//!     tracker.toggle_step(i, true).unwrap();
//! }
//! assert_eq!(tracker.percentage(), 80.0);
//! assert_eq!(tracker.current_step_label(), "Step 5");
//!
//! let outcome = tracker.toggle_step(4, true).unwrap();
//! assert_eq!(outcome.percentage, 100.0);
//! assert!(outcome.recipe_completed);
//! ```

use sabor_types::{Recipe, SaborError, Step};
use thiserror::Error;
use tracing::debug;

/// Errors raised by progress tracking.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgressError {
    #[error("No item number {} (have {total})", .index + 1)]
    OutOfRange { index: usize, total: usize },
}

impl From<ProgressError> for SaborError {
    fn from(err: ProgressError) -> Self {
        SaborError::Session(err.to_string())
    }
}

/// What a single [`ProgressTracker::toggle_step`] call produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleOutcome {
    pub completed: usize,
    pub percentage: f64,
    pub current_step_label: String,
    /// `true` only on the call that completed the recipe.
    pub recipe_completed: bool,
}

/// Completion state of a recipe's ordered, fixed-size step list.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    steps: Vec<Step>,
    completed: Vec<bool>,
    active: usize,
    completion_signalled: bool,
}

impl ProgressTracker {
    pub fn new(steps: Vec<Step>) -> Self {
        let completed = vec![false; steps.len()];
        Self {
            steps,
            completed,
            active: 0,
            completion_signalled: false,
        }
    }

    /// Fresh tracker over a recipe's steps.  Progress is never carried over.
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self::new(recipe.steps.clone())
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn total(&self) -> usize {
        self.steps.len()
    }

    pub fn completed_count(&self) -> usize {
        self.completed.iter().filter(|c| **c).count()
    }

    pub fn is_completed(&self, index: usize) -> bool {
        self.completed.get(index).copied().unwrap_or(false)
    }

    /// `completed / total * 100`, or `0.0` for an empty recipe.
    pub fn percentage(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.completed_count() as f64 * 100.0 / total as f64
    }

    /// `"Step {min(completed + 1, total)}"`; `"Step 0"` for an empty recipe.
    pub fn current_step_label(&self) -> String {
        let current = (self.completed_count() + 1).min(self.total());
        format!("Step {current}")
    }

    /// Position of the active step, e.g. `"Step 2 of 5"`.
    pub fn step_indicator(&self) -> String {
        if self.total() == 0 {
            return "Step 0 of 0".to_string();
        }
        format!("Step {} of {}", self.active + 1, self.total())
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn active_step(&self) -> Option<&Step> {
        self.steps.get(self.active)
    }

    /// Backward navigation is enabled.
    pub fn can_retreat(&self) -> bool {
        self.active > 0
    }

    /// Forward navigation is enabled.
    pub fn can_advance(&self) -> bool {
        self.active + 1 < self.total()
    }

    fn check_index(&self, index: usize) -> Result<(), ProgressError> {
        if index >= self.total() {
            return Err(ProgressError::OutOfRange {
                index,
                total: self.total(),
            });
        }
        Ok(())
    }

    /// Mark step `index` completed or not.
    ///
    /// Setting a step to the state it already has changes nothing.
    pub fn toggle_step(&mut self, index: usize, checked: bool) -> Result<ToggleOutcome, ProgressError> {
        self.check_index(index)?;
        self.completed[index] = checked;

        let completed = self.completed_count();
        let is_last = index + 1 == self.total();
        let recipe_completed =
            checked && is_last && completed == self.total() && !self.completion_signalled;
        if recipe_completed {
            self.completion_signalled = true;
        }

        debug!(index, checked, completed, total = self.total(), "step toggled");
        Ok(ToggleOutcome {
            completed,
            percentage: self.percentage(),
            current_step_label: self.current_step_label(),
            recipe_completed,
        })
    }

    /// Move the active pointer forward.  Returns `false` at the last step.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        self.active += 1;
        true
    }

    /// Move the active pointer backward.  Returns `false` at the first step.
    pub fn retreat(&mut self) -> bool {
        if !self.can_retreat() {
            return false;
        }
        self.active -= 1;
        true
    }

    /// Put the active pointer on `index`.
    pub fn focus(&mut self, index: usize) -> Result<(), ProgressError> {
        self.check_index(index)?;
        self.active = index;
        Ok(())
    }

    /// Allow the completion signal to fire again.  For callers that
    /// withdrew a signal before anyone saw it.
    pub fn rearm_completion(&mut self) {
        self.completion_signalled = false;
    }

    /// Uncheck everything, return to the first step and re-arm the
    /// completion signal.
    pub fn reset(&mut self) {
        self.completed.iter_mut().for_each(|c| *c = false);
        self.active = 0;
        self.completion_signalled = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(n: u32) -> ProgressTracker {
        ProgressTracker::new((1..=n).map(|i| Step::new(i, format!("step {i}"))).collect())
    }

    #[test]
    fn percentage_is_k_over_n() {
        for n in 1..=7u32 {
            let mut t = tracker(n);
            for k in 0..n as usize {
                t.toggle_step(k, true).unwrap();
                let expected = 100.0 * (k + 1) as f64 / n as f64;
                assert!((t.percentage() - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn empty_recipe_reports_zero() {
        let t = tracker(0);
        assert_eq!(t.percentage(), 0.0);
        assert_eq!(t.current_step_label(), "Step 0");
        assert_eq!(t.step_indicator(), "Step 0 of 0");
        assert!(!t.can_advance());
        assert!(!t.can_retreat());
        assert!(t.active_step().is_none());
    }

    #[test]
    fn five_step_scenario() {
        let mut t = tracker(5);
        for i in 0..4 {
            let out = t.toggle_step(i, true).unwrap();
            assert!(!out.recipe_completed);
        }
        assert_eq!(t.percentage(), 80.0);
        assert_eq!(t.current_step_label(), "Step 5");

        let out = t.toggle_step(4, true).unwrap();
        assert_eq!(out.percentage, 100.0);
        assert_eq!(out.current_step_label, "Step 5");
        assert!(out.recipe_completed);
    }

    #[test]
    fn completion_signal_is_one_shot() {
        let mut t = tracker(3);
        t.toggle_step(0, true).unwrap();
        t.toggle_step(1, true).unwrap();
        assert!(t.toggle_step(2, true).unwrap().recipe_completed);

        assert!(!t.toggle_step(1, false).unwrap().recipe_completed);
        assert!(!t.toggle_step(1, true).unwrap().recipe_completed);
        assert!(!t.toggle_step(2, false).unwrap().recipe_completed);
        assert!(!t.toggle_step(2, true).unwrap().recipe_completed);
    }

    #[test]
    fn completion_requires_last_step_to_be_the_final_check() {
        let mut t = tracker(3);
        t.toggle_step(2, true).unwrap();
        t.toggle_step(0, true).unwrap();
        let out = t.toggle_step(1, true).unwrap();
        assert_eq!(out.percentage, 100.0);
        assert!(!out.recipe_completed);
    }

    #[test]
    fn checking_last_step_early_does_not_complete() {
        let mut t = tracker(3);
        assert!(!t.toggle_step(2, true).unwrap().recipe_completed);
    }

    #[test]
    fn rechecking_does_not_double_count() {
        let mut t = tracker(4);
        t.toggle_step(1, true).unwrap();
        t.toggle_step(1, true).unwrap();
        assert_eq!(t.completed_count(), 1);
        t.toggle_step(3, false).unwrap();
        assert_eq!(t.completed_count(), 1);
    }

    #[test]
    fn unchecking_decrements_and_keeps_active_pointer() {
        let mut t = tracker(4);
        t.toggle_step(0, true).unwrap();
        t.toggle_step(1, true).unwrap();
        t.focus(2).unwrap();
        let out = t.toggle_step(1, false).unwrap();
        assert_eq!(out.completed, 1);
        assert_eq!(out.current_step_label, "Step 2");
        assert_eq!(t.active(), 2);
    }

    #[test]
    fn navigation_is_clamped() {
        let mut t = tracker(3);
        assert!(!t.can_retreat());
        assert!(!t.retreat());
        assert_eq!(t.step_indicator(), "Step 1 of 3");

        assert!(t.advance());
        assert!(t.advance());
        assert!(!t.can_advance());
        assert!(!t.advance());
        assert_eq!(t.active(), 2);
        assert_eq!(t.step_indicator(), "Step 3 of 3");
        assert!(t.can_retreat());

        assert!(t.retreat());
        assert_eq!(t.active_step().unwrap().position, 2);
    }

    #[test]
    fn single_step_recipe_has_no_navigation() {
        let mut t = tracker(1);
        assert!(!t.can_advance());
        assert!(!t.can_retreat());
        assert!(t.toggle_step(0, true).unwrap().recipe_completed);
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let mut t = tracker(2);
        assert_eq!(
            t.toggle_step(2, true).unwrap_err(),
            ProgressError::OutOfRange { index: 2, total: 2 }
        );
        assert!(t.focus(5).is_err());
        assert_eq!(t.completed_count(), 0);
    }

    #[test]
    fn converts_into_session_error() {
        let err: SaborError = ProgressError::OutOfRange { index: 7, total: 3 }.into();
        assert_eq!(err, SaborError::Session("No item number 8 (have 3)".into()));
    }

    #[test]
    fn rearm_completion_allows_one_more_signal() {
        let mut t = tracker(2);
        t.toggle_step(0, true).unwrap();
        assert!(t.toggle_step(1, true).unwrap().recipe_completed);
        assert!(!t.toggle_step(1, true).unwrap().recipe_completed);

        t.rearm_completion();
        assert!(t.toggle_step(1, true).unwrap().recipe_completed);
        assert!(!t.toggle_step(1, true).unwrap().recipe_completed);
    }

    #[test]
    fn reset_rearms_completion() {
        let mut t = tracker(2);
        t.toggle_step(0, true).unwrap();
        assert!(t.toggle_step(1, true).unwrap().recipe_completed);
        t.advance();

        t.reset();
        assert_eq!(t.completed_count(), 0);
        assert_eq!(t.active(), 0);
        t.toggle_step(0, true).unwrap();
        assert!(t.toggle_step(1, true).unwrap().recipe_completed);
    }
}
