//! [`CookingSession`] – one recipe being cooked.
//!
//! The session owns a [`ProgressTracker`], an [`IngredientChecklist`] and the
//! [`TimerSet`] for its paced transitions:
//!
//! | Trigger | Timer | Fires after | Event |
//! |---|---|---|---|
//! | non-last step checked | [`ADVANCE_TIMER`] | `advance_delay` | [`SessionEvent::ActiveStepChanged`] |
//! | recipe completed | [`COMPLETION_TIMER`] | `completion_delay` | [`SessionEvent::RecipeCompleted`] |
//!
//! Everything else is reported immediately.  Manual navigation, or
//! unchecking the step that scheduled it, cancels a pending auto-advance.
//! Unchecking any step withdraws a completion dialog that has not shown yet.
//! [`leave`][CookingSession::leave],
//! [`reset`][CookingSession::reset] and drop cancel every pending timer.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use sabor_types::Recipe;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::checklist::IngredientChecklist;
use crate::progress::{ProgressError, ProgressTracker, ToggleOutcome};
use crate::timer::TimerSet;

pub const ADVANCE_TIMER: &str = "advance";
pub const COMPLETION_TIMER: &str = "completion-dialog";

/// Pacing delays for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTiming {
    pub advance_delay: Duration,
    pub completion_delay: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            advance_delay: Duration::from_millis(500),
            completion_delay: Duration::from_millis(500),
        }
    }
}

/// Something the front-end should render.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Progress {
        percentage: f64,
        label: String,
    },
    ActiveStepChanged {
        index: usize,
        indicator: String,
        can_retreat: bool,
        can_advance: bool,
    },
    RecipeCompleted {
        title: String,
    },
    IngredientsPrepared,
}

fn lock(tracker: &Mutex<ProgressTracker>) -> MutexGuard<'_, ProgressTracker> {
    tracker.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn active_step_event(tracker: &ProgressTracker) -> SessionEvent {
    SessionEvent::ActiveStepChanged {
        index: tracker.active(),
        indicator: tracker.step_indicator(),
        can_retreat: tracker.can_retreat(),
        can_advance: tracker.can_advance(),
    }
}

pub struct CookingSession {
    id: Uuid,
    recipe_id: String,
    title: String,
    tracker: Arc<Mutex<ProgressTracker>>,
    ingredients: IngredientChecklist,
    timers: TimerSet,
    /// Step whose check scheduled the current auto-advance.
    advance_from: Option<usize>,
    timing: SessionTiming,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl CookingSession {
    /// Start cooking `recipe` from scratch.  Must be called inside a Tokio
    /// runtime.
    pub fn start(
        recipe: &Recipe,
        timing: SessionTiming,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let session = Self {
            id: Uuid::new_v4(),
            recipe_id: recipe.id.clone(),
            title: recipe.title.clone(),
            tracker: Arc::new(Mutex::new(ProgressTracker::from_recipe(recipe))),
            ingredients: IngredientChecklist::new(recipe.ingredients.clone()),
            timers: TimerSet::new(),
            advance_from: None,
            timing,
            events,
        };
        info!(session = %session.id, recipe = %session.recipe_id, "cooking session started");
        (session, rx)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Read-only view of the tracker.
    pub fn with_tracker<T>(&self, f: impl FnOnce(&ProgressTracker) -> T) -> T {
        f(&lock(&self.tracker))
    }

    pub fn ingredients(&self) -> &IngredientChecklist {
        &self.ingredients
    }

    pub fn is_pending(&self, timer: &str) -> bool {
        self.timers.is_pending(timer)
    }

    fn emit(&self, event: SessionEvent) {
        // A dropped receiver only means nobody is rendering any more.
        let _ = self.events.send(event);
    }

    pub fn toggle_step(&mut self, index: usize, checked: bool) -> Result<ToggleOutcome, ProgressError> {
        let (outcome, is_last) = {
            let mut tracker = lock(&self.tracker);
            let outcome = tracker.toggle_step(index, checked)?;
            (outcome, index + 1 == tracker.total())
        };
        self.emit(SessionEvent::Progress {
            percentage: outcome.percentage,
            label: outcome.current_step_label.clone(),
        });

        if !checked {
            self.withdraw_pending(index);
        }

        if checked && !is_last {
            self.advance_from = Some(index);
            let tracker = Arc::clone(&self.tracker);
            let events = self.events.clone();
            self.timers.schedule(ADVANCE_TIMER, self.timing.advance_delay, move || {
                let mut tracker = lock(&tracker);
                if tracker.focus(index + 1).is_ok() {
                    let _ = events.send(active_step_event(&tracker));
                }
            });
        }

        if outcome.recipe_completed {
            info!(session = %self.id, recipe = %self.recipe_id, "recipe completed");
            let events = self.events.clone();
            let title = self.title.clone();
            self.timers.schedule(COMPLETION_TIMER, self.timing.completion_delay, move || {
                let _ = events.send(SessionEvent::RecipeCompleted { title });
            });
        }

        Ok(outcome)
    }

    fn withdraw_pending(&mut self, unchecked: usize) {
        if self.advance_from == Some(unchecked) && self.timers.cancel(ADVANCE_TIMER) {
            self.advance_from = None;
            debug!(session = %self.id, step = unchecked, "auto-advance withdrawn");
        }
        if self.timers.cancel(COMPLETION_TIMER) {
            lock(&self.tracker).rearm_completion();
            debug!(session = %self.id, step = unchecked, "completion dialog withdrawn");
        }
    }

    /// Move the active step forward.  Cancels a pending auto-advance.
    pub fn advance(&mut self) -> bool {
        self.timers.cancel(ADVANCE_TIMER);
        self.navigate(ProgressTracker::advance)
    }

    /// Move the active step backward.  Cancels a pending auto-advance.
    pub fn retreat(&mut self) -> bool {
        self.timers.cancel(ADVANCE_TIMER);
        self.navigate(ProgressTracker::retreat)
    }

    fn navigate(&mut self, step: fn(&mut ProgressTracker) -> bool) -> bool {
        let event = {
            let mut tracker = lock(&self.tracker);
            step(&mut tracker).then(|| active_step_event(&tracker))
        };
        match event {
            Some(event) => {
                self.emit(event);
                true
            }
            None => false,
        }
    }

    pub fn toggle_ingredient(&mut self, index: usize, checked: bool) -> Result<bool, ProgressError> {
        let prepared = self.ingredients.toggle(index, checked)?;
        if prepared {
            debug!(session = %self.id, "all ingredients prepared");
            self.emit(SessionEvent::IngredientsPrepared);
        }
        Ok(prepared)
    }

    /// Start over: cancel pending transitions and clear all progress.
    pub fn reset(&mut self) {
        self.timers.cancel_all();
        lock(&self.tracker).reset();
        self.ingredients.reset();
        let event = active_step_event(&lock(&self.tracker));
        self.emit(event);
    }

    /// End the session.  No pending transition fires afterwards.
    pub fn leave(mut self) {
        self.timers.cancel_all();
        info!(session = %self.id, recipe = %self.recipe_id, "cooking session left");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sabor_types::{Ingredient, RecipeOrigin, Step};

    fn recipe(steps: u32) -> Recipe {
        Recipe {
            id: "52776".into(),
            title: "Chocolate Gateau".into(),
            description: String::new(),
            author: None,
            image: None,
            category: "Dessert".into(),
            cuisine: "French".into(),
            difficulty: None,
            time: None,
            total_time: None,
            servings: None,
            views: 0,
            likes: 0,
            tags: Vec::new(),
            cultural_context: None,
            ingredients: vec![Ingredient::new("100g", "chocolate"), Ingredient::new("2", "eggs")],
            steps: (1..=steps).map(|n| Step::new(n, format!("step {n}"))).collect(),
            origin: RecipeOrigin::MealApi,
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            out.push(event);
        }
        out
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn checking_a_step_reports_progress_then_auto_advances() {
        let (mut session, mut rx) = CookingSession::start(&recipe(3), SessionTiming::default());
        session.toggle_step(0, true).unwrap();

        assert_eq!(
            drain(&mut rx),
            vec![SessionEvent::Progress {
                percentage: 100.0 / 3.0,
                label: "Step 2".into()
            }]
        );
        assert!(session.is_pending(ADVANCE_TIMER));

        tokio::time::sleep(ms(501)).await;
        assert_eq!(
            drain(&mut rx),
            vec![SessionEvent::ActiveStepChanged {
                index: 1,
                indicator: "Step 2 of 3".into(),
                can_retreat: true,
                can_advance: true,
            }]
        );
        assert_eq!(session.with_tracker(|t| t.active()), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn completion_fires_once_after_delay() {
        let (mut session, mut rx) = CookingSession::start(&recipe(5), SessionTiming::default());
        for i in 0..4 {
            session.toggle_step(i, true).unwrap();
        }
        assert_eq!(session.with_tracker(|t| t.percentage()), 80.0);
        assert_eq!(session.with_tracker(|t| t.current_step_label()), "Step 5");

        let outcome = session.toggle_step(4, true).unwrap();
        assert!(outcome.recipe_completed);
        assert!(session.is_pending(COMPLETION_TIMER));

        tokio::time::sleep(ms(499)).await;
        assert!(!drain(&mut rx).iter().any(|e| matches!(e, SessionEvent::RecipeCompleted { .. })));

        tokio::time::sleep(ms(2)).await;
        let completions: Vec<_> = drain(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, SessionEvent::RecipeCompleted { .. }))
            .collect();
        assert_eq!(
            completions,
            vec![SessionEvent::RecipeCompleted {
                title: "Chocolate Gateau".into()
            }]
        );

        session.toggle_step(2, false).unwrap();
        session.toggle_step(2, true).unwrap();
        session.toggle_step(4, false).unwrap();
        session.toggle_step(4, true).unwrap();
        tokio::time::sleep(ms(1000)).await;
        assert!(!drain(&mut rx).iter().any(|e| matches!(e, SessionEvent::RecipeCompleted { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn leave_cancels_pending_transitions() {
        let (mut session, mut rx) = CookingSession::start(&recipe(2), SessionTiming::default());
        session.toggle_step(0, true).unwrap();
        session.toggle_step(1, true).unwrap();
        drain(&mut rx);

        session.leave();
        tokio::time::sleep(ms(2000)).await;
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn manual_navigation_cancels_auto_advance() {
        let (mut session, mut rx) = CookingSession::start(&recipe(4), SessionTiming::default());
        session.toggle_step(0, true).unwrap();
        assert!(session.advance());
        assert!(session.advance());
        assert!(!session.is_pending(ADVANCE_TIMER));
        drain(&mut rx);

        tokio::time::sleep(ms(1000)).await;
        assert!(drain(&mut rx).is_empty());
        assert_eq!(session.with_tracker(|t| t.active()), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn unchecking_a_step_withdraws_its_auto_advance() {
        let (mut session, mut rx) = CookingSession::start(&recipe(3), SessionTiming::default());
        session.toggle_step(0, true).unwrap();
        session.toggle_step(0, false).unwrap();
        assert!(!session.is_pending(ADVANCE_TIMER));

        tokio::time::sleep(ms(600)).await;
        assert!(!drain(&mut rx).iter().any(|e| matches!(e, SessionEvent::ActiveStepChanged { .. })));
        assert_eq!(session.with_tracker(|t| t.active()), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn unchecking_another_step_keeps_the_auto_advance() {
        let (mut session, _rx) = CookingSession::start(&recipe(3), SessionTiming::default());
        session.toggle_step(0, true).unwrap();
        session.toggle_step(2, true).unwrap();
        session.toggle_step(2, false).unwrap();
        assert!(session.is_pending(ADVANCE_TIMER));

        tokio::time::sleep(ms(600)).await;
        assert_eq!(session.with_tracker(|t| t.active()), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unchecking_during_completion_delay_withdraws_the_dialog() {
        let (mut session, mut rx) = CookingSession::start(&recipe(2), SessionTiming::default());
        session.toggle_step(0, true).unwrap();
        assert!(session.toggle_step(1, true).unwrap().recipe_completed);
        session.toggle_step(0, false).unwrap();
        assert!(!session.is_pending(COMPLETION_TIMER));

        tokio::time::sleep(ms(600)).await;
        assert!(!drain(&mut rx).iter().any(|e| matches!(e, SessionEvent::RecipeCompleted { .. })));
        assert_eq!(session.with_tracker(|t| t.percentage()), 50.0);

        session.toggle_step(0, true).unwrap();
        assert!(session.toggle_step(1, true).unwrap().recipe_completed);
        tokio::time::sleep(ms(600)).await;
        let completions = drain(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, SessionEvent::RecipeCompleted { .. }))
            .count();
        assert_eq!(completions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn navigation_at_boundaries_emits_nothing() {
        let (mut session, mut rx) = CookingSession::start(&recipe(1), SessionTiming::default());
        assert!(!session.retreat());
        assert!(!session.advance());
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn ingredients_prepared_is_reported() {
        let (mut session, mut rx) = CookingSession::start(&recipe(1), SessionTiming::default());
        assert!(!session.toggle_ingredient(0, true).unwrap());
        assert!(session.toggle_ingredient(1, true).unwrap());
        assert_eq!(drain(&mut rx), vec![SessionEvent::IngredientsPrepared]);
        assert!(session.toggle_ingredient(9, true).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn reset_clears_progress_and_timers() {
        let (mut session, mut rx) = CookingSession::start(&recipe(3), SessionTiming::default());
        session.toggle_step(0, true).unwrap();
        session.toggle_ingredient(0, true).unwrap();
        session.reset();

        assert!(!session.is_pending(ADVANCE_TIMER));
        assert_eq!(session.with_tracker(|t| t.completed_count()), 0);
        assert_eq!(session.ingredients().prepared_count(), 0);
        drain(&mut rx);

        tokio::time::sleep(ms(1000)).await;
        assert!(drain(&mut rx).is_empty());
    }
}
