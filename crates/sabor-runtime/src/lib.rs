//! `sabor-runtime` – the interactive side of the site.
//!
//! # Modules
//!
//! - [`progress`] – [`ProgressTracker`][progress::ProgressTracker]: step
//!   completion, percentage, the "current step" label, the active-step
//!   pointer and the one-shot "recipe completed" signal.
//! - [`checklist`] – [`IngredientChecklist`][checklist::IngredientChecklist]:
//!   ingredient ticking with an "all prepared" signal.
//! - [`timer`] – [`TimerSet`][timer::TimerSet]: named, cancelable delayed
//!   callbacks used for UI pacing.
//! - [`session`] – [`CookingSession`][session::CookingSession]: tracker,
//!   checklist and timers wired together, reporting
//!   [`SessionEvent`][session::SessionEvent]s over a channel.
//! - [`share`] – [`ShareFlow`][share::ShareFlow]: the validated, paced
//!   memory submission and its confirmation.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: global
//!   `tracing` subscriber with optional OTLP export.

pub mod checklist;
pub mod progress;
pub mod session;
pub mod share;
pub mod telemetry;
pub mod timer;

pub use checklist::IngredientChecklist;
pub use progress::{ProgressError, ProgressTracker, ToggleOutcome};
pub use session::{CookingSession, SessionEvent, SessionTiming, ADVANCE_TIMER, COMPLETION_TIMER};
pub use share::{Confirmation, ShareFlow};
pub use telemetry::{init_tracing, LogFormat, LogSettings, TelemetryGuard};
pub use timer::TimerSet;
