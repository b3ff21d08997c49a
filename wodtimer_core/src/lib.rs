#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Workout timer engine (device-agnostic).
//!
//! This crate owns the timing core of an interval-workout timer. Sound,
//! vibration and screen-wake are reached only through the traits in
//! `wodtimer_traits`, and only from the `NotificationCoordinator`.
//!
//! ## Architecture
//!
//! - **State**: mode, phase, remaining/elapsed time, repetitions, voice count (`state`)
//! - **Engine**: intents and transitions, tick handling (`engine`)
//! - **Scheduler**: drift-corrected deltas measured from a `Clock` (`scheduler`)
//! - **Pulse**: background thread that paces ticks (`pulse`)
//! - **Milestones**: countdown thresholds and completion (`milestone`)
//! - **Coordinator**: forwards milestones to collaborators (`coordinator`)
//! - **Runner**: drives an engine until it completes or is stopped (`runner`)
//!
//! ## Time
//!
//! All time is integer milliseconds. The engine never counts ticks; every
//! tick carries the real time measured since the previous one, so a host that
//! throttles or suspends the scheduler still ends up with the exact value.

pub mod bands;
pub mod builder;
pub mod collab_error;
pub mod config;
pub mod conversions;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod events;
pub mod milestone;
pub mod mocks;
pub mod pulse;
pub mod runner;
pub mod scheduler;
pub mod state;
pub mod util;

pub use bands::TimeBand;
pub use builder::TimerEngineBuilder;
pub use config::{EngineCfg, NotifySettings};
pub use coordinator::{FailureLog, NotificationCoordinator};
pub use engine::TimerEngine;
pub use error::{BuildError, TimerError};
pub use events::{SubscriptionId, TimerEvent};
pub use runner::{RunOutcome, RunParams, SamplingMode, StopReason};
pub use state::{Intent, Mode, Phase, TickStatus, TimerSnapshot, TimerState};
