//! # OctoMarket Sign-in Flows
//!
//! Reducers for the pre-authentication part of the OctoMarket client: the
//! launch gate, onboarding, landing, the four credential forms and the two
//! code-entry screens, each with an embedded transient notice banner.
//!
//! ## Architecture
//!
//! Every screen is a reducer over its own state. Timers are returned as
//! effects, so the runtime owns them and cancels them when the screen goes
//! away:
//!
//! ```text
//! Action → Reducer → (State, Effects) → Store executes effects → More Actions
//! ```
//!
//! The outside world is reached through three ports (persisted key-value
//! storage, a navigator and a focus capability) collected in
//! [`FlowEnvironment`].
//!
//! ## Example: Login
//!
//! ```rust,ignore
//! use octomarket_auth::*;
//!
//! let store = screens::login(MockEnvironment::in_memory());
//!
//! store.send(FormAction::SetField { field: Field::Email, value: "a@b.co".into() }).await?;
//! store.send(FormAction::SetField { field: Field::Password, value: "secret12".into() }).await?;
//! store.send(FormAction::Submit).await?;
//!
//! // 2 s later: "Account not found."
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod actions;
pub mod config;
pub mod constants;
pub mod environment;
pub mod error;
#[cfg(feature = "test-utils")]
pub mod mocks;
pub mod providers;
pub mod reducers;
pub mod screens;
pub mod state;
pub mod validation;

// Re-export main types for convenience
pub use actions::{
    FormAction, LandingAction, LaunchAction, LaunchOutcome, NoticeAction, OnboardingAction,
    VerificationAction,
};
pub use config::FlowConfig;
pub use environment::FlowEnvironment;
#[cfg(feature = "test-utils")]
pub use environment::MockEnvironment;
pub use error::{ConfigError, FlowError, Result, ValidationError};
pub use state::{
    Field, FormKind, FormState, FormStatus, LandingState, LaunchPhase, LaunchState, Navigation,
    NavigationMode, NoticeKind, NoticeState, OnboardingState, Route, VerificationPhase,
    VerificationPurpose, VerificationState,
};
