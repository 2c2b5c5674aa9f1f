//! Flow ports.
//!
//! This module defines traits for the external collaborators the flows talk
//! to. Reducers depend on these traits only; the app shell provides concrete
//! implementations and tests use the in-memory mocks.
//!
//! ```text
//! ┌──────────────────┐  Effect::Future  ┌──────────────────┐
//! │ Reducer          │ ───────────────▶ │ KeyValueStore    │
//! │ - Validates      │                  │ Navigator        │
//! │ - Schedules      │                  │ FocusRequester   │
//! │   timers         │                  └──────────────────┘
//! └──────────────────┘
//! ```

pub mod focus;
pub mod navigation;
pub mod storage;

pub use focus::FocusRequester;
pub use navigation::Navigator;
pub use storage::KeyValueStore;
