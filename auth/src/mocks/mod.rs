//! Mock port implementations for testing.
//!
//! This module provides simple, in-memory implementations of all port traits
//! for use in unit and integration tests and in the walkthrough demo.

pub mod focus;
pub mod navigation;
pub mod storage;

pub use focus::RecordingFocus;
pub use navigation::{NavigationRecord, RecordingNavigator};
pub use storage::{FailingKeyValueStore, InMemoryKeyValueStore, ReadOnlyKeyValueStore};
