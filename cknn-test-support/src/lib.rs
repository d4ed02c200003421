//! Test fixtures shared by the cknn workspace.
//!
//! [`tracing::RecordingLayer`] captures spans and events for instrumentation
//! assertions; [`ci::property_test_profile`] reads the environment knobs
//! that size property-based suites.

pub mod ci;
pub mod tracing;
