//! Core types and scheduler for Relayout.
//!
//! This is an internal crate shared by Relayout and its proc macros, and should not be used
//! directly. All important types are re-exported by Relayout.

pub mod animation;
pub mod clock;
pub mod config;
pub mod conflicts;
pub mod easing;
pub mod error;
pub mod executor;
pub mod indices;
pub mod interpolation;
pub mod manager;
pub mod mutation;
pub mod ordering;
pub mod progress;
pub mod registry;
pub mod status;
pub mod store;
pub mod view;
