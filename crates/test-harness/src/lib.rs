//! Shared fixtures and assertion helpers for the integration suites.

pub mod assertions;
pub mod helpers;

pub use assertions::*;
pub use helpers::*;
