//! Request-scoped orchestration over the repositories.
//!
//! Handlers stay thin: the engine loads rows, hands them to the pure logic
//! in `agapefy_core`, and returns the result.

pub mod onboarding;
