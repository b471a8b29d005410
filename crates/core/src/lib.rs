//! Agapefy domain logic.
//!
//! Pure, I/O-free building blocks shared by the database and API crates:
//! id types, the domain error, onboarding settings parsing, the step slot
//! allocator, and the completion checker.

pub mod error;
pub mod onboarding_progress;
pub mod onboarding_steps;
pub mod roles;
pub mod settings;
pub mod types;
