//! Chess rules engine with a move-submission guard.
//!
//! `engine` holds the synchronous rules: board model, move generation,
//! attack detection, move execution and status evaluation, fronted by
//! [`engine::Game`]. `guard` serialises move submissions from concurrent
//! callers and drops duplicates.

pub mod config;
pub mod engine;
pub mod guard;
