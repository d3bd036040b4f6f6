//! Duel rules.
//!
//! `should_duel` decides a single pairing; `find_any_duel_pair` scans the
//! table in seat order and reports the first pairing that must duel. Only
//! one duel is ever opened per scan.

pub mod engine;

pub use engine::{find_any_duel_pair, should_duel};
