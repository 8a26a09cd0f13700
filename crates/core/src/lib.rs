//! Core business logic for Akiba.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations live
//! here.
//!
//! # Modules
//!
//! - `budget` - Budget evaluation, status derivation, and alert notifications

pub mod budget;
