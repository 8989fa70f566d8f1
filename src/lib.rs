//! # Ingredient Extractor
//!
//! Extracts free-text ingredient names from a recipe dataset, normalizes them
//! to canonical keys and produces a frequency-ranked lookup table ready for
//! import into a relational store.
//!
//! Data flows one way:
//! dataset rows -> [`record_extractor`] -> raw phrases -> [`normalizer`] ->
//! canonical keys -> [`aggregator`] -> frequency table -> [`reporter`] -> output tables.

pub mod aggregator;
pub mod config;
pub mod dataset;
pub mod errors;
pub mod normalizer;
pub mod normalizer_patterns;
pub mod pipeline;
pub mod record_extractor;
pub mod reporter;
