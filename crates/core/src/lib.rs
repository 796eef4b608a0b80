#![warn(clippy::all, missing_docs)]

//! Core domain logic for the vanquish companion.
//!
//! This crate hosts the foe dataset models and accessor, effect-label
//! normalization, skill filtering, view-model building, the daily featured
//! lookup, configuration handling, and preference persistence used by the
//! terminal UI and any future frontends.

pub mod config;
pub mod dataset;
pub mod effects;
pub mod featured;
pub mod filter;
pub mod models;
pub mod prefs;
pub mod view;

pub use config::AppConfig;
pub use dataset::{DatasetLoader, DatasetSource, DatasetStore, LoadError};
pub use effects::{Effect, ALL_EFFECTS};
pub use featured::{FeaturedEvent, FeaturedResolver};
pub use filter::{filter_skills, FilterOptions, FilterRules};
pub use models::{Entry, Foe, Mode, Roster, Skill};
pub use prefs::{Preferences, ThemeChoice};
pub use view::{build_area_view, build_foe_view, build_legend, AreaView, FoeView, LegendEntry};
