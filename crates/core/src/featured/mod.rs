//! Best-effort lookup of the daily featured vanquish.

/// Rotation date arithmetic.
pub mod schedule;
/// External cycles-page fetching and extraction.
pub mod resolver;

pub use resolver::{parse_cycles, FeaturedEvent, FeaturedResolver};
pub use schedule::{quest_date, todays_quest_date};
