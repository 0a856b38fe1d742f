pub mod aggregator;

pub use aggregator::{daily_breakdown, tally};
