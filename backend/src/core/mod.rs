//! Calendar primitives shared by the scenario resolver and the engine

pub mod time;

pub use time::{Horizon, MONTHS_PER_QUARTER, MONTHS_PER_YEAR};
