//! Scenario events
//!
//! Typed `set` / `impulse` / `agent_launch` events and their folding into a
//! scenario's schedule.

pub mod handler;
pub mod types;

pub use handler::ScenarioEventHandler;
pub use types::ScenarioEvent;
