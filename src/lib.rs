//! Small toolkit for turning a log of pushes into the numbers a dashboard shows: the current
//! streak of active days, how many pushes happened in the last week, and how they spread over
//! the days of the week.
//!
//! The [analytics] engine is pure. Everything that touches the outside world (reading the event
//! log, logging, rendering) lives in [events], [cli] and [utils].

pub mod analytics;
pub mod cli;
pub mod error;
pub mod events;
pub mod utils;
