// src/time_ctrl/mod.rs
//! Контроль времени матча:
//! - `MatchClock` — счётчики игрового времени (матч целиком + текущий отрезок);
//! - `TimeSource` — инъецируемый источник wall-clock времени
//!   (в тестах подменяется на фейк).

pub mod clock;
pub mod time_source;

pub use clock::MatchClock;
pub use time_source::{SystemTimeSource, TimeSource};
