//! Сессия live-матча: агрегат верхнего уровня.
//!
//! `LiveMatchSession` собирает таймер, составы, дисциплину и машину фаз
//! в один объект; `SessionSnapshot` — его полное сериализуемое состояние.

pub mod session;
pub mod snapshot;

pub use session::{
    Applied, DeliveryStatus, FinalResult, LiveMatchSession, SessionPorts,
};
pub use snapshot::SessionSnapshot;
