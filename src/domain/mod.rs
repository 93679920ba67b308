//! Доменная модель live-матча: участники, события, счёт, судейская бригада.

pub mod events;
pub mod participant;
pub mod score;

use serde::{Deserialize, Serialize};

// Базовые идентификаторы (их выдаёт внешняя турнирная система).
pub type MatchId = u64;
pub type ParticipantId = u64;
pub type TeamId = u64;

/// Вид спорта, который ведёт движок.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sport {
    /// Футбол: два тайма игрового времени, карточки, замены.
    Football,
    /// Волейбол: партии по очкам, без игрового таймера.
    Volleyball,
}

/// Сторона в матче.
///
/// События и счёт привязаны к стороне, а не к TeamId напрямую —
/// так журнал событий реплеится без справочника команд.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    /// Противоположная сторона.
    pub fn other(self) -> TeamSide {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }
}

// Удобные реэкспорты, чтобы в других модулях писать crate::domain::Participant и т.п.
pub use events::*;
pub use participant::*;
pub use score::*;
