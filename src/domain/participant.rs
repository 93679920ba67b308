use serde::{Deserialize, Serialize};

use crate::domain::{ParticipantId, TeamId};

/// Участник матча (игрок в заявке команды).
///
/// Инварианты:
/// - `has_red_card == true` ⇒ `on_field == false`;
/// - `yellow_cards == 2` ⇒ `has_red_card == true`.
///
/// `is_suspended` и `prior_card_count` считаются снаружи (накопление карточек
/// по турниру) и здесь только читаются.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub display_name: String,
    /// Игровой номер. None, пока номер не назначен во внешней системе.
    pub shirt_number: Option<u8>,
    pub team: TeamId,
    /// Заявлен ли в стартовый состав.
    pub is_starter: bool,
    /// Находится ли сейчас на площадке.
    pub on_field: bool,
    /// Жёлтые карточки в текущем матче (0..=2).
    pub yellow_cards: u8,
    /// Удалён ли (прямая красная или вторая жёлтая).
    pub has_red_card: bool,
    /// Дисквалифицирован по итогам прошлых матчей (считается снаружи).
    pub is_suspended: bool,
    /// Карточки за весь турнир до этого матча (read-only).
    pub prior_card_count: u32,
}

impl Participant {
    /// Новый участник без номера и флагов — "чистая" запись из заявки.
    pub fn new(id: ParticipantId, team: TeamId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            shirt_number: None,
            team,
            is_starter: false,
            on_field: false,
            yellow_cards: 0,
            has_red_card: false,
            is_suspended: false,
            prior_card_count: 0,
        }
    }

    /// Удалён ли участник из матча.
    pub fn is_sent_off(&self) -> bool {
        self.has_red_card
    }

    /// Может ли сидеть на скамейке (не на поле, не удалён, не дисквалифицирован).
    pub fn is_bench_eligible(&self) -> bool {
        !self.on_field && !self.has_red_card && !self.is_suspended
    }
}

/// Роль члена судейской бригады.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum OfficialRole {
    Referee,
    Assistant,
    Scorer,
}

/// Член судейской бригады матча.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Official {
    pub id: u64,
    pub name: String,
    pub role: OfficialRole,
}
