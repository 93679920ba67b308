use serde::{Deserialize, Serialize};

use crate::domain::{MatchEventKind, MatchId, ParticipantId, Sport, TeamId, TeamSide};
use crate::engine::phase::PhaseState;

/// DTO участника для экранов состава.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParticipantDto {
    pub id: ParticipantId,
    pub display_name: String,
    pub shirt_number: Option<u8>,
    pub is_starter: bool,
    pub yellow_cards: u8,
    pub has_red_card: bool,
    pub is_suspended: bool,
}

/// DTO состава: три непересекающихся списка.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RosterViewDto {
    pub team_id: TeamId,
    pub side: TeamSide,
    pub on_field: Vec<ParticipantDto>,
    pub bench: Vec<ParticipantDto>,
    pub sent_off: Vec<ParticipantDto>,
}

/// DTO табло.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoreboardDto {
    pub match_id: MatchId,
    pub sport: Sport,
    pub phase: PhaseState,
    /// Голы (футбол) или очки открытой партии (волейбол).
    pub home: u32,
    pub away: u32,
    /// Выигранные партии (только волейбол).
    pub home_sets: u8,
    pub away_sets: u8,
    /// Кто подаёт (только волейбол).
    pub serving: Option<TeamSide>,
    /// Игровая минута (только футбол).
    pub minute: u32,
}

/// DTO события для ленты протокола.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchEventDto {
    pub index: u32,
    pub team: TeamSide,
    pub segment: u8,
    /// Отображаемая минута отрезка (округление вверх от секунд).
    pub minute: u32,
    pub kind: MatchEventKind,
}

/// DTO таймера.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClockDto {
    pub total_elapsed: u32,
    pub segment_elapsed: u32,
    pub running: bool,
    pub minute: u32,
}
