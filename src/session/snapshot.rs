//! Снимок сессии матча — полное сериализуемое состояние на момент времени.

use serde::{Deserialize, Serialize};

use crate::domain::{MatchEventLog, MatchId, Official, ScoreBoard, Sport};
use crate::engine::phase::PhaseState;
use crate::engine::roster::TeamRoster;
use crate::time_ctrl::MatchClock;

/// Снимок сессии.
///
/// Жизненный цикл: создаётся на старте матча; перезаписывается при каждой
/// мутирующей операции и каждом тике; при восстановлении корректируется на
/// реально прошедшее время (`saved_at`); удаляется при переходе в finished.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub match_id: MatchId,
    pub sport: Sport,
    pub phase: PhaseState,
    pub clock: MatchClock,
    pub score: ScoreBoard,
    pub home_roster: TeamRoster,
    pub away_roster: TeamRoster,
    pub events: MatchEventLog,
    pub officials: Vec<Official>,
    /// Wall-clock старта матча (unix-секунды).
    pub match_started_at: i64,
    /// Wall-clock старта текущего отрезка.
    pub segment_started_at: i64,
    /// Wall-clock записи снимка — опорная точка коррекции таймера.
    pub saved_at: i64,
}
