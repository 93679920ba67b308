use serde::{Deserialize, Serialize};

use crate::domain::{ParticipantId, Sport, TeamSide};

/// Один забитый гол — для счёта и для сводки бомбардиров.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoalRecord {
    pub scorer: ParticipantId,
    pub segment: u8,
    pub elapsed_secs: u32,
}

/// Футбольный счёт.
///
/// Числовой счёт не хранится отдельно: он всегда выводится как длина
/// списков голов (источник истины — журнал событий).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FootballScore {
    pub home_goals: Vec<GoalRecord>,
    pub away_goals: Vec<GoalRecord>,
}

impl FootballScore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn goals(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Home => self.home_goals.len() as u32,
            TeamSide::Away => self.away_goals.len() as u32,
        }
    }

    pub fn record_goal(&mut self, side: TeamSide, goal: GoalRecord) {
        match side {
            TeamSide::Home => self.home_goals.push(goal),
            TeamSide::Away => self.away_goals.push(goal),
        }
    }
}

/// Очки в текущей (открытой) партии.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetPoints {
    pub home: u16,
    pub away: u16,
}

impl SetPoints {
    pub fn side(&self, side: TeamSide) -> u16 {
        match side {
            TeamSide::Home => self.home,
            TeamSide::Away => self.away,
        }
    }
}

/// Закрытая партия в истории.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FinishedSet {
    pub set_index: u8,
    pub points: SetPoints,
    pub winner: TeamSide,
}

/// Волейбольный счёт: открытая партия + история закрытых.
///
/// Партия закрывается только явным действием (порог очков решает вызывающая
/// сторона, не движок). Подача переходит к стороне, выигравшей розыгрыш.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VolleyballScore {
    pub current: SetPoints,
    /// Номер открытой партии, с единицы.
    pub set_index: u8,
    /// Кто подаёт. None до первого розыгрыша.
    pub serving: Option<TeamSide>,
    pub finished_sets: Vec<FinishedSet>,
}

impl VolleyballScore {
    pub fn new() -> Self {
        Self {
            current: SetPoints::default(),
            set_index: 1,
            serving: None,
            finished_sets: Vec::new(),
        }
    }

    /// Выигранные партии (выводится из истории, не хранится отдельно).
    pub fn sets_won(&self, side: TeamSide) -> u8 {
        self.finished_sets
            .iter()
            .filter(|s| s.winner == side)
            .count() as u8
    }

    /// Очко стороне `side`; подача переходит к ней же.
    pub fn record_point(&mut self, side: TeamSide) {
        match side {
            TeamSide::Home => self.current.home += 1,
            TeamSide::Away => self.current.away += 1,
        }
        self.serving = Some(side);
    }

    /// Снять последнее очко стороны (компенсирующее удаление из журнала).
    pub fn revert_point(&mut self, side: TeamSide) {
        match side {
            TeamSide::Home => self.current.home = self.current.home.saturating_sub(1),
            TeamSide::Away => self.current.away = self.current.away.saturating_sub(1),
        }
    }

    /// Закрыть открытую партию в пользу `winner`: снимок в историю,
    /// очки в ноль, номер партии вперёд.
    pub fn close_set(&mut self, winner: TeamSide) -> FinishedSet {
        let finished = FinishedSet {
            set_index: self.set_index,
            points: self.current,
            winner,
        };
        self.finished_sets.push(finished.clone());
        self.current = SetPoints::default();
        self.set_index += 1;
        self.serving = None;
        finished
    }
}

/// Табло матча: вариант по виду спорта.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ScoreBoard {
    Football(FootballScore),
    Volleyball(VolleyballScore),
}

impl ScoreBoard {
    pub fn for_sport(sport: Sport) -> Self {
        match sport {
            Sport::Football => ScoreBoard::Football(FootballScore::new()),
            Sport::Volleyball => ScoreBoard::Volleyball(VolleyballScore::new()),
        }
    }

    pub fn as_football(&self) -> Option<&FootballScore> {
        match self {
            ScoreBoard::Football(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_volleyball(&self) -> Option<&VolleyballScore> {
        match self {
            ScoreBoard::Volleyball(s) => Some(s),
            _ => None,
        }
    }
}
