//! Машина фаз матча.
//!
//! Футбол: not_started → first_segment → interval → second_segment → finished.
//! Волейбол: цепочка открытых партий (set_in_progress) до явного завершения.
//! Связку фаза ↔ таймер выполняет сессия, сама машина таймера не трогает.

use serde::{Deserialize, Serialize};

use crate::domain::Sport;
use crate::engine::errors::ValidationError;

/// Текущая фаза матча. Ровно одна активна в любой момент.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PhaseState {
    NotStarted,
    /// Первый тайм (футбол).
    FirstSegment,
    /// Перерыв между таймами: таймер стоит, счёт/карточки запрещены.
    Interval,
    /// Второй тайм (футбол).
    SecondSegment,
    /// Открытая партия (волейбол).
    SetInProgress { set_index: u8 },
    Finished,
}

impl PhaseState {
    /// Разрешены ли сейчас счёт и карточки.
    pub fn allows_scoring(&self) -> bool {
        matches!(
            self,
            PhaseState::FirstSegment | PhaseState::SecondSegment | PhaseState::SetInProgress { .. }
        )
    }

    /// Номер текущего отрезка для журнала событий:
    /// тайм для футбола, номер партии для волейбола, 0 вне игры.
    pub fn segment_index(&self) -> u8 {
        match self {
            PhaseState::FirstSegment => 1,
            PhaseState::SecondSegment => 2,
            PhaseState::SetInProgress { set_index } => *set_index,
            _ => 0,
        }
    }
}

/// Машина фаз: вид спорта + текущая фаза.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhaseMachine {
    pub sport: Sport,
    pub current: PhaseState,
}

impl PhaseMachine {
    pub fn new(sport: Sport) -> Self {
        Self {
            sport,
            current: PhaseState::NotStarted,
        }
    }

    /// Старт матча: футбол — первый тайм, волейбол — первая партия.
    pub fn start(&mut self) -> Result<PhaseState, ValidationError> {
        if self.current != PhaseState::NotStarted {
            return Err(ValidationError::AlreadyStarted);
        }
        self.current = match self.sport {
            Sport::Football => PhaseState::FirstSegment,
            Sport::Volleyball => PhaseState::SetInProgress { set_index: 1 },
        };
        Ok(self.current)
    }

    /// Следующая фаза футбольного матча.
    ///
    /// first_segment → interval → second_segment → finished.
    /// Для волейбола переходы делает `close_set`.
    pub fn advance(&mut self) -> Result<PhaseState, ValidationError> {
        if self.sport != Sport::Football {
            return Err(ValidationError::SportMismatch);
        }
        self.current = match self.current {
            PhaseState::FirstSegment => PhaseState::Interval,
            PhaseState::Interval => PhaseState::SecondSegment,
            PhaseState::SecondSegment => PhaseState::Finished,
            _ => return Err(ValidationError::InvalidPhaseTransition),
        };
        Ok(self.current)
    }

    /// Закрытие партии (волейбол): либо следующая партия,
    /// либо конец матча — условие победы решает вызывающая сторона.
    pub fn close_set(&mut self, match_finished: bool) -> Result<PhaseState, ValidationError> {
        if self.sport != Sport::Volleyball {
            return Err(ValidationError::SportMismatch);
        }
        let set_index = match self.current {
            PhaseState::SetInProgress { set_index } => set_index,
            _ => return Err(ValidationError::InvalidPhaseTransition),
        };
        self.current = if match_finished {
            PhaseState::Finished
        } else {
            PhaseState::SetInProgress {
                set_index: set_index + 1,
            }
        };
        Ok(self.current)
    }

    /// Принудительное завершение (explicit finish / abandon).
    pub fn finish(&mut self) {
        self.current = PhaseState::Finished;
    }

    pub fn is_finished(&self) -> bool {
        self.current == PhaseState::Finished
    }
}
