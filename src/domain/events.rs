use serde::{Deserialize, Serialize};

use crate::domain::{ParticipantId, TeamSide};

/// Тип события матча.
///
/// Закрытое tagged union: один вариант на вид события, каждый несёт
/// только свои поля. Общие поля (сторона, отрезок, время) живут
/// в конверте `MatchEvent`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum MatchEventKind {
    /// Гол (футбол).
    Goal { scorer: ParticipantId },

    /// Очко в партии (волейбол). Автор розыгрыша опционален.
    Point { scorer: Option<ParticipantId> },

    /// Жёлтая карточка.
    CautionYellow { participant: ParticipantId },

    /// Красная карточка.
    ///
    /// `by_accumulation == true` — красная за вторую жёлтую,
    /// иначе прямая красная.
    CautionRed {
        participant: ParticipantId,
        by_accumulation: bool,
    },

    /// Замена: `player_out` уходит с площадки, `player_in` выходит.
    Substitution {
        player_out: ParticipantId,
        player_in: ParticipantId,
    },

    /// Партия закрыта (волейбол): итоговые очки и победитель.
    SetWon {
        set_index: u8,
        home_points: u16,
        away_points: u16,
        winner: TeamSide,
    },
}

impl MatchEventKind {
    /// Участник, на которого вешается карточка (для undo и реплея).
    pub fn cautioned_participant(&self) -> Option<ParticipantId> {
        match self {
            MatchEventKind::CautionYellow { participant } => Some(*participant),
            MatchEventKind::CautionRed { participant, .. } => Some(*participant),
            _ => None,
        }
    }
}

/// Событие матча с порядковым номером.
///
/// Ключ порядка — `index` (порядок создания). Журнал никогда не
/// пересортировывается по игровому времени: ретро-правки не поддерживаются.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchEvent {
    pub index: u32,
    pub kind: MatchEventKind,
    /// Сторона, к которой относится событие.
    pub team: TeamSide,
    /// Номер отрезка: тайм (1/2) для футбола, номер партии для волейбола.
    pub segment: u8,
    /// Игровое время внутри отрезка, секунды.
    pub elapsed_secs: u32,
    /// Wall-clock момент записи (unix-секунды). В реплее не используется.
    pub recorded_at: i64,
}

/// Журнал событий матча (append-only).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchEventLog {
    pub events: Vec<MatchEvent>,
}

impl MatchEventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Добавить событие; порядковый номер выдаёт сам журнал.
    pub fn push(
        &mut self,
        kind: MatchEventKind,
        team: TeamSide,
        segment: u8,
        elapsed_secs: u32,
        recorded_at: i64,
    ) -> MatchEvent {
        let next = self.events.last().map(|e| e.index + 1).unwrap_or(0);
        let event = MatchEvent {
            index: next,
            kind,
            team,
            segment,
            elapsed_secs,
            recorded_at,
        };
        self.events.push(event.clone());
        event
    }

    /// Найти событие по порядковому номеру.
    pub fn find(&self, index: u32) -> Option<&MatchEvent> {
        self.events.iter().find(|e| e.index == index)
    }

    /// Компенсирующее удаление одного события (не переписывание журнала):
    /// номера остальных событий не меняются.
    pub fn remove(&mut self, index: u32) -> Option<MatchEvent> {
        let pos = self.events.iter().position(|e| e.index == index)?;
        Some(self.events.remove(pos))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
