use std::collections::HashMap;

use crate::domain::{MatchEvent, MatchId, Participant, ParticipantId, TeamId};
use crate::engine::errors::SubmissionError;
use crate::session::snapshot::SessionSnapshot;

/// Локальное хранилище снимков сессии (по одному на матч).
///
/// Движок не знает, что за носитель снаружи — localStorage браузера,
/// файл или память: важно только, что снимок переживает перезапуск клиента.
pub trait SnapshotStore {
    fn save(&mut self, match_id: MatchId, snapshot: &SessionSnapshot);

    fn load(&self, match_id: MatchId) -> Option<SessionSnapshot>;

    fn delete(&mut self, match_id: MatchId);
}

/// Внешний сток событий матча (авторитетное хранилище журнала).
///
/// Отправка fire-and-forget: ошибка не фатальна, локальное состояние
/// не откатывается, повторов нет — расхождение закрывает полный реплей.
pub trait EventSink {
    fn append(&mut self, match_id: MatchId, event: &MatchEvent) -> Result<(), SubmissionError>;
}

/// Источник авторитетного журнала для холодного возобновления.
pub trait EventSource {
    fn list_events(&self, match_id: MatchId) -> Vec<MatchEvent>;
}

/// Источник заявки команды: участники с посчитанными снаружи
/// `prior_card_count` и `is_suspended`.
pub trait RosterSource {
    fn list_eligible_participants(&self, team_id: TeamId) -> Vec<Participant>;
}

/// Назначение игрового номера во внешней системе — разовый побочный эффект,
/// предусловие для mark_starter / выхода на замену.
pub trait NumberAssigner {
    fn assign_number(
        &mut self,
        participant_id: ParticipantId,
        number: u8,
    ) -> Result<(), SubmissionError>;
}

/// Простое in-memory хранилище снимков.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    snapshots: HashMap<MatchId, SessionSnapshot>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, match_id: MatchId) -> bool {
        self.snapshots.contains_key(&match_id)
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn save(&mut self, match_id: MatchId, snapshot: &SessionSnapshot) {
        self.snapshots.insert(match_id, snapshot.clone());
    }

    fn load(&self, match_id: MatchId) -> Option<SessionSnapshot> {
        self.snapshots.get(&match_id).cloned()
    }

    fn delete(&mut self, match_id: MatchId) {
        self.snapshots.remove(&match_id);
    }
}

/// In-memory журнал событий: одновременно сток и источник.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: HashMap<MatchId, Vec<MatchEvent>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_count(&self, match_id: MatchId) -> usize {
        self.events.get(&match_id).map(|v| v.len()).unwrap_or(0)
    }
}

impl EventSink for InMemoryEventStore {
    fn append(&mut self, match_id: MatchId, event: &MatchEvent) -> Result<(), SubmissionError> {
        self.events.entry(match_id).or_default().push(event.clone());
        Ok(())
    }
}

impl EventSource for InMemoryEventStore {
    fn list_events(&self, match_id: MatchId) -> Vec<MatchEvent> {
        self.events.get(&match_id).cloned().unwrap_or_default()
    }
}

/// In-memory заявки команд.
#[derive(Debug, Default)]
pub struct InMemoryRosterSource {
    rosters: HashMap<TeamId, Vec<Participant>>,
}

impl InMemoryRosterSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_team(&mut self, team_id: TeamId, participants: Vec<Participant>) {
        self.rosters.insert(team_id, participants);
    }
}

impl RosterSource for InMemoryRosterSource {
    fn list_eligible_participants(&self, team_id: TeamId) -> Vec<Participant> {
        self.rosters.get(&team_id).cloned().unwrap_or_default()
    }
}

/// In-memory назначение номеров: просто запоминает выданные.
#[derive(Debug, Default)]
pub struct InMemoryNumberAssigner {
    assigned: HashMap<ParticipantId, u8>,
}

impl InMemoryNumberAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number_of(&self, participant_id: ParticipantId) -> Option<u8> {
        self.assigned.get(&participant_id).copied()
    }
}

impl NumberAssigner for InMemoryNumberAssigner {
    fn assign_number(
        &mut self,
        participant_id: ParticipantId,
        number: u8,
    ) -> Result<(), SubmissionError> {
        self.assigned.insert(participant_id, number);
        Ok(())
    }
}
