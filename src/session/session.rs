//! Фасад сессии live-матча.
//!
//! Каждая операция идёт по одной схеме:
//! 1) проверить, что текущая фаза её допускает;
//! 2) мутировать нужный компонент (таймер / состав / счёт / фаза);
//! 3) дописать события в журнал и отправить их во внешний сток
//!    (fire-and-forget: неудача логируется и отдаётся вызывающему,
//!    локальное состояние не откатывается);
//! 4) перезаписать снимок сессии.
//!
//! Модель однопользовательская: сессию мутируют только дискретные действия
//! оператора, параллельной записи с двух устройств нет (last-write-wins
//! на стороне стока — известное ограничение).

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::domain::{
    FinishedSet, GoalRecord, MatchEvent, MatchEventKind, MatchEventLog, MatchId, Official,
    Participant, ParticipantId, ScoreBoard, Sport, TeamSide,
};
use crate::engine::discipline::{CautionDraft, CautionKind};
use crate::engine::errors::{SessionError, ValidationError};
use crate::engine::phase::{PhaseMachine, PhaseState};
use crate::engine::replay::replay;
use crate::engine::roster::TeamRoster;
use crate::infra::persistence::{EventSink, EventSource, NumberAssigner, SnapshotStore};
use crate::session::snapshot::SessionSnapshot;
use crate::time_ctrl::{MatchClock, TimeSource};

/// Внешние порты, нужные операциям сессии.
pub struct SessionPorts<'a> {
    pub store: &'a mut dyn SnapshotStore,
    pub sink: &'a mut dyn EventSink,
    pub time: &'a dyn TimeSource,
}

/// Исход доставки событий во внешний сток.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryStatus {
    Delivered,
    /// Хотя бы одно событие не дошло; локальное состояние уже применено.
    Failed(String),
}

/// Результат мутирующей операции: записанные события + статус доставки.
#[derive(Clone, Debug)]
pub struct Applied {
    pub events: Vec<MatchEvent>,
    pub delivery: DeliveryStatus,
}

/// Финальный результат матча.
///
/// Счёт и партии пересчитаны из журнала — локальным счётчикам
/// на финализации не доверяем.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FinalResult {
    pub match_id: MatchId,
    pub sport: Sport,
    /// Голы (футбол) или выигранные партии (волейбол).
    pub home_score: u32,
    pub away_score: u32,
    pub finished_sets: Vec<FinishedSet>,
    pub total_events: u32,
}

/// Сессия одного live-матча.
#[derive(Clone, Debug)]
pub struct LiveMatchSession {
    pub match_id: MatchId,
    pub sport: Sport,
    pub phase: PhaseMachine,
    pub clock: MatchClock,
    pub score: ScoreBoard,
    pub home: TeamRoster,
    pub away: TeamRoster,
    pub log: MatchEventLog,
    pub officials: Vec<Official>,
    pub match_started_at: i64,
    pub segment_started_at: i64,
    finalized: Option<FinalResult>,
}

impl LiveMatchSession {
    /// Новая сессия до старта матча. Составы — из RosterSource.
    pub fn new(match_id: MatchId, sport: Sport, home: TeamRoster, away: TeamRoster) -> Self {
        Self {
            match_id,
            sport,
            phase: PhaseMachine::new(sport),
            clock: MatchClock::new(),
            score: ScoreBoard::for_sport(sport),
            home,
            away,
            log: MatchEventLog::new(),
            officials: Vec::new(),
            match_started_at: 0,
            segment_started_at: 0,
            finalized: None,
        }
    }

    pub fn roster(&self, side: TeamSide) -> &TeamRoster {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    pub fn roster_mut(&mut self, side: TeamSide) -> &mut TeamRoster {
        match side {
            TeamSide::Home => &mut self.home,
            TeamSide::Away => &mut self.away,
        }
    }

    /// Старт матча: стартовые составы, судейская бригада,
    /// первый отрезок, начальный снимок.
    pub fn start(
        &mut self,
        officials: Vec<Official>,
        home_starters: &[ParticipantId],
        away_starters: &[ParticipantId],
        ports: &mut SessionPorts,
    ) -> Result<(), SessionError> {
        if self.phase.current != PhaseState::NotStarted {
            return Err(ValidationError::AlreadyStarted.into());
        }
        if home_starters.is_empty() || away_starters.is_empty() {
            return Err(ValidationError::EmptyLineup.into());
        }

        // Стартовые отметки применяем на копиях: если хоть одна не пройдёт
        // (нет номера, дисквалификация), состояние остаётся нетронутым.
        let mut home = self.home.clone();
        let mut away = self.away.clone();
        for id in home_starters {
            home.mark_starter(*id)?;
        }
        for id in away_starters {
            away.mark_starter(*id)?;
        }
        self.home = home;
        self.away = away;
        self.officials = officials;

        self.phase.start()?;
        if self.sport == Sport::Football {
            self.clock.start_segment(1);
        }

        let now = ports.time.now_unix();
        self.match_started_at = now;
        self.segment_started_at = now;
        self.persist(ports);

        info!(
            "матч {}: старт, {} на {}",
            self.match_id,
            self.home.starter_count(),
            self.away.starter_count()
        );
        Ok(())
    }

    /// Гол (футбол).
    pub fn record_goal(
        &mut self,
        side: TeamSide,
        scorer: ParticipantId,
        ports: &mut SessionPorts,
    ) -> Result<Applied, SessionError> {
        if self.sport != Sport::Football {
            return Err(ValidationError::SportMismatch.into());
        }
        self.ensure_scoring_allowed()?;

        let roster = self.roster(side);
        let p = roster
            .participant(scorer)
            .ok_or(ValidationError::UnknownParticipant(scorer))?;
        if p.has_red_card {
            return Err(ValidationError::SentOffParticipant(scorer).into());
        }

        let segment = self.phase.current.segment_index();
        let elapsed = self.clock.segment_elapsed;
        if let ScoreBoard::Football(score) = &mut self.score {
            score.record_goal(
                side,
                GoalRecord {
                    scorer,
                    segment,
                    elapsed_secs: elapsed,
                },
            );
        }

        let event = self.push_event(MatchEventKind::Goal { scorer }, side, ports);
        Ok(self.commit(vec![event], ports))
    }

    /// Очко в партии (волейбол). Подача переходит к выигравшей стороне.
    pub fn record_point(
        &mut self,
        side: TeamSide,
        scorer: Option<ParticipantId>,
        ports: &mut SessionPorts,
    ) -> Result<Applied, SessionError> {
        if self.sport != Sport::Volleyball {
            return Err(ValidationError::SportMismatch.into());
        }
        self.ensure_scoring_allowed()?;

        if let Some(id) = scorer {
            if !self.roster(side).contains(id) {
                return Err(ValidationError::UnknownParticipant(id).into());
            }
        }

        if let ScoreBoard::Volleyball(score) = &mut self.score {
            score.record_point(side);
        }

        let event = self.push_event(MatchEventKind::Point { scorer }, side, ports);
        Ok(self.commit(vec![event], ports))
    }

    /// Карточка участнику. Вторая жёлтая даёт два события:
    /// жёлтую и красную by_accumulation.
    pub fn record_card(
        &mut self,
        side: TeamSide,
        participant: ParticipantId,
        kind: CautionKind,
        ports: &mut SessionPorts,
    ) -> Result<Applied, SessionError> {
        self.ensure_scoring_allowed()?;

        let drafts = self.roster_mut(side).apply_caution_to(participant, kind)?;

        let mut events = Vec::with_capacity(drafts.len());
        for draft in &drafts {
            let kind = match draft.kind {
                CautionKind::Yellow => MatchEventKind::CautionYellow { participant },
                CautionKind::Red => MatchEventKind::CautionRed {
                    participant,
                    by_accumulation: draft.by_accumulation,
                },
            };
            events.push(self.push_event(kind, side, ports));
        }
        Ok(self.commit(events, ports))
    }

    /// Отмена одного события карточки (компенсирующее удаление).
    ///
    /// Внешний сток события не удаляет (у порта нет такой операции) —
    /// расхождение, как и при неудачной доставке, закрывает полный реплей.
    pub fn remove_caution(
        &mut self,
        event_index: u32,
        ports: &mut SessionPorts,
    ) -> Result<MatchEvent, SessionError> {
        let event = self
            .log
            .find(event_index)
            .ok_or(ValidationError::UnknownEvent(event_index))?
            .clone();

        let participant = event
            .kind
            .cautioned_participant()
            .ok_or(ValidationError::NotRevertible(event_index))?;

        let draft = match &event.kind {
            MatchEventKind::CautionYellow { .. } => CautionDraft {
                kind: CautionKind::Yellow,
                by_accumulation: false,
            },
            MatchEventKind::CautionRed {
                by_accumulation, ..
            } => CautionDraft {
                kind: CautionKind::Red,
                by_accumulation: *by_accumulation,
            },
            _ => return Err(ValidationError::NotRevertible(event_index).into()),
        };

        self.roster_mut(event.team)
            .revert_caution_to(participant, &draft)?;
        self.log.remove(event_index);
        self.persist(ports);

        debug!(
            "матч {}: отменено событие {} (карточка участника {})",
            self.match_id, event_index, participant
        );
        Ok(event)
    }

    /// Поздняя дозаявка: игрок входит кандидатом на скамейку.
    pub fn add_participant(
        &mut self,
        side: TeamSide,
        entry: Participant,
        ports: &mut SessionPorts,
    ) -> Result<(), SessionError> {
        if self.phase.is_finished() {
            return Err(ValidationError::MatchNotRunning.into());
        }
        self.roster_mut(side).add_participant(entry);
        self.persist(ports);
        Ok(())
    }

    /// Назначить игровой номер: сначала подтверждение внешней системы,
    /// затем локальная запись. После этого mark_starter / замена повторяются.
    pub fn assign_number(
        &mut self,
        side: TeamSide,
        participant: ParticipantId,
        number: u8,
        assigner: &mut dyn NumberAssigner,
        ports: &mut SessionPorts,
    ) -> Result<(), SessionError> {
        if !self.roster(side).contains(participant) {
            return Err(ValidationError::UnknownParticipant(participant).into());
        }
        assigner.assign_number(participant, number)?;
        if let Some(p) = self.roster_mut(side).participant_mut(participant) {
            p.shirt_number = Some(number);
        }
        self.persist(ports);
        Ok(())
    }

    /// Замена. `late_entry` — запись для игрока, которого ещё нет в заявке
    /// (дозаявка после подачи стартового протокола): он вставляется первым.
    pub fn substitute(
        &mut self,
        side: TeamSide,
        out_id: ParticipantId,
        in_id: ParticipantId,
        late_entry: Option<Participant>,
        ports: &mut SessionPorts,
    ) -> Result<Applied, SessionError> {
        if matches!(
            self.phase.current,
            PhaseState::NotStarted | PhaseState::Finished
        ) {
            return Err(ValidationError::MatchNotRunning.into());
        }

        if !self.roster(side).contains(in_id) {
            match late_entry {
                Some(entry) if entry.id == in_id => {
                    self.roster_mut(side).add_participant(entry);
                }
                _ => return Err(ValidationError::UnknownParticipant(in_id).into()),
            }
        }

        // Номер — предусловие выхода на площадку; назначается
        // через assign_number и внешнюю систему.
        let incoming = self.roster(side).participant(in_id);
        if matches!(incoming, Some(p) if p.shirt_number.is_none()) {
            return Err(ValidationError::MissingShirtNumber(in_id).into());
        }

        self.roster_mut(side).substitute(out_id, in_id)?;

        let event = self.push_event(
            MatchEventKind::Substitution {
                player_out: out_id,
                player_in: in_id,
            },
            side,
            ports,
        );
        Ok(self.commit(vec![event], ports))
    }

    /// Следующая фаза футбольного матча; связка с таймером:
    /// перерыв останавливает таймер, второй тайм обнуляет счётчик отрезка,
    /// выход из второго тайма финализирует матч.
    pub fn advance_phase(
        &mut self,
        ports: &mut SessionPorts,
    ) -> Result<PhaseState, SessionError> {
        let next = self.phase.advance()?;
        match next {
            PhaseState::Interval => {
                self.clock.pause();
                self.persist(ports);
            }
            PhaseState::SecondSegment => {
                self.clock.start_segment(2);
                self.segment_started_at = ports.time.now_unix();
                self.persist(ports);
            }
            PhaseState::Finished => {
                self.finalize(ports);
            }
            _ => self.persist(ports),
        }
        Ok(next)
    }

    /// Закрыть партию (волейбол). Победитель — сторона с большим счётом;
    /// условие победы в матче решает вызывающая сторона (`match_finished`).
    pub fn close_set(
        &mut self,
        match_finished: bool,
        ports: &mut SessionPorts,
    ) -> Result<Applied, SessionError> {
        if self.sport != Sport::Volleyball {
            return Err(ValidationError::SportMismatch.into());
        }
        let set_index = match self.phase.current {
            PhaseState::SetInProgress { set_index } => set_index,
            _ => return Err(ValidationError::MatchNotRunning.into()),
        };

        let (points, winner) = match &self.score {
            ScoreBoard::Volleyball(score) => {
                let points = score.current;
                if points.home == points.away {
                    return Err(ValidationError::SetNotDecided.into());
                }
                let winner = if points.home > points.away {
                    TeamSide::Home
                } else {
                    TeamSide::Away
                };
                (points, winner)
            }
            _ => return Err(ValidationError::SportMismatch.into()),
        };

        if let ScoreBoard::Volleyball(score) = &mut self.score {
            score.close_set(winner);
        }

        let event = self.push_event(
            MatchEventKind::SetWon {
                set_index,
                home_points: points.home,
                away_points: points.away,
                winner,
            },
            winner,
            ports,
        );
        let applied = self.commit(vec![event], ports);

        self.phase.close_set(match_finished)?;
        if match_finished {
            self.finalize(ports);
        } else {
            self.persist(ports);
        }
        Ok(applied)
    }

    /// Одна секунда игрового времени (повторяющийся колбэк).
    /// Снимок обновляется, чтобы перезагрузка не теряла время.
    pub fn tick(&mut self, ports: &mut SessionPorts) -> u32 {
        if !self.clock.running {
            return self.clock.segment_elapsed;
        }
        let elapsed = self.clock.tick();
        self.persist(ports);
        elapsed
    }

    /// Завершение матча. Идемпотентно: повторный вызов возвращает
    /// уже посчитанный результат, ничего не дублируя.
    pub fn finish(&mut self, ports: &mut SessionPorts) -> FinalResult {
        if let Some(result) = &self.finalized {
            return result.clone();
        }
        self.phase.finish();
        self.finalize(ports)
    }

    /// Сохранить снимок при закрытии экрана (свежий `saved_at`
    /// нужен коррекции таймера при следующем открытии).
    pub fn suspend(&mut self, ports: &mut SessionPorts) {
        if self.finalized.is_none() {
            self.persist(ports);
        }
    }

    /// Быстрое возобновление: доверяем локальному снимку,
    /// кредитуем время, прошедшее при закрытом экране.
    pub fn resume_local(
        match_id: MatchId,
        ports: &mut SessionPorts,
    ) -> Result<Self, SessionError> {
        let mut snapshot = ports
            .store
            .load(match_id)
            .ok_or(SessionError::SnapshotNotFound(match_id))?;

        let now = ports.time.now_unix();
        snapshot.clock.credit_gap(snapshot.saved_at, now);

        let mut session = Self::from_snapshot(snapshot);
        session.persist(ports);
        debug!("матч {}: возобновлён из локального снимка", match_id);
        Ok(session)
    }

    /// Медленное возобновление: снимку не доверяем, состояние
    /// реконструируется по авторитетному журналу событий.
    pub fn resume_replayed(
        match_id: MatchId,
        sport: Sport,
        source: &dyn EventSource,
        home: TeamRoster,
        away: TeamRoster,
        ports: &mut SessionPorts,
    ) -> Result<Self, SessionError> {
        let events = source.list_events(match_id);
        let snapshot = replay(match_id, sport, &events, home, away)?;
        let mut session = Self::from_snapshot(snapshot);
        session.match_started_at = 0;
        session.persist(ports);
        info!(
            "матч {}: реконструирован по журналу ({} событий)",
            match_id,
            events.len()
        );
        Ok(session)
    }

    /// Текущий снимок сессии.
    pub fn to_snapshot(&self, saved_at: i64) -> SessionSnapshot {
        SessionSnapshot {
            match_id: self.match_id,
            sport: self.sport,
            phase: self.phase.current,
            clock: self.clock,
            score: self.score.clone(),
            home_roster: self.home.clone(),
            away_roster: self.away.clone(),
            events: self.log.clone(),
            officials: self.officials.clone(),
            match_started_at: self.match_started_at,
            segment_started_at: self.segment_started_at,
            saved_at,
        }
    }

    /// Сессия из снимка (быстрый путь или результат реплея).
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        Self {
            match_id: snapshot.match_id,
            sport: snapshot.sport,
            phase: PhaseMachine {
                sport: snapshot.sport,
                current: snapshot.phase,
            },
            clock: snapshot.clock,
            score: snapshot.score,
            home: snapshot.home_roster,
            away: snapshot.away_roster,
            log: snapshot.events,
            officials: snapshot.officials,
            match_started_at: snapshot.match_started_at,
            segment_started_at: snapshot.segment_started_at,
            finalized: None,
        }
    }

    pub fn final_result(&self) -> Option<&FinalResult> {
        self.finalized.as_ref()
    }

    fn ensure_scoring_allowed(&self) -> Result<(), ValidationError> {
        if self.phase.current.allows_scoring() {
            Ok(())
        } else {
            Err(ValidationError::MatchNotRunning)
        }
    }

    /// Дописать событие в журнал (порядковый номер выдаёт журнал).
    fn push_event(
        &mut self,
        kind: MatchEventKind,
        side: TeamSide,
        ports: &SessionPorts,
    ) -> MatchEvent {
        self.log.push(
            kind,
            side,
            self.phase.current.segment_index(),
            self.clock.segment_elapsed,
            ports.time.now_unix(),
        )
    }

    /// Отправить события в сток и перезаписать снимок.
    fn commit(&mut self, events: Vec<MatchEvent>, ports: &mut SessionPorts) -> Applied {
        let mut delivery = DeliveryStatus::Delivered;
        for event in &events {
            if let Err(e) = ports.sink.append(self.match_id, event) {
                warn!(
                    "матч {}: событие {} не доставлено в сток: {}",
                    self.match_id, event.index, e
                );
                if delivery == DeliveryStatus::Delivered {
                    delivery = DeliveryStatus::Failed(e.to_string());
                }
            }
        }
        self.persist(ports);
        Applied { events, delivery }
    }

    fn persist(&self, ports: &mut SessionPorts) {
        let snapshot = self.to_snapshot(ports.time.now_unix());
        ports.store.save(self.match_id, &snapshot);
    }

    /// Финализация: таймер замораживается, итог пересчитывается из журнала,
    /// локальный снимок удаляется.
    fn finalize(&mut self, ports: &mut SessionPorts) -> FinalResult {
        self.clock.pause();

        let (home_score, away_score, finished_sets) = match self.sport {
            Sport::Football => {
                let count = |side: TeamSide| {
                    self.log
                        .events
                        .iter()
                        .filter(|e| e.team == side && matches!(e.kind, MatchEventKind::Goal { .. }))
                        .count() as u32
                };
                (count(TeamSide::Home), count(TeamSide::Away), Vec::new())
            }
            Sport::Volleyball => {
                let sets: Vec<FinishedSet> = self
                    .log
                    .events
                    .iter()
                    .filter_map(|e| match &e.kind {
                        MatchEventKind::SetWon {
                            set_index,
                            home_points,
                            away_points,
                            winner,
                        } => Some(FinishedSet {
                            set_index: *set_index,
                            points: crate::domain::SetPoints {
                                home: *home_points,
                                away: *away_points,
                            },
                            winner: *winner,
                        }),
                        _ => None,
                    })
                    .collect();
                let won = |side: TeamSide| sets.iter().filter(|s| s.winner == side).count() as u32;
                (won(TeamSide::Home), won(TeamSide::Away), sets)
            }
        };

        let result = FinalResult {
            match_id: self.match_id,
            sport: self.sport,
            home_score,
            away_score,
            finished_sets,
            total_events: self.log.len() as u32,
        };

        ports.store.delete(self.match_id);
        self.finalized = Some(result.clone());
        info!(
            "матч {}: завершён со счётом {}:{}",
            self.match_id, home_score, away_score
        );
        result
    }
}
