//! Реконструкция состояния матча по авторитетному журналу событий.
//!
//! Используется при "холодном" возобновлении сессии, когда локальному снимку
//! доверять нельзя или его нет: состав, счёт и карточки восстанавливаются
//! с нуля строго в порядке создания событий.
//!
//! Гарантии:
//! - детерминизм: никакого wall-clock внутри, два реплея одного журнала
//!   дают побайтово одинаковые снимки;
//! - fail closed: неизвестный участник или битое событие валят весь реплей,
//!   частичный снимок не возвращается.

use crate::domain::{
    GoalRecord, MatchEvent, MatchEventKind, MatchEventLog, MatchId, ScoreBoard, Sport,
};
use crate::engine::discipline::CautionKind;
use crate::engine::errors::{ReplayError, ValidationError};
use crate::engine::phase::PhaseState;
use crate::engine::roster::TeamRoster;
use crate::session::snapshot::SessionSnapshot;
use crate::time_ctrl::MatchClock;

/// Переиграть журнал поверх исходных составов.
///
/// `home` / `away` — составы в состоянии "до матча" (как их отдаёт
/// RosterSource): стартовые игроки уже на площадке, карточек нет.
pub fn replay(
    match_id: MatchId,
    sport: Sport,
    events: &[MatchEvent],
    home: TeamRoster,
    away: TeamRoster,
) -> Result<SessionSnapshot, ReplayError> {
    let mut home = home;
    let mut away = away;
    let mut score = ScoreBoard::for_sport(sport);
    let mut log = MatchEventLog::new();

    for event in events {
        let roster = match event.team {
            crate::domain::TeamSide::Home => &mut home,
            crate::domain::TeamSide::Away => &mut away,
        };

        match &event.kind {
            MatchEventKind::Goal { scorer } => {
                let football = match &mut score {
                    ScoreBoard::Football(s) => s,
                    _ => return Err(ReplayError::MalformedLog("гол в не-футбольном матче".into())),
                };
                if !roster.contains(*scorer) {
                    return Err(ReplayError::UnknownParticipant(*scorer));
                }
                football.record_goal(
                    event.team,
                    GoalRecord {
                        scorer: *scorer,
                        segment: event.segment,
                        elapsed_secs: event.elapsed_secs,
                    },
                );
            }

            MatchEventKind::Point { scorer } => {
                let volleyball = match &mut score {
                    ScoreBoard::Volleyball(s) => s,
                    _ => {
                        return Err(ReplayError::MalformedLog(
                            "очко партии в не-волейбольном матче".into(),
                        ))
                    }
                };
                if let Some(scorer) = scorer {
                    if !roster.contains(*scorer) {
                        return Err(ReplayError::UnknownParticipant(*scorer));
                    }
                }
                volleyball.record_point(event.team);
            }

            MatchEventKind::CautionYellow { participant } => {
                apply_logged_caution(roster, *participant, CautionKind::Yellow)?;
            }

            MatchEventKind::CautionRed { participant, .. } => {
                // Красная за вторую жёлтую уже применена вместе с жёлтой —
                // журнал содержит оба события, второе не реплеим.
                let p = roster
                    .participant(*participant)
                    .ok_or(ReplayError::UnknownParticipant(*participant))?;
                if !p.has_red_card {
                    apply_logged_caution(roster, *participant, CautionKind::Red)?;
                }
            }

            MatchEventKind::Substitution {
                player_out,
                player_in,
            } => {
                if !roster.contains(*player_in) {
                    // Игрок, дозаявленный после подачи стартового протокола:
                    // в исходном составе его нет, вставляем минимальную запись.
                    let entry = crate::domain::Participant::new(
                        *player_in,
                        roster.team_id,
                        format!("Участник {}", player_in),
                    );
                    roster.add_participant(entry);
                }
                roster
                    .substitute(*player_out, *player_in)
                    .map_err(ReplayError::Invalid)?;
            }

            MatchEventKind::SetWon { winner, .. } => {
                let volleyball = match &mut score {
                    ScoreBoard::Volleyball(s) => s,
                    _ => {
                        return Err(ReplayError::MalformedLog(
                            "закрытие партии в не-волейбольном матче".into(),
                        ))
                    }
                };
                volleyball.close_set(*winner);
            }
        }

        log.events.push(event.clone());
    }

    let phase = derive_phase(sport, events);
    let clock = derive_clock(sport, events);

    Ok(SessionSnapshot {
        match_id,
        sport,
        phase,
        clock,
        score,
        home_roster: home,
        away_roster: away,
        events: log,
        officials: Vec::new(),
        // Wall-clock поля осознанно нулевые: реплей не читает часы,
        // а восстановленный таймер стоит — коррекция разрыва не нужна.
        match_started_at: 0,
        segment_started_at: 0,
        saved_at: 0,
    })
}

/// Карточка из журнала: применяем только мутацию состава,
/// черновики событий игнорируем — события уже в журнале.
fn apply_logged_caution(
    roster: &mut TeamRoster,
    id: crate::domain::ParticipantId,
    kind: CautionKind,
) -> Result<(), ReplayError> {
    match roster.apply_caution_to(id, kind) {
        Ok(_) => Ok(()),
        Err(ValidationError::UnknownParticipant(id)) => Err(ReplayError::UnknownParticipant(id)),
        Err(e) => Err(ReplayError::Invalid(e)),
    }
}

/// Фаза по журналу: футбол — тайм последнего события,
/// волейбол — открытая партия после всех закрытых.
fn derive_phase(sport: Sport, events: &[MatchEvent]) -> PhaseState {
    match sport {
        Sport::Football => match events.last() {
            None => PhaseState::NotStarted,
            Some(e) if e.segment >= 2 => PhaseState::SecondSegment,
            Some(_) => PhaseState::FirstSegment,
        },
        Sport::Volleyball => {
            let closed = events
                .iter()
                .filter(|e| matches!(e.kind, MatchEventKind::SetWon { .. }))
                .count() as u8;
            if events.is_empty() {
                PhaseState::NotStarted
            } else {
                PhaseState::SetInProgress {
                    set_index: closed + 1,
                }
            }
        }
    }
}

/// Таймер по журналу: стоит на максимуме игрового времени,
/// замеченного в каждом отрезке. Запускает его заново оператор.
fn derive_clock(sport: Sport, events: &[MatchEvent]) -> MatchClock {
    if sport != Sport::Football {
        return MatchClock::new();
    }

    let max_in = |segment: u8| {
        events
            .iter()
            .filter(|e| e.segment == segment)
            .map(|e| e.elapsed_secs)
            .max()
            .unwrap_or(0)
    };

    let first = max_in(1);
    let second = max_in(2);
    let in_second = events.iter().any(|e| e.segment >= 2);

    MatchClock {
        total_elapsed: first + second,
        segment_elapsed: if in_second { second } else { first },
        running: false,
    }
}
