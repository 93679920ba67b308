// tests/session_tests.rs
//
// Сессия live-матча целиком:
//
// 1) сценарий "футбол": гол в первом тайме, вторая жёлтая во втором ⇒
//    счёт 1:0, игрок удалён, в журнале ровно 4 события;
// 2) сценарий "волейбол": 5:3 и закрытие партии ⇒ партия в истории,
//    открытая обнулена;
// 3) коррекция таймера при возобновлении (шёл / стоял / перевод часов);
// 4) замены: выход без номера ⇒ MissingShirtNumber, после назначения
//    номера проходит; повторный выход разрешён;
// 5) finish идемпотентен, снимок удаляется;
// 6) отказ стока: локальное состояние применено, доставка помечена Failed;
// 7) холодное возобновление реплеем журнала.

use std::cell::Cell;

use livematch_engine::domain::{
    MatchEvent, MatchEventKind, MatchId, Participant, ScoreBoard, Sport, TeamSide,
};
use livematch_engine::engine::discipline::CautionKind;
use livematch_engine::engine::errors::{SessionError, SubmissionError, ValidationError};
use livematch_engine::engine::phase::PhaseState;
use livematch_engine::engine::roster::TeamRoster;
use livematch_engine::infra::{
    EventSink, InMemoryEventStore, InMemoryNumberAssigner, InMemorySnapshotStore, SnapshotStore,
};
use livematch_engine::session::{DeliveryStatus, LiveMatchSession, SessionPorts};
use livematch_engine::time_ctrl::TimeSource;

/// Подконтрольные часы для тестов.
struct FakeTime {
    now: Cell<i64>,
}

impl FakeTime {
    fn at(now: i64) -> Self {
        Self { now: Cell::new(now) }
    }
}

impl TimeSource for FakeTime {
    fn now_unix(&self) -> i64 {
        self.now.get()
    }
}

/// Сток, у которого "нет сети".
struct FailingSink;

impl EventSink for FailingSink {
    fn append(&mut self, _: MatchId, _: &MatchEvent) -> Result<(), SubmissionError> {
        Err(SubmissionError {
            reason: "нет сети".into(),
        })
    }
}

fn player(id: u64, team: u64, number: u8) -> Participant {
    let mut p = Participant::new(id, team, format!("Игрок {}", id));
    p.shirt_number = Some(number);
    p
}

fn football_session() -> LiveMatchSession {
    let home = TeamRoster::with_entries(
        10,
        TeamSide::Home,
        vec![player(1, 10, 7), player(3, 10, 9)],
    );
    let away = TeamRoster::with_entries(20, TeamSide::Away, vec![player(2, 20, 5)]);
    LiveMatchSession::new(1, Sport::Football, home, away)
}

fn volleyball_session() -> LiveMatchSession {
    let home = TeamRoster::with_entries(30, TeamSide::Home, vec![player(6, 30, 2)]);
    let away = TeamRoster::with_entries(40, TeamSide::Away, vec![player(7, 40, 3)]);
    LiveMatchSession::new(2, Sport::Volleyball, home, away)
}

#[test]
fn session_football_scenario() {
    let mut store = InMemorySnapshotStore::new();
    let mut sink = InMemoryEventStore::new();
    let time = FakeTime::at(1000);
    let mut ports = SessionPorts {
        store: &mut store,
        sink: &mut sink,
        time: &time,
    };

    let mut session = football_session();
    session.start(Vec::new(), &[1], &[2], &mut ports).unwrap();
    assert_eq!(session.phase.current, PhaseState::FirstSegment);

    // Десять игровых минут — гол хозяев.
    for _ in 0..600 {
        session.tick(&mut ports);
    }
    let applied = session.record_goal(TeamSide::Home, 1, &mut ports).unwrap();
    assert_eq!(applied.events[0].segment, 1);
    assert_eq!(applied.events[0].elapsed_secs, 600);
    assert_eq!(applied.delivery, DeliveryStatus::Delivered);

    // Жёлтая гостю.
    session
        .record_card(TeamSide::Away, 2, CautionKind::Yellow, &mut ports)
        .unwrap();

    // Перерыв: счёт и карточки заблокированы, таймер стоит.
    session.advance_phase(&mut ports).unwrap();
    assert!(!session.clock.running);
    let err = session.record_goal(TeamSide::Home, 1, &mut ports).unwrap_err();
    assert_eq!(
        err,
        SessionError::Validation(ValidationError::MatchNotRunning)
    );

    // Второй тайм: счётчик отрезка обнулён, матчевый — нет.
    session.advance_phase(&mut ports).unwrap();
    assert_eq!(session.clock.segment_elapsed, 0);
    assert_eq!(session.clock.total_elapsed, 600);

    // Вторая жёлтая ⇒ красная by_accumulation.
    let applied = session
        .record_card(TeamSide::Away, 2, CautionKind::Yellow, &mut ports)
        .unwrap();
    assert_eq!(applied.events.len(), 2);
    assert!(matches!(
        applied.events[1].kind,
        MatchEventKind::CautionRed {
            by_accumulation: true,
            ..
        }
    ));

    let score = session.score.as_football().unwrap();
    assert_eq!(score.goals(TeamSide::Home), 1);
    assert_eq!(score.goals(TeamSide::Away), 0);

    let p2 = session.away.participant(2).unwrap();
    assert!(p2.has_red_card);
    assert!(!p2.on_field);

    // Гол + жёлтая + жёлтая + красная = 4 события.
    assert_eq!(session.log.len(), 4);
    assert_eq!(session.phase.current, PhaseState::SecondSegment);

    // Третья карточка уже удалённому — no-op с AlreadySentOff.
    let err = session
        .record_card(TeamSide::Away, 2, CautionKind::Yellow, &mut ports)
        .unwrap_err();
    assert_eq!(
        err,
        SessionError::Validation(ValidationError::AlreadySentOff(2))
    );
    assert_eq!(session.log.len(), 4);
}

#[test]
fn session_volleyball_scenario() {
    let mut store = InMemorySnapshotStore::new();
    let mut sink = InMemoryEventStore::new();
    let time = FakeTime::at(1000);
    let mut ports = SessionPorts {
        store: &mut store,
        sink: &mut sink,
        time: &time,
    };

    let mut session = volleyball_session();
    session.start(Vec::new(), &[6], &[7], &mut ports).unwrap();

    for _ in 0..5 {
        session.record_point(TeamSide::Home, None, &mut ports).unwrap();
    }
    for _ in 0..3 {
        session.record_point(TeamSide::Away, None, &mut ports).unwrap();
    }

    // Подача у стороны, выигравшей последний розыгрыш.
    let score = session.score.as_volleyball().unwrap();
    assert_eq!(score.serving, Some(TeamSide::Away));

    let applied = session.close_set(false, &mut ports).unwrap();
    assert!(matches!(
        applied.events[0].kind,
        MatchEventKind::SetWon {
            set_index: 1,
            home_points: 5,
            away_points: 3,
            winner: TeamSide::Home,
        }
    ));

    let score = session.score.as_volleyball().unwrap();
    assert_eq!(score.sets_won(TeamSide::Home), 1);
    assert_eq!(score.finished_sets.len(), 1);
    assert_eq!(score.current.home, 0);
    assert_eq!(score.current.away, 0);
    assert_eq!(score.set_index, 2);
    assert_eq!(
        session.phase.current,
        PhaseState::SetInProgress { set_index: 2 }
    );
}

#[test]
fn session_close_set_rejects_tie() {
    let mut store = InMemorySnapshotStore::new();
    let mut sink = InMemoryEventStore::new();
    let time = FakeTime::at(1000);
    let mut ports = SessionPorts {
        store: &mut store,
        sink: &mut sink,
        time: &time,
    };

    let mut session = volleyball_session();
    session.start(Vec::new(), &[6], &[7], &mut ports).unwrap();
    session.record_point(TeamSide::Home, None, &mut ports).unwrap();
    session.record_point(TeamSide::Away, None, &mut ports).unwrap();

    let err = session.close_set(false, &mut ports).unwrap_err();
    assert_eq!(err, SessionError::Validation(ValidationError::SetNotDecided));
}

#[test]
fn session_resume_credits_gap_only_when_running() {
    let mut store = InMemorySnapshotStore::new();
    let mut sink = InMemoryEventStore::new();
    let time = FakeTime::at(1000);

    {
        let mut ports = SessionPorts {
            store: &mut store,
            sink: &mut sink,
            time: &time,
        };
        let mut session = football_session();
        session.start(Vec::new(), &[1], &[2], &mut ports).unwrap();
        for _ in 0..30 {
            session.tick(&mut ports);
        }
        session.suspend(&mut ports);
    }

    // Экран был закрыт 120 реальных секунд, тайм при этом "шёл".
    time.now.set(1120);
    let mut ports = SessionPorts {
        store: &mut store,
        sink: &mut sink,
        time: &time,
    };
    let session = LiveMatchSession::resume_local(1, &mut ports).unwrap();
    assert_eq!(session.clock.segment_elapsed, 150);
    assert_eq!(session.clock.total_elapsed, 150);
}

#[test]
fn session_resume_paused_applies_no_correction() {
    let mut store = InMemorySnapshotStore::new();
    let mut sink = InMemoryEventStore::new();
    let time = FakeTime::at(1000);

    {
        let mut ports = SessionPorts {
            store: &mut store,
            sink: &mut sink,
            time: &time,
        };
        let mut session = football_session();
        session.start(Vec::new(), &[1], &[2], &mut ports).unwrap();
        for _ in 0..30 {
            session.tick(&mut ports);
        }
        // Перерыв: таймер стоит на момент сохранения.
        session.advance_phase(&mut ports).unwrap();
        session.suspend(&mut ports);
    }

    time.now.set(1120);
    let mut ports = SessionPorts {
        store: &mut store,
        sink: &mut sink,
        time: &time,
    };
    let session = LiveMatchSession::resume_local(1, &mut ports).unwrap();
    assert_eq!(session.clock.segment_elapsed, 30);
}

#[test]
fn session_resume_clock_skew_is_zero_correction() {
    let mut store = InMemorySnapshotStore::new();
    let mut sink = InMemoryEventStore::new();
    let time = FakeTime::at(1000);

    {
        let mut ports = SessionPorts {
            store: &mut store,
            sink: &mut sink,
            time: &time,
        };
        let mut session = football_session();
        session.start(Vec::new(), &[1], &[2], &mut ports).unwrap();
        for _ in 0..30 {
            session.tick(&mut ports);
        }
        session.suspend(&mut ports);
    }

    // Часы устройства перевели назад.
    time.now.set(900);
    let mut ports = SessionPorts {
        store: &mut store,
        sink: &mut sink,
        time: &time,
    };
    let session = LiveMatchSession::resume_local(1, &mut ports).unwrap();
    assert_eq!(session.clock.segment_elapsed, 30);
}

#[test]
fn session_substitution_reentry_and_number_flow() {
    let mut store = InMemorySnapshotStore::new();
    let mut sink = InMemoryEventStore::new();
    let time = FakeTime::at(1000);
    let mut ports = SessionPorts {
        store: &mut store,
        sink: &mut sink,
        time: &time,
    };

    let mut session = football_session();
    session.start(Vec::new(), &[1], &[2], &mut ports).unwrap();

    // Дозаявка без номера: выход на замену блокируется до назначения номера.
    let late = Participant::new(9, 10, "Дозаявленный");
    session
        .add_participant(TeamSide::Home, late, &mut ports)
        .unwrap();
    let err = session
        .substitute(TeamSide::Home, 1, 9, None, &mut ports)
        .unwrap_err();
    assert_eq!(
        err,
        SessionError::Validation(ValidationError::MissingShirtNumber(9))
    );

    let mut assigner = InMemoryNumberAssigner::new();
    session
        .assign_number(TeamSide::Home, 9, 17, &mut assigner, &mut ports)
        .unwrap();
    assert_eq!(assigner.number_of(9), Some(17));

    // Теперь замена проходит; затем обратная — повторный выход разрешён.
    session
        .substitute(TeamSide::Home, 1, 9, None, &mut ports)
        .unwrap();
    session
        .substitute(TeamSide::Home, 9, 1, None, &mut ports)
        .unwrap();

    assert!(session.home.participant(1).unwrap().on_field);
    assert!(!session.home.participant(9).unwrap().on_field);

    // Оба выхода зафиксированы в журнале.
    let subs = session
        .log
        .events
        .iter()
        .filter(|e| matches!(e.kind, MatchEventKind::Substitution { .. }))
        .count();
    assert_eq!(subs, 2);
}

#[test]
fn session_finish_is_idempotent_and_deletes_snapshot() {
    let mut store = InMemorySnapshotStore::new();
    let mut sink = InMemoryEventStore::new();
    let time = FakeTime::at(1000);

    let mut session = football_session();
    {
        let mut ports = SessionPorts {
            store: &mut store,
            sink: &mut sink,
            time: &time,
        };
        session.start(Vec::new(), &[1], &[2], &mut ports).unwrap();
        session.record_goal(TeamSide::Home, 1, &mut ports).unwrap();
    }
    assert!(store.contains(1));

    let mut ports = SessionPorts {
        store: &mut store,
        sink: &mut sink,
        time: &time,
    };
    let first = session.finish(&mut ports);
    assert_eq!(first.home_score, 1);
    assert_eq!(first.away_score, 0);
    assert_eq!(first.total_events, 1);

    let second = session.finish(&mut ports);
    assert_eq!(first, second);
    assert_eq!(session.log.len(), 1);

    drop(ports);
    assert!(!store.contains(1));

    // После финала операции отклоняются.
    let mut ports = SessionPorts {
        store: &mut store,
        sink: &mut sink,
        time: &time,
    };
    let err = session.record_goal(TeamSide::Home, 1, &mut ports).unwrap_err();
    assert_eq!(
        err,
        SessionError::Validation(ValidationError::MatchNotRunning)
    );
}

#[test]
fn session_sink_failure_keeps_local_state() {
    let mut store = InMemorySnapshotStore::new();
    let mut sink = FailingSink;
    let time = FakeTime::at(1000);
    let mut ports = SessionPorts {
        store: &mut store,
        sink: &mut sink,
        time: &time,
    };

    let mut session = football_session();
    session.start(Vec::new(), &[1], &[2], &mut ports).unwrap();

    let applied = session.record_goal(TeamSide::Home, 1, &mut ports).unwrap();
    assert!(matches!(applied.delivery, DeliveryStatus::Failed(_)));

    // Локально гол применён, журнал дописан.
    let score = session.score.as_football().unwrap();
    assert_eq!(score.goals(TeamSide::Home), 1);
    assert_eq!(session.log.len(), 1);
}

#[test]
fn session_remove_caution_restores_player() {
    let mut store = InMemorySnapshotStore::new();
    let mut sink = InMemoryEventStore::new();
    let time = FakeTime::at(1000);
    let mut ports = SessionPorts {
        store: &mut store,
        sink: &mut sink,
        time: &time,
    };

    let mut session = football_session();
    session.start(Vec::new(), &[1], &[2], &mut ports).unwrap();

    session
        .record_card(TeamSide::Away, 2, CautionKind::Yellow, &mut ports)
        .unwrap();
    let applied = session
        .record_card(TeamSide::Away, 2, CautionKind::Yellow, &mut ports)
        .unwrap();
    let red_index = applied.events[1].index;

    // Отмена красной by_accumulation: игрок возвращается, жёлтых снова 1.
    session.remove_caution(red_index, &mut ports).unwrap();
    let p2 = session.away.participant(2).unwrap();
    assert!(!p2.has_red_card);
    assert!(p2.on_field);
    assert_eq!(p2.yellow_cards, 1);

    // Удалено ровно одно событие.
    assert_eq!(session.log.len(), 2);
    let err = session.remove_caution(red_index, &mut ports).unwrap_err();
    assert_eq!(
        err,
        SessionError::Validation(ValidationError::UnknownEvent(red_index))
    );
}

#[test]
fn session_cold_resume_replays_authoritative_log() {
    let mut store = InMemorySnapshotStore::new();
    let mut sink = InMemoryEventStore::new();
    let time = FakeTime::at(1000);

    {
        let mut ports = SessionPorts {
            store: &mut store,
            sink: &mut sink,
            time: &time,
        };
        let mut session = football_session();
        session.start(Vec::new(), &[1], &[2], &mut ports).unwrap();
        for _ in 0..60 {
            session.tick(&mut ports);
        }
        session.record_goal(TeamSide::Home, 1, &mut ports).unwrap();
        session
            .record_card(TeamSide::Away, 2, CautionKind::Yellow, &mut ports)
            .unwrap();
    }

    // Локальный снимок "потерян" — восстанавливаемся по стоку.
    store.delete(1);
    let source = sink_copy(&sink, 1);
    let mut ports = SessionPorts {
        store: &mut store,
        sink: &mut sink,
        time: &time,
    };

    // Составы — в предматчевом состоянии, как их отдаёт RosterSource.
    let fresh = football_session();
    let session = LiveMatchSession::resume_replayed(
        1,
        Sport::Football,
        &source,
        fresh.home.clone(),
        fresh.away.clone(),
        &mut ports,
    )
    .unwrap();

    let score = session.score.as_football().unwrap();
    assert_eq!(score.goals(TeamSide::Home), 1);
    assert_eq!(session.away.participant(2).unwrap().yellow_cards, 1);
    assert_eq!(session.log.len(), 2);
    assert_eq!(session.phase.current, PhaseState::FirstSegment);
}

/// Источник событий для реплея не может совпадать со стоком в ports
/// из-за заимствований — копируем журнал в отдельный источник.
fn sink_copy(sink: &InMemoryEventStore, match_id: MatchId) -> InMemoryEventStore {
    use livematch_engine::infra::EventSource;
    let mut copy = InMemoryEventStore::new();
    for event in sink.list_events(match_id) {
        copy.append(match_id, &event).unwrap();
    }
    copy
}

#[test]
fn session_start_validates_lineups() {
    let mut store = InMemorySnapshotStore::new();
    let mut sink = InMemoryEventStore::new();
    let time = FakeTime::at(1000);
    let mut ports = SessionPorts {
        store: &mut store,
        sink: &mut sink,
        time: &time,
    };

    let mut session = football_session();
    let err = session.start(Vec::new(), &[1], &[], &mut ports).unwrap_err();
    assert_eq!(err, SessionError::Validation(ValidationError::EmptyLineup));

    // Неудачный старт не трогает составы.
    assert_eq!(session.home.starter_count(), 0);

    session.start(Vec::new(), &[1], &[2], &mut ports).unwrap();
    let err = session.start(Vec::new(), &[1], &[2], &mut ports).unwrap_err();
    assert_eq!(err, SessionError::Validation(ValidationError::AlreadyStarted));
}

#[test]
fn session_snapshot_roundtrips_through_json() {
    let mut store = InMemorySnapshotStore::new();
    let mut sink = InMemoryEventStore::new();
    let time = FakeTime::at(1000);
    let mut ports = SessionPorts {
        store: &mut store,
        sink: &mut sink,
        time: &time,
    };

    let mut session = football_session();
    session.start(Vec::new(), &[1], &[2], &mut ports).unwrap();
    session.record_goal(TeamSide::Home, 1, &mut ports).unwrap();

    let snapshot = session.to_snapshot(1234);
    let json = serde_json::to_string(&snapshot).unwrap();
    let back: livematch_engine::session::SessionSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(snapshot, back);

    let restored = LiveMatchSession::from_snapshot(back);
    assert!(matches!(restored.score, ScoreBoard::Football(_)));
    assert_eq!(restored.log.len(), 1);
}
