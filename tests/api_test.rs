// tests/api_test.rs
//
// Внешний API:
//
// 1) команды маппятся на операции сессии, match_id проверяется;
// 2) ошибки правил отдаются как ApiError::Validation;
// 3) запросы строят проекции из агрегата (табло, состав, протокол, таймер).

use std::cell::Cell;

use livematch_engine::api::{
    apply_command, run_query, ApiError, Command, CommandOutcome, Query, QueryResponse,
    RecordCardCommand, RecordGoalCommand, StartMatchCommand,
};
use livematch_engine::domain::{Participant, Sport, TeamSide};
use livematch_engine::engine::discipline::CautionKind;
use livematch_engine::engine::roster::TeamRoster;
use livematch_engine::infra::{InMemoryEventStore, InMemoryNumberAssigner, InMemorySnapshotStore};
use livematch_engine::session::{LiveMatchSession, SessionPorts};
use livematch_engine::time_ctrl::TimeSource;

struct FakeTime {
    now: Cell<i64>,
}

impl TimeSource for FakeTime {
    fn now_unix(&self) -> i64 {
        self.now.get()
    }
}

fn player(id: u64, team: u64, number: u8) -> Participant {
    let mut p = Participant::new(id, team, format!("Игрок {}", id));
    p.shirt_number = Some(number);
    p
}

fn session() -> LiveMatchSession {
    let home = TeamRoster::with_entries(10, TeamSide::Home, vec![player(1, 10, 7)]);
    let away = TeamRoster::with_entries(20, TeamSide::Away, vec![player(2, 20, 5)]);
    LiveMatchSession::new(1, Sport::Football, home, away)
}

#[test]
fn api_commands_drive_session() {
    let mut store = InMemorySnapshotStore::new();
    let mut sink = InMemoryEventStore::new();
    let time = FakeTime {
        now: Cell::new(1000),
    };
    let mut ports = SessionPorts {
        store: &mut store,
        sink: &mut sink,
        time: &time,
    };
    let mut assigner = InMemoryNumberAssigner::new();
    let mut session = session();

    let outcome = apply_command(
        &mut session,
        &mut ports,
        &mut assigner,
        Command::StartMatch(StartMatchCommand {
            match_id: 1,
            officials: Vec::new(),
            home_starters: vec![1],
            away_starters: vec![2],
        }),
    )
    .unwrap();
    assert!(matches!(outcome, CommandOutcome::Done));

    let outcome = apply_command(
        &mut session,
        &mut ports,
        &mut assigner,
        Command::RecordGoal(RecordGoalCommand {
            match_id: 1,
            side: TeamSide::Home,
            scorer: 1,
        }),
    )
    .unwrap();
    match outcome {
        CommandOutcome::Applied(applied) => assert_eq!(applied.events.len(), 1),
        other => panic!("ожидали Applied, получили {:?}", other),
    }

    let outcome = apply_command(
        &mut session,
        &mut ports,
        &mut assigner,
        Command::Finish { match_id: 1 },
    )
    .unwrap();
    match outcome {
        CommandOutcome::Finished(result) => {
            assert_eq!(result.home_score, 1);
            assert_eq!(result.away_score, 0);
        }
        other => panic!("ожидали Finished, получили {:?}", other),
    }
}

#[test]
fn api_rejects_foreign_match_id() {
    let mut store = InMemorySnapshotStore::new();
    let mut sink = InMemoryEventStore::new();
    let time = FakeTime {
        now: Cell::new(1000),
    };
    let mut ports = SessionPorts {
        store: &mut store,
        sink: &mut sink,
        time: &time,
    };
    let mut assigner = InMemoryNumberAssigner::new();
    let mut session = session();

    let err = apply_command(
        &mut session,
        &mut ports,
        &mut assigner,
        Command::Finish { match_id: 99 },
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
}

#[test]
fn api_validation_errors_are_client_visible() {
    let mut store = InMemorySnapshotStore::new();
    let mut sink = InMemoryEventStore::new();
    let time = FakeTime {
        now: Cell::new(1000),
    };
    let mut ports = SessionPorts {
        store: &mut store,
        sink: &mut sink,
        time: &time,
    };
    let mut assigner = InMemoryNumberAssigner::new();
    let mut session = session();

    // Карточка до старта матча.
    let err = apply_command(
        &mut session,
        &mut ports,
        &mut assigner,
        Command::RecordCard(RecordCardCommand {
            match_id: 1,
            side: TeamSide::Away,
            participant: 2,
            kind: CautionKind::Yellow,
        }),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[test]
fn api_queries_project_aggregate() {
    let mut store = InMemorySnapshotStore::new();
    let mut sink = InMemoryEventStore::new();
    let time = FakeTime {
        now: Cell::new(1000),
    };
    let mut ports = SessionPorts {
        store: &mut store,
        sink: &mut sink,
        time: &time,
    };
    let mut session = session();

    session.start(Vec::new(), &[1], &[2], &mut ports).unwrap();
    for _ in 0..90 {
        session.tick(&mut ports);
    }
    session.record_goal(TeamSide::Home, 1, &mut ports).unwrap();

    match run_query(&session, Query::GetScoreboard) {
        QueryResponse::Scoreboard(board) => {
            assert_eq!(board.home, 1);
            assert_eq!(board.away, 0);
            assert_eq!(board.minute, 2); // 90 секунд — вторая минута
        }
        other => panic!("ожидали Scoreboard, получили {:?}", other),
    }

    match run_query(&session, Query::GetRoster { side: TeamSide::Home }) {
        QueryResponse::Roster(view) => {
            assert_eq!(view.on_field.len(), 1);
            assert!(view.bench.is_empty());
            assert!(view.sent_off.is_empty());
        }
        other => panic!("ожидали Roster, получили {:?}", other),
    }

    match run_query(&session, Query::GetTimeline) {
        QueryResponse::Timeline(events) => {
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].segment, 1);
            assert_eq!(events[0].minute, 2);
        }
        other => panic!("ожидали Timeline, получили {:?}", other),
    }

    match run_query(&session, Query::GetClock) {
        QueryResponse::Clock(clock) => {
            assert_eq!(clock.segment_elapsed, 90);
            assert!(clock.running);
        }
        other => panic!("ожидали Clock, получили {:?}", other),
    }
}
