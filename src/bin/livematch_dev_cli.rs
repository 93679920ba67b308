// src/bin/livematch_dev_cli.rs
//
// Dev-CLI: прогоняет сценарий футбольного матча и волейбольной партии
// на in-memory портах и печатает табло/протокол.

use livematch_engine::api::{build_scoreboard, build_timeline};
use livematch_engine::domain::{Official, OfficialRole, Participant, Sport, TeamSide};
use livematch_engine::engine::discipline::CautionKind;
use livematch_engine::engine::roster::TeamRoster;
use livematch_engine::infra::{InMemoryEventStore, InMemorySnapshotStore};
use livematch_engine::session::{LiveMatchSession, SessionPorts};
use livematch_engine::time_ctrl::SystemTimeSource;

fn numbered(id: u64, team: u64, name: &str, number: u8) -> Participant {
    let mut p = Participant::new(id, team, name);
    p.shirt_number = Some(number);
    p
}

fn main() {
    println!("livematch_dev_cli: стартуем сценарный прогон движка…");

    let mut store = InMemorySnapshotStore::new();
    let mut sink = InMemoryEventStore::new();
    let time = SystemTimeSource;

    println!();
    println!("================ FOOTBALL ================");

    let home = TeamRoster::with_entries(
        10,
        TeamSide::Home,
        vec![
            numbered(1, 10, "Иванов", 1),
            numbered(2, 10, "Петров", 7),
            numbered(3, 10, "Сидоров", 9),
        ],
    );
    let away = TeamRoster::with_entries(
        20,
        TeamSide::Away,
        vec![numbered(4, 20, "Смирнов", 5), numbered(5, 20, "Кузнецов", 11)],
    );

    let mut session = LiveMatchSession::new(1, Sport::Football, home, away);
    let mut ports = SessionPorts {
        store: &mut store,
        sink: &mut sink,
        time: &time,
    };

    let officials = vec![Official {
        id: 100,
        name: "Главный судья".into(),
        role: OfficialRole::Referee,
    }];

    session
        .start(officials, &[1, 2], &[4, 5], &mut ports)
        .expect("старт матча");

    // Десять игровых минут первого тайма.
    for _ in 0..600 {
        session.tick(&mut ports);
    }
    session
        .substitute(TeamSide::Home, 2, 3, None, &mut ports)
        .expect("замена");
    session
        .record_goal(TeamSide::Home, 3, &mut ports)
        .expect("гол");
    session
        .record_card(TeamSide::Away, 5, CautionKind::Yellow, &mut ports)
        .expect("жёлтая");

    session.advance_phase(&mut ports).expect("перерыв");
    session.advance_phase(&mut ports).expect("второй тайм");

    session
        .record_card(TeamSide::Away, 5, CautionKind::Yellow, &mut ports)
        .expect("вторая жёлтая");

    let board = build_scoreboard(&session);
    println!("табло: {}:{} (фаза {:?})", board.home, board.away, board.phase);

    println!("протокол:");
    for e in build_timeline(&session) {
        println!(
            "  #{} [{}-й отрезок, {}'] {:?} — {:?}",
            e.index, e.segment, e.minute, e.team, e.kind
        );
    }

    let result = session.advance_phase(&mut ports).expect("финальный свисток");
    println!("фаза после свистка: {:?}", result);

    println!();
    println!("================ VOLLEYBALL ================");

    let home = TeamRoster::with_entries(30, TeamSide::Home, vec![numbered(6, 30, "Волков", 2)]);
    let away = TeamRoster::with_entries(40, TeamSide::Away, vec![numbered(7, 40, "Зайцев", 3)]);

    let mut session = LiveMatchSession::new(2, Sport::Volleyball, home, away);
    let mut ports = SessionPorts {
        store: &mut store,
        sink: &mut sink,
        time: &time,
    };

    session.start(Vec::new(), &[6], &[7], &mut ports).expect("старт");

    for _ in 0..5 {
        session.record_point(TeamSide::Home, None, &mut ports).unwrap();
    }
    for _ in 0..3 {
        session.record_point(TeamSide::Away, None, &mut ports).unwrap();
    }
    session.close_set(false, &mut ports).expect("закрытие партии");

    let board = build_scoreboard(&session);
    println!(
        "табло: партия {}, очки {}:{}, по партиям {}:{}",
        board.phase.segment_index(),
        board.home,
        board.away,
        board.home_sets,
        board.away_sets
    );

    let result = session.finish(&mut ports);
    println!(
        "итог матча {}: {}:{} по партиям",
        result.match_id, result.home_score, result.away_score
    );
}
