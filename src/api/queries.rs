use serde::{Deserialize, Serialize};

use crate::domain::{Participant, ScoreBoard, TeamSide};
use crate::engine::roster::TeamRoster;
use crate::session::session::LiveMatchSession;

use super::dto::{ClockDto, MatchEventDto, ParticipantDto, RosterViewDto, ScoreboardDto};

/// Запросы "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Query {
    /// Табло матча.
    GetScoreboard,

    /// Состав команды.
    GetRoster { side: TeamSide },

    /// Лента событий (протокол).
    GetTimeline,

    /// Таймер.
    GetClock,
}

/// Результат запроса "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum QueryResponse {
    Scoreboard(ScoreboardDto),
    Roster(RosterViewDto),
    Timeline(Vec<MatchEventDto>),
    Clock(ClockDto),
}

/// Выполнить запрос. Все проекции выводятся из агрегата,
/// отдельно ничего не хранится.
pub fn run_query(session: &LiveMatchSession, query: Query) -> QueryResponse {
    match query {
        Query::GetScoreboard => QueryResponse::Scoreboard(build_scoreboard(session)),
        Query::GetRoster { side } => QueryResponse::Roster(build_roster_view(session.roster(side))),
        Query::GetTimeline => QueryResponse::Timeline(build_timeline(session)),
        Query::GetClock => QueryResponse::Clock(build_clock(session)),
    }
}

/// Табло из агрегата: для футбола голы и минута,
/// для волейбола очки открытой партии + счёт по партиям + подача.
pub fn build_scoreboard(session: &LiveMatchSession) -> ScoreboardDto {
    let (home, away, home_sets, away_sets, serving) = match &session.score {
        ScoreBoard::Football(score) => (
            score.goals(TeamSide::Home),
            score.goals(TeamSide::Away),
            0,
            0,
            None,
        ),
        ScoreBoard::Volleyball(score) => (
            score.current.home as u32,
            score.current.away as u32,
            score.sets_won(TeamSide::Home),
            score.sets_won(TeamSide::Away),
            score.serving,
        ),
    };

    ScoreboardDto {
        match_id: session.match_id,
        sport: session.sport,
        phase: session.phase.current,
        home,
        away,
        home_sets,
        away_sets,
        serving,
        minute: display_minute(session.clock.segment_elapsed),
    }
}

pub fn build_roster_view(roster: &TeamRoster) -> RosterViewDto {
    RosterViewDto {
        team_id: roster.team_id,
        side: roster.side,
        on_field: roster
            .players_on_field()
            .into_iter()
            .map(participant_dto)
            .collect(),
        bench: roster
            .players_on_bench()
            .into_iter()
            .map(participant_dto)
            .collect(),
        sent_off: roster
            .players_sent_off()
            .into_iter()
            .map(participant_dto)
            .collect(),
    }
}

pub fn build_timeline(session: &LiveMatchSession) -> Vec<MatchEventDto> {
    session
        .log
        .events
        .iter()
        .map(|e| MatchEventDto {
            index: e.index,
            team: e.team,
            segment: e.segment,
            minute: display_minute(e.elapsed_secs),
            kind: e.kind.clone(),
        })
        .collect()
}

pub fn build_clock(session: &LiveMatchSession) -> ClockDto {
    ClockDto {
        total_elapsed: session.clock.total_elapsed,
        segment_elapsed: session.clock.segment_elapsed,
        running: session.clock.running,
        minute: display_minute(session.clock.segment_elapsed),
    }
}

fn participant_dto(p: &Participant) -> ParticipantDto {
    ParticipantDto {
        id: p.id,
        display_name: p.display_name.clone(),
        shirt_number: p.shirt_number,
        is_starter: p.is_starter,
        yellow_cards: p.yellow_cards,
        has_red_card: p.has_red_card,
        is_suspended: p.is_suspended,
    }
}

/// Отображаемая минута: 0 секунд — "1-я минута" не показывается,
/// 1..=60 — минута 1 и так далее.
fn display_minute(elapsed_secs: u32) -> u32 {
    elapsed_secs.div_ceil(60)
}
