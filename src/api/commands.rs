use serde::{Deserialize, Serialize};

use crate::domain::{MatchId, Official, Participant, ParticipantId, TeamSide};
use crate::engine::discipline::CautionKind;
use crate::engine::phase::PhaseState;
use crate::infra::persistence::NumberAssigner;
use crate::session::session::{Applied, FinalResult, LiveMatchSession, SessionPorts};

use super::errors::ApiError;

/// Команда верхнего уровня — один пользовательский жест на экране матча.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Command {
    /// Старт матча: судейская бригада + стартовые составы.
    StartMatch(StartMatchCommand),

    /// Гол (футбол).
    RecordGoal(RecordGoalCommand),

    /// Очко в партии (волейбол).
    RecordPoint(RecordPointCommand),

    /// Карточка участнику.
    RecordCard(RecordCardCommand),

    /// Отмена события карточки.
    RemoveCaution { match_id: MatchId, event_index: u32 },

    /// Замена.
    Substitute(SubstituteCommand),

    /// Поздняя дозаявка.
    AddParticipant(AddParticipantCommand),

    /// Назначить игровой номер (через внешнюю систему).
    AssignNumber(AssignNumberCommand),

    /// Следующая фаза футбольного матча.
    AdvancePhase { match_id: MatchId },

    /// Закрыть партию (волейбол).
    CloseSet {
        match_id: MatchId,
        /// Выполнено ли условие победы в матче (решается снаружи движка).
        match_finished: bool,
    },

    /// Завершить матч.
    Finish { match_id: MatchId },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StartMatchCommand {
    pub match_id: MatchId,
    pub officials: Vec<Official>,
    pub home_starters: Vec<ParticipantId>,
    pub away_starters: Vec<ParticipantId>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordGoalCommand {
    pub match_id: MatchId,
    pub side: TeamSide,
    pub scorer: ParticipantId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordPointCommand {
    pub match_id: MatchId,
    pub side: TeamSide,
    pub scorer: Option<ParticipantId>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordCardCommand {
    pub match_id: MatchId,
    pub side: TeamSide,
    pub participant: ParticipantId,
    pub kind: CautionKind,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubstituteCommand {
    pub match_id: MatchId,
    pub side: TeamSide,
    pub player_out: ParticipantId,
    pub player_in: ParticipantId,
    /// Запись для игрока, которого ещё нет в заявке.
    pub late_entry: Option<Participant>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AddParticipantCommand {
    pub match_id: MatchId,
    pub side: TeamSide,
    pub entry: Participant,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssignNumberCommand {
    pub match_id: MatchId,
    pub side: TeamSide,
    pub participant: ParticipantId,
    pub number: u8,
}

/// Результат выполнения команды.
#[derive(Clone, Debug)]
pub enum CommandOutcome {
    /// Состояние изменено, записаны события (возможно, ни одного).
    Applied(Applied),
    /// Фаза переключена.
    Phase(PhaseState),
    /// Матч финализирован.
    Finished(FinalResult),
    /// Изменение без событий (дозаявка, номер, отмена карточки).
    Done,
}

/// Применить команду к сессии.
///
/// `match_id` команды обязан совпадать с сессией — защита от жеста,
/// прилетевшего в чужой открытый экран.
pub fn apply_command(
    session: &mut LiveMatchSession,
    ports: &mut SessionPorts,
    assigner: &mut dyn NumberAssigner,
    command: Command,
) -> Result<CommandOutcome, ApiError> {
    let match_id = command_match_id(&command);
    if match_id != session.match_id {
        return Err(ApiError::BadRequest(format!(
            "команда адресована матчу {}, открыт матч {}",
            match_id, session.match_id
        )));
    }

    match command {
        Command::StartMatch(cmd) => {
            session.start(cmd.officials, &cmd.home_starters, &cmd.away_starters, ports)?;
            Ok(CommandOutcome::Done)
        }
        Command::RecordGoal(cmd) => {
            let applied = session.record_goal(cmd.side, cmd.scorer, ports)?;
            Ok(CommandOutcome::Applied(applied))
        }
        Command::RecordPoint(cmd) => {
            let applied = session.record_point(cmd.side, cmd.scorer, ports)?;
            Ok(CommandOutcome::Applied(applied))
        }
        Command::RecordCard(cmd) => {
            let applied = session.record_card(cmd.side, cmd.participant, cmd.kind, ports)?;
            Ok(CommandOutcome::Applied(applied))
        }
        Command::RemoveCaution { event_index, .. } => {
            session.remove_caution(event_index, ports)?;
            Ok(CommandOutcome::Done)
        }
        Command::Substitute(cmd) => {
            let applied =
                session.substitute(cmd.side, cmd.player_out, cmd.player_in, cmd.late_entry, ports)?;
            Ok(CommandOutcome::Applied(applied))
        }
        Command::AddParticipant(cmd) => {
            session.add_participant(cmd.side, cmd.entry, ports)?;
            Ok(CommandOutcome::Done)
        }
        Command::AssignNumber(cmd) => {
            session.assign_number(cmd.side, cmd.participant, cmd.number, assigner, ports)?;
            Ok(CommandOutcome::Done)
        }
        Command::AdvancePhase { .. } => {
            let phase = session.advance_phase(ports)?;
            Ok(CommandOutcome::Phase(phase))
        }
        Command::CloseSet { match_finished, .. } => {
            let applied = session.close_set(match_finished, ports)?;
            Ok(CommandOutcome::Applied(applied))
        }
        Command::Finish { .. } => {
            let result = session.finish(ports);
            Ok(CommandOutcome::Finished(result))
        }
    }
}

fn command_match_id(command: &Command) -> MatchId {
    match command {
        Command::StartMatch(c) => c.match_id,
        Command::RecordGoal(c) => c.match_id,
        Command::RecordPoint(c) => c.match_id,
        Command::RecordCard(c) => c.match_id,
        Command::RemoveCaution { match_id, .. } => *match_id,
        Command::Substitute(c) => c.match_id,
        Command::AddParticipant(c) => c.match_id,
        Command::AssignNumber(c) => c.match_id,
        Command::AdvancePhase { match_id } => *match_id,
        Command::CloseSet { match_id, .. } => *match_id,
        Command::Finish { match_id } => *match_id,
    }
}
