use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ParticipantId;

/// Ошибки валидации пользовательских операций.
///
/// Все они локально восстановимы: состояние матча не портится,
/// оператор исправляет ввод и повторяет действие.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ValidationError {
    #[error("У участника {0} не назначен игровой номер")]
    MissingShirtNumber(ParticipantId),

    #[error("Участник {0} не найден в заявке / не на площадке")]
    UnknownParticipant(ParticipantId),

    #[error("Участник {0} удалён и не может участвовать в игре")]
    SentOffParticipant(ParticipantId),

    #[error("Участник {0} дисквалифицирован на этот матч")]
    SuspendedParticipant(ParticipantId),

    #[error("Матч сейчас не идёт — операция недоступна")]
    MatchNotRunning,

    #[error("Участник {0} уже удалён — карточка не применяется")]
    AlreadySentOff(ParticipantId),

    #[error("Операция не поддерживается для этого вида спорта")]
    SportMismatch,

    #[error("Счёт партии равный — закрыть партию нельзя")]
    SetNotDecided,

    #[error("Нужен хотя бы один игрок стартового состава в каждой команде")]
    EmptyLineup,

    #[error("Матч уже начался")]
    AlreadyStarted,

    #[error("Недопустимый переход фазы матча")]
    InvalidPhaseTransition,

    #[error("Событие {0} не найдено в журнале")]
    UnknownEvent(u32),

    #[error("Событие {0} не является карточкой — отменить нельзя")]
    NotRevertible(u32),
}

/// Ошибка доставки события во внешний сток.
///
/// Локальное состояние при этом остаётся применённым; автоматических
/// повторов нет — расхождение закрывает только полный реплей журнала.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
#[error("Внешний сток событий недоступен: {reason}")]
pub struct SubmissionError {
    pub reason: String,
}

/// Ошибки реконструкции по журналу.
///
/// Реконструктор падает целиком (fail closed): полуразобранный состав
/// хуже явной ошибки, требующей ручного вмешательства.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReplayError {
    #[error("Журнал ссылается на неизвестного участника {0}")]
    UnknownParticipant(ParticipantId),

    #[error("Журнал событий повреждён: {0}")]
    MalformedLog(String),

    #[error("Недопустимое событие в журнале: {0}")]
    Invalid(#[from] ValidationError),
}

/// Общая ошибка сессии матча — объединение всех слоёв.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Replay(#[from] ReplayError),

    #[error("Снимок матча {0} не найден")]
    SnapshotNotFound(u64),
}
