//! Правила live-матча: дисциплина, составы, фазы, реконструкция.
//!
//! Основные объекты:
//!   - `discipline::apply_caution` / `revert_caution` — карточки и авто-эскалация;
//!   - `TeamRoster` — состав команды (площадка / скамейка / удалённые);
//!   - `PhaseMachine` — жизненный цикл матча по виду спорта;
//!   - `replay::replay` — восстановление снимка по журналу событий.

pub mod discipline;
pub mod errors;
pub mod phase;
pub mod replay;
pub mod roster;

pub use discipline::{apply_caution, revert_caution, CautionDraft, CautionKind, CautionOutcome};
pub use errors::{ReplayError, SessionError, SubmissionError, ValidationError};
pub use phase::{PhaseMachine, PhaseState};
pub use replay::replay;
pub use roster::TeamRoster;
