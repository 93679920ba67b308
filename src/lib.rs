//! Движок ведения live-матча для турнирной системы.
//!
//! Ядро экрана "ведение матча": оператор (судья/секретарь) фиксирует события
//! в реальном времени, движок держит фазу матча, таймер, составы, дисциплину
//! и журнал событий. CRUD турниров/команд и транспорт хранения — снаружи,
//! сюда они заходят только через порты в `infra`.
//!
//! Слои:
//! - `domain` — данные: участники, события, счёт;
//! - `engine` — правила: дисциплина, составы, фазы, реплей журнала;
//! - `time_ctrl` — таймер матча и источник времени;
//! - `session` — агрегат `LiveMatchSession` и его снимки;
//! - `infra` — порты внешних систем + in-memory реализации;
//! - `api` — команды/запросы/DTO для фронта.

pub mod api;
pub mod domain;
pub mod engine;
pub mod infra;
pub mod session;
pub mod time_ctrl;

pub use domain::{MatchId, ParticipantId, Sport, TeamId, TeamSide};
pub use engine::{ReplayError, SessionError, SubmissionError, ValidationError};
pub use session::{LiveMatchSession, SessionPorts, SessionSnapshot};
