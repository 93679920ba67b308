//! Инъецируемый источник wall-clock времени.
//!
//! Движок нигде не читает системные часы напрямую — так реплей и тесты
//! остаются детерминированными (тот же приём, что инъекция RNG).

use chrono::Utc;

/// Источник текущего времени в unix-секундах.
pub trait TimeSource {
    fn now_unix(&self) -> i64;
}

/// Боевая реализация поверх системных часов.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_unix(&self) -> i64 {
        Utc::now().timestamp()
    }
}
