// src/time_ctrl/clock.rs
//! Таймер матча: игровое время отрезка и матча целиком.

use serde::{Deserialize, Serialize};

/// Состояние таймера матча.
///
/// Пока `running == true`, оба счётчика растут на секунду за каждый `tick()`.
/// Секундную периодичность обеспечивает вызывающая сторона (повторяющийся
/// колбэк, который гасится вне активной фазы и при закрытии экрана).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchClock {
    /// Игровое время всего матча, секунды.
    pub total_elapsed: u32,
    /// Игровое время текущего отрезка, секунды.
    pub segment_elapsed: u32,
    pub running: bool,
}

impl MatchClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Старт отрезка.
    ///
    /// Первый отрезок обнуляет оба счётчика; последующие — только
    /// счётчик отрезка (время матча накапливается сквозь перерывы).
    pub fn start_segment(&mut self, segment: u8) {
        if segment <= 1 {
            self.total_elapsed = 0;
        }
        self.segment_elapsed = 0;
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        self.running = true;
    }

    /// Одна секунда игрового времени. Возвращает время отрезка.
    pub fn tick(&mut self) -> u32 {
        if self.running {
            self.total_elapsed += 1;
            self.segment_elapsed += 1;
        }
        self.segment_elapsed
    }

    /// Полный сброс (стоп + нули).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Коррекция после восстановления снимка.
    ///
    /// Если на момент сохранения таймер шёл, время, реально прошедшее при
    /// закрытом экране, засчитывается: `counter += now - saved_at`.
    /// Если таймер стоял (пауза, перерыв) — коррекции нет.
    /// При `now < saved_at` (перевод часов) коррекция нулевая, не отрицательная.
    pub fn credit_gap(&mut self, saved_at: i64, now: i64) {
        if !self.running {
            return;
        }
        let gap = now.saturating_sub(saved_at).clamp(0, u32::MAX as i64) as u32;
        self.total_elapsed = self.total_elapsed.saturating_add(gap);
        self.segment_elapsed = self.segment_elapsed.saturating_add(gap);
    }
}
