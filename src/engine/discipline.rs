//! Дисциплинарные правила: карточки и авто-эскалация.
//!
//! Все функции чистые: берут участника по значению/ссылке и возвращают
//! обновлённую копию плюс "черновики" событий. В журнал их превращает
//! сессия (живой путь) — реплей черновики игнорирует, события уже в журнале.

use serde::{Deserialize, Serialize};

use crate::domain::Participant;
use crate::engine::errors::ValidationError;

/// Вид карточки.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum CautionKind {
    Yellow,
    Red,
}

/// Черновик события карточки (без привязки ко времени/журналу).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CautionDraft {
    pub kind: CautionKind,
    /// true — красная за вторую жёлтую, false — прямая.
    pub by_accumulation: bool,
}

/// Результат применения карточки.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CautionOutcome {
    pub updated: Participant,
    /// Черновики событий в порядке записи в журнал.
    pub emitted: Vec<CautionDraft>,
}

/// Применить карточку к участнику.
///
/// - уже удалённый ⇒ `AlreadySentOff`, состояние не меняется;
/// - жёлтая: первая даёт одно событие; вторая даёт ДВА события в порядке
///   "жёлтая, затем красная by_accumulation" и убирает игрока с площадки;
/// - прямая красная: одно событие, игрок уходит с площадки.
pub fn apply_caution(
    participant: &Participant,
    kind: CautionKind,
) -> Result<CautionOutcome, ValidationError> {
    if participant.has_red_card {
        return Err(ValidationError::AlreadySentOff(participant.id));
    }

    let mut updated = participant.clone();
    let mut emitted = Vec::new();

    match kind {
        CautionKind::Yellow => {
            updated.yellow_cards += 1;
            emitted.push(CautionDraft {
                kind: CautionKind::Yellow,
                by_accumulation: false,
            });

            if updated.yellow_cards >= 2 {
                // Вторая жёлтая ⇒ автоматическая красная.
                updated.yellow_cards = 2;
                updated.has_red_card = true;
                updated.on_field = false;
                emitted.push(CautionDraft {
                    kind: CautionKind::Red,
                    by_accumulation: true,
                });
            }
        }
        CautionKind::Red => {
            updated.has_red_card = true;
            updated.on_field = false;
            emitted.push(CautionDraft {
                kind: CautionKind::Red,
                by_accumulation: false,
            });
        }
    }

    Ok(CautionOutcome { updated, emitted })
}

/// Отменить ровно одно событие карточки.
///
/// Отмена красной by_accumulation возвращает и жёлтый счётчик к 1,
/// и игрока на площадку (событие второй жёлтой остаётся в журнале
/// и отменяется отдельно, если нужно).
pub fn revert_caution(participant: &Participant, draft: &CautionDraft) -> Participant {
    let mut updated = participant.clone();

    match draft.kind {
        CautionKind::Yellow => {
            updated.yellow_cards = updated.yellow_cards.saturating_sub(1);
        }
        CautionKind::Red => {
            updated.has_red_card = false;
            updated.on_field = true;
            if draft.by_accumulation {
                updated.yellow_cards = 1;
            }
        }
    }

    updated
}
