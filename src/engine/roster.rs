//! Состав команды на матч: стартовый состав, скамейка, замены,
//! поздние дозаявки.

use serde::{Deserialize, Serialize};

use crate::domain::{Participant, ParticipantId, TeamId, TeamSide};
use crate::engine::discipline::{self, CautionDraft, CautionKind};
use crate::engine::errors::ValidationError;

/// Состав одной команды.
///
/// Инвариант: множества "на площадке" и "на скамейке" не пересекаются;
/// удалённый участник не входит ни в одно из них.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamRoster {
    pub team_id: TeamId,
    pub side: TeamSide,
    pub entries: Vec<Participant>,
}

impl TeamRoster {
    pub fn new(team_id: TeamId, side: TeamSide) -> Self {
        Self {
            team_id,
            side,
            entries: Vec::new(),
        }
    }

    /// Состав из готового списка заявки (источник — RosterSource).
    pub fn with_entries(team_id: TeamId, side: TeamSide, entries: Vec<Participant>) -> Self {
        Self {
            team_id,
            side,
            entries,
        }
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        self.entries.iter().any(|p| p.id == id)
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.entries.iter().find(|p| p.id == id)
    }

    pub fn participant_mut(&mut self, id: ParticipantId) -> Option<&mut Participant> {
        self.entries.iter_mut().find(|p| p.id == id)
    }

    /// Отметить участника как игрока стартового состава и вывести на площадку.
    ///
    /// Дисквалифицированных не пускаем; без игрового номера операция
    /// отклоняется — номер назначается во внешней системе, после чего
    /// вызов повторяется.
    pub fn mark_starter(&mut self, id: ParticipantId) -> Result<(), ValidationError> {
        let p = self
            .participant_mut(id)
            .ok_or(ValidationError::UnknownParticipant(id))?;

        if p.is_suspended {
            return Err(ValidationError::SuspendedParticipant(id));
        }
        if p.shirt_number.is_none() {
            return Err(ValidationError::MissingShirtNumber(id));
        }

        p.is_starter = true;
        p.on_field = true;
        Ok(())
    }

    /// Поздняя дозаявка: игрок не из исходного списка.
    /// Входит как кандидат на скамейку, на площадку — только через замену.
    pub fn add_participant(&mut self, mut entry: Participant) {
        if self.contains(entry.id) {
            return;
        }
        entry.is_starter = false;
        entry.on_field = false;
        self.entries.push(entry);
    }

    /// Замена: `out_id` уходит с площадки, `in_id` выходит.
    ///
    /// Повторный выход ранее заменённого игрока разрешён — правила
    /// "одноразовой" замены здесь нет.
    pub fn substitute(
        &mut self,
        out_id: ParticipantId,
        in_id: ParticipantId,
    ) -> Result<(), ValidationError> {
        let outgoing = self
            .participant(out_id)
            .ok_or(ValidationError::UnknownParticipant(out_id))?;
        if outgoing.has_red_card {
            return Err(ValidationError::SentOffParticipant(out_id));
        }
        if !outgoing.on_field {
            return Err(ValidationError::UnknownParticipant(out_id));
        }

        let incoming = self
            .participant(in_id)
            .ok_or(ValidationError::UnknownParticipant(in_id))?;
        if incoming.has_red_card {
            return Err(ValidationError::SentOffParticipant(in_id));
        }
        if incoming.is_suspended {
            return Err(ValidationError::SuspendedParticipant(in_id));
        }

        // Обе проверки прошли — мутируем.
        if let Some(p) = self.participant_mut(out_id) {
            p.on_field = false;
        }
        if let Some(p) = self.participant_mut(in_id) {
            p.on_field = true;
        }
        Ok(())
    }

    /// Применить карточку участнику через дисциплинарные правила.
    /// Возвращает черновики событий для журнала.
    pub fn apply_caution_to(
        &mut self,
        id: ParticipantId,
        kind: CautionKind,
    ) -> Result<Vec<CautionDraft>, ValidationError> {
        let p = self
            .participant(id)
            .ok_or(ValidationError::UnknownParticipant(id))?;

        let outcome = discipline::apply_caution(p, kind)?;
        let drafts = outcome.emitted.clone();
        if let Some(slot) = self.participant_mut(id) {
            *slot = outcome.updated;
        }
        Ok(drafts)
    }

    /// Отменить одно событие карточки участнику.
    pub fn revert_caution_to(
        &mut self,
        id: ParticipantId,
        draft: &CautionDraft,
    ) -> Result<(), ValidationError> {
        let p = self
            .participant(id)
            .ok_or(ValidationError::UnknownParticipant(id))?;
        let updated = discipline::revert_caution(p, draft);
        if let Some(slot) = self.participant_mut(id) {
            *slot = updated;
        }
        Ok(())
    }

    /// Игроки на площадке.
    pub fn players_on_field(&self) -> Vec<&Participant> {
        self.entries.iter().filter(|p| p.on_field).collect()
    }

    /// Игроки на скамейке (не на площадке, не удалены, не дисквалифицированы).
    pub fn players_on_bench(&self) -> Vec<&Participant> {
        self.entries
            .iter()
            .filter(|p| p.is_bench_eligible())
            .collect()
    }

    /// Удалённые игроки.
    pub fn players_sent_off(&self) -> Vec<&Participant> {
        self.entries.iter().filter(|p| p.has_red_card).collect()
    }

    /// Сколько игроков стартового состава заявлено.
    pub fn starter_count(&self) -> usize {
        self.entries.iter().filter(|p| p.is_starter).count()
    }
}
