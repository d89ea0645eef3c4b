//! Team input in whichever format the caller has

use serde::{Deserialize, Serialize};

use crate::error::TeamError;
use crate::packed::{pack_team, unpack_team};
use crate::paste::{parse_paste, team_to_showdown_paste};
use crate::slot::TeamSlotData;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", content = "team", rename_all = "lowercase")]
pub enum TeamInput {
    /// Engine packed format
    Packed(String),
    /// Human paste format
    Paste(String),
    Slots(Vec<TeamSlotData>),
}

impl TeamInput {
    /// Guess the format of a team string
    ///
    /// Single-line text containing `|` is taken to be packed.
    pub fn detect(text: &str) -> Self {
        let trimmed = text.trim();
        if !trimmed.contains('\n') && trimmed.contains('|') {
            TeamInput::Packed(trimmed.to_string())
        } else {
            TeamInput::Paste(text.to_string())
        }
    }

    /// Decoded team members
    pub fn to_slots(&self) -> Result<Vec<TeamSlotData>, TeamError> {
        match self {
            TeamInput::Packed(packed) => unpack_team(packed),
            TeamInput::Paste(paste) => Ok(parse_paste(paste)),
            TeamInput::Slots(slots) => Ok(slots.clone()),
        }
    }

    /// Validated team members; fails when nothing usable remains
    pub fn resolve(&self) -> Result<Vec<TeamSlotData>, TeamError> {
        let slots = self.to_slots().map_err(|e| TeamError::Validation(e.to_string()))?;
        if slots.is_empty() {
            return Err(TeamError::Validation(
                "team contains no pokemon".to_string(),
            ));
        }
        for slot in &slots {
            slot.validate()?;
        }
        Ok(slots)
    }

    /// Packed string for the engine
    pub fn to_packed(&self) -> Result<String, TeamError> {
        let slots = self.resolve()?;
        match self {
            TeamInput::Packed(packed) => Ok(packed.trim().to_string()),
            _ => Ok(pack_team(&slots)),
        }
    }

    pub fn to_paste(&self) -> Result<String, TeamError> {
        Ok(team_to_showdown_paste(&self.resolve()?))
    }

    /// Display names of the members, in order
    pub fn names(&self) -> Result<Vec<String>, TeamError> {
        Ok(self.resolve()?.iter().map(TeamSlotData::display_name).collect())
    }
}

impl From<Vec<TeamSlotData>> for TeamInput {
    fn from(slots: Vec<TeamSlotData>) -> Self {
        TeamInput::Slots(slots)
    }
}

impl From<&str> for TeamInput {
    fn from(text: &str) -> Self {
        TeamInput::detect(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASTE: &str = "Garchomp @ Life Orb\nAbility: Rough Skin\n- Earthquake\n\nPikachu\n- Thunderbolt\n";

    #[test]
    fn test_detect() {
        assert!(matches!(TeamInput::detect(PASTE), TeamInput::Paste(_)));
        assert!(matches!(
            TeamInput::detect("Pikachu|||static|thunderbolt|||||||"),
            TeamInput::Packed(_)
        ));
        assert!(matches!(TeamInput::detect("Pikachu"), TeamInput::Paste(_)));
    }

    #[test]
    fn test_paste_to_packed() {
        let packed = TeamInput::from(PASTE).to_packed().unwrap();
        assert_eq!(
            packed,
            "Garchomp||lifeorb|roughskin|earthquake|||||||]Pikachu||||thunderbolt|||||||"
        );
    }

    #[test]
    fn test_empty_team_is_validation_error() {
        for input in [
            TeamInput::Paste("   \n\n".into()),
            TeamInput::Packed(String::new()),
            TeamInput::Slots(Vec::new()),
            TeamInput::Packed("garbage".into()),
        ] {
            assert!(matches!(input.to_packed(), Err(TeamError::Validation(_))));
        }
    }

    #[test]
    fn test_invalid_member_rejected() {
        let mut slot = TeamSlotData::new("Pikachu");
        slot.level = 101;
        let input = TeamInput::from(vec![slot]);
        assert!(matches!(input.to_packed(), Err(TeamError::Validation(_))));
    }

    #[test]
    fn test_names() {
        let names = TeamInput::from(PASTE).names().unwrap();
        assert_eq!(names, vec!["Garchomp", "Pikachu"]);
    }
}
