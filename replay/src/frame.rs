use arena_battle::{BattleLogEntry, BattleState, Winner};

/// The battle as it stood at the end of one turn
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Position in the frame list
    pub index: usize,
    /// 0 for the lead-in before the first turn
    pub turn: u32,
    pub state: BattleState,
    /// Entries produced while this turn played out
    pub log: Vec<BattleLogEntry>,
    /// Side 1's chance of winning, if annotated
    pub win_probability: Option<f32>,
}

impl Frame {
    pub fn winner(&self) -> Option<Winner> {
        self.state.winner
    }

    pub fn is_final(&self) -> bool {
        self.state.is_ended()
    }
}
