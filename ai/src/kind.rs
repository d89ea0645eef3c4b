use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AiPlayer, ExpertAi, GreedyAi, HeuristicAi, RandomAi, SearchBudget};

/// Named strategy, for configuration files and command lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiKind {
    Random,
    Greedy,
    #[default]
    Heuristic,
    Expert,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown AI kind {0:?} (expected random, greedy, heuristic or expert)")]
pub struct UnknownAiKind(pub String);

impl AiKind {
    pub const ALL: [AiKind; 4] = [AiKind::Random, AiKind::Greedy, AiKind::Heuristic, AiKind::Expert];

    pub fn as_str(&self) -> &'static str {
        match self {
            AiKind::Random => "random",
            AiKind::Greedy => "greedy",
            AiKind::Heuristic => "heuristic",
            AiKind::Expert => "expert",
        }
    }

    /// Whether the same inputs always produce the same decision
    pub fn is_deterministic(&self) -> bool {
        matches!(self, AiKind::Greedy | AiKind::Heuristic)
    }

    /// Instantiate the strategy; `seed` fixes the randomised ones
    pub fn build(&self, seed: Option<u64>) -> Box<dyn AiPlayer> {
        match (self, seed) {
            (AiKind::Random, Some(seed)) => Box::new(RandomAi::with_seed(seed)),
            (AiKind::Random, None) => Box::new(RandomAi::new()),
            (AiKind::Greedy, _) => Box::new(GreedyAi::new()),
            (AiKind::Heuristic, _) => Box::new(HeuristicAi::new()),
            (AiKind::Expert, Some(seed)) => Box::new(ExpertAi::with_seed(SearchBudget::default(), seed)),
            (AiKind::Expert, None) => Box::new(ExpertAi::default()),
        }
    }
}

impl FromStr for AiKind {
    type Err = UnknownAiKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        AiKind::ALL
            .into_iter()
            .find(|k| k.as_str() == lower)
            .ok_or_else(|| UnknownAiKind(s.to_string()))
    }
}

impl std::fmt::Display for AiKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
