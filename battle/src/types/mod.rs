//! Domain types for battle state

mod conditions;
mod field;
mod pokemon;
mod pokemon_type;
mod side;
mod stats;
mod status;

pub use conditions::{SideCondition, Terrain, Weather};
pub use field::FieldState;
pub use pokemon::PokemonState;
pub use pokemon_type::{TYPE_CHART, Type, type_effectiveness};
pub use side::SideState;
pub use stats::{StatStages, StatTable};
pub use status::{Status, Volatile};
