mod component;
mod render;
mod state;
mod types;

pub use component::AbilityMatrixView;
pub use types::{Ability, CharacterRecord};
