//! Commands for the TEA (The Elm Architecture) pattern.
//!
//! Commands are outputs from the update function - they represent side effects
//! to be executed by the runtime.

use crate::fish::FishBlob;
use crate::food::FoodBlob;

/// Output commands from the update function.
#[derive(Debug, PartialEq)]
pub enum Command {
    // Persistence (last write wins, so each carries the whole blob)
    SaveFood(FoodBlob),
    SaveFish(FishBlob),

    // Audio feedback for a knock
    PlayTone,

    // App lifecycle
    Quit,
}
