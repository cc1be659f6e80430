pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{CellId, SoundEvent, GameEvent};
pub use components::grid::{Grid, GridLayout};
pub use crate::core::time::FixedTimestep;
pub use crate::core::timer::Timers;
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::instance::{CellInstance, CellBuffer};
pub use systems::render::build_cell_buffer;
pub use systems::palette::{Colour, Palette, Tint};
pub use systems::rng::Rng;
pub use bridge::protocol::ProtocolLayout;
