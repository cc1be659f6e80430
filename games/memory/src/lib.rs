use wasm_bindgen::prelude::*;
use mnemo_engine::*;

pub mod game;
pub mod score;
pub mod sequence;
pub mod settings;
use game::MemoryGame;

mnemo_web::export_game!(MemoryGame, "memory");
