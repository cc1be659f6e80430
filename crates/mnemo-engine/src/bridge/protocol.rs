//! Shared buffer layout.
//! Must stay in sync with the page's `protocol.ts`.
//!
//! Layout (all values in f32 / 4 bytes):
//! ```text
//! [Header: 16 floats]
//! [Cells: max_cells × 8 floats]
//! [Sounds: max_sounds × 1 float]
//! [Events: max_events × 4 floats]
//! ```
//!
//! Capacities are written once into the header at init.
//! The page reads them from the header to compute offsets dynamically.

use crate::api::game::GameConfig;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_PROTOCOL_VERSION: usize = 2;
pub const HEADER_WORLD_WIDTH: usize = 3;
pub const HEADER_WORLD_HEIGHT: usize = 4;
pub const HEADER_GRID_ROWS: usize = 5;
pub const HEADER_GRID_COLS: usize = 6;
pub const HEADER_MAX_CELLS: usize = 7;
pub const HEADER_CELL_COUNT: usize = 8;
pub const HEADER_MAX_SOUNDS: usize = 9;
pub const HEADER_SOUND_COUNT: usize = 10;
pub const HEADER_MAX_EVENTS: usize = 11;
pub const HEADER_EVENT_COUNT: usize = 12;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per cell instance (wire format — never changes).
pub const CELL_FLOATS: usize = 8;

/// Floats per game event: kind, a, b, c (wire format — never changes).
pub const EVENT_FLOATS: usize = 4;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_cells: usize,
    pub max_sounds: usize,
    pub max_events: usize,

    /// Size of cell data section in floats.
    pub cell_data_floats: usize,
    /// Size of sound data section in floats.
    pub sound_data_floats: usize,
    /// Size of event data section in floats.
    pub event_data_floats: usize,

    /// Offset (in floats) where cell data begins.
    pub cell_data_offset: usize,
    /// Offset (in floats) where sound data begins.
    pub sound_data_offset: usize,
    /// Offset (in floats) where event data begins.
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_cells: usize, max_sounds: usize, max_events: usize) -> Self {
        let cell_data_floats = max_cells * CELL_FLOATS;
        let sound_data_floats = max_sounds;
        let event_data_floats = max_events * EVENT_FLOATS;

        let cell_data_offset = HEADER_FLOATS;
        let sound_data_offset = cell_data_offset + cell_data_floats;
        let event_data_offset = sound_data_offset + sound_data_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;

        Self {
            max_cells,
            max_sounds,
            max_events,
            cell_data_floats,
            sound_data_floats,
            event_data_floats,
            cell_data_offset,
            sound_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Compute layout from a GameConfig.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.max_cells, config.max_sounds, config.max_events)
    }

    /// Header values known at init (capacities, version, world size).
    pub fn header(&self, config: &GameConfig) -> [f32; HEADER_FLOATS] {
        let mut header = [0.0; HEADER_FLOATS];
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_WORLD_WIDTH] = config.world_width;
        header[HEADER_WORLD_HEIGHT] = config.world_height;
        header[HEADER_GRID_ROWS] = config.grid_rows as f32;
        header[HEADER_GRID_COLS] = config.grid_cols as f32;
        header[HEADER_MAX_CELLS] = self.max_cells as f32;
        header[HEADER_MAX_SOUNDS] = self.max_sounds as f32;
        header[HEADER_MAX_EVENTS] = self.max_events as f32;
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_default_config() {
        let layout = ProtocolLayout::from_config(&GameConfig::default());

        assert_eq!(layout.max_cells, 1024);
        assert_eq!(layout.cell_data_floats, 1024 * 8);
        assert_eq!(layout.sound_data_floats, 32);
        assert_eq!(layout.event_data_floats, 32 * 4);
        assert_eq!(layout.cell_data_offset, HEADER_FLOATS);
        assert_eq!(layout.buffer_total_floats, 16 + 1024 * 8 + 32 + 32 * 4);
        assert_eq!(layout.buffer_total_bytes, layout.buffer_total_floats * 4);
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = ProtocolLayout::new(100, 10, 20);

        assert_eq!(layout.sound_data_offset, layout.cell_data_offset + layout.cell_data_floats);
        assert_eq!(layout.event_data_offset, layout.sound_data_offset + layout.sound_data_floats);
        assert_eq!(layout.buffer_total_floats, layout.event_data_offset + layout.event_data_floats);
    }

    #[test]
    fn header_carries_capacities() {
        let config = GameConfig::default();
        let layout = ProtocolLayout::from_config(&config);
        let header = layout.header(&config);

        assert_eq!(header[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(header[HEADER_MAX_CELLS], 1024.0);
        assert_eq!(header[HEADER_GRID_ROWS], 3.0);
        assert_eq!(header[HEADER_WORLD_WIDTH], 800.0);
        assert_eq!(header[HEADER_CELL_COUNT], 0.0);
    }
}
