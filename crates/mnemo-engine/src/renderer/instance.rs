use bytemuck::{Pod, Zeroable};

/// Per-cell render data written to the shared buffer for the page renderer.
/// Must match the page protocol: 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct CellInstance {
    /// X centre in world space.
    pub x: f32,
    /// Y centre in world space.
    pub y: f32,
    /// Rendered side length in world units.
    pub size: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// 0.0 for neutral cells (transparent), 1.0 when tinted.
    pub alpha: f32,
    /// Row-major cell index, so the page can map clicks back without geometry.
    pub cell: f32,
}

impl CellInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Flat buffer of cell instances, rebuilt every frame.
#[derive(Debug)]
pub struct CellBuffer {
    pub instances: Vec<CellInstance>,
}

impl CellBuffer {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn push(&mut self, instance: CellInstance) {
        self.instances.push(instance);
    }

    pub fn cell_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer to instance data for shared-buffer reads.
    pub fn cells_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for CellBuffer {
    fn default() -> Self {
        Self::new()
    }
}
