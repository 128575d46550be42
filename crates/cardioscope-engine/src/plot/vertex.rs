use bytemuck::{Pod, Zeroable};

/// Minor gridline color.
pub const GRID_MINOR: [f32; 3] = [0.69, 0.4, 0.35];
/// Color of every 5th gridline (0-indexed).
pub const GRID_HIGHLIGHT: [f32; 3] = [1.0, 0.0, 0.0];
/// Waveform trace color.
pub const TRACE_COLOR: [f32; 3] = [0.0, 0.0, 0.0];

/// One line-list vertex: NDC position plus linear RGB color.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 2],
    pub color: [f32; 3],
}

impl LineVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x3];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// CPU-side vertex list for one `LineList` draw.
///
/// Vertices come in pairs; each pair is an independent segment. The GPU byte
/// size is always derived from the vertex count, so the buffer length and the
/// declared size cannot disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryBuffer {
    pub label: &'static str,
    pub vertices: Vec<LineVertex>,
}

impl GeometryBuffer {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            vertices: Vec::new(),
        }
    }

    pub fn with_capacity(label: &'static str, vertices: usize) -> Self {
        Self {
            label,
            vertices: Vec::with_capacity(vertices),
        }
    }

    /// Appends one 2-point segment sharing `color`.
    pub fn push_segment(&mut self, a: [f32; 2], b: [f32; 2], color: [f32; 3]) {
        self.vertices.push(LineVertex { position: a, color });
        self.vertices.push(LineVertex { position: b, color });
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Exact GPU upload size.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.vertices.len() * std::mem::size_of::<LineVertex>()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_len_tracks_vertex_count() {
        let mut buffer = GeometryBuffer::new("test");
        assert_eq!(buffer.byte_len(), 0);
        buffer.push_segment([0.0, -1.0], [0.0, 1.0], GRID_MINOR);
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.byte_len(), 2 * std::mem::size_of::<LineVertex>());
        assert_eq!(buffer.as_bytes().len(), buffer.byte_len());
    }

    #[test]
    fn empty_buffer_is_a_valid_zero_length_draw() {
        let buffer = GeometryBuffer::new("empty");
        assert!(buffer.is_empty());
        assert!(buffer.as_bytes().is_empty());
    }
}
