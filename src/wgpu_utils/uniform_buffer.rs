// src/wgpu_utils/uniform_buffer.rs
use std::num::NonZeroU64;

/// Round `size` up to the next multiple of `alignment`.
pub fn align_to(size: u64, alignment: u64) -> u64 {
    if alignment == 0 {
        return size;
    }
    size.div_ceil(alignment) * alignment
}

/// Uniform buffer holding one block per draw, addressed by dynamic offset.
///
/// The whole frame is written at once; blocks start on the device's
/// `min_uniform_buffer_offset_alignment`.
pub struct DynamicUniformBuffer {
    buffer: wgpu::Buffer,
    capacity: u64,
    alignment: u64,
}

impl DynamicUniformBuffer {
    pub fn new(device: &wgpu::Device, capacity: u64) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let capacity = align_to(capacity.max(alignment), alignment);

        Self {
            buffer: Self::create(device, capacity),
            capacity,
            alignment,
        }
    }

    fn create(device: &wgpu::Device, size: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("DynamicUniformBuffer"),
            size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn alignment(&self) -> u64 {
        self.alignment
    }

    /// Grows the buffer to hold at least `size` bytes. Returns true when the
    /// buffer was recreated, which invalidates every bind group using it.
    pub fn ensure_capacity(&mut self, device: &wgpu::Device, size: u64) -> bool {
        if size <= self.capacity {
            return false;
        }
        let capacity = align_to(size.next_power_of_two(), self.alignment);
        self.buffer = Self::create(device, capacity);
        self.capacity = capacity;
        true
    }

    pub fn write(&self, queue: &wgpu::Queue, data: &[u8]) {
        if !data.is_empty() {
            queue.write_buffer(&self.buffer, 0, data);
        }
    }

    /// Binding resource covering one block of `block_size` bytes.
    pub fn binding_resource(&self, block_size: NonZeroU64) -> wgpu::BindingResource<'_> {
        wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer: &self.buffer,
            offset: 0,
            size: Some(block_size),
        })
    }

    pub fn size(&self) -> u64 {
        self.capacity
    }
}
