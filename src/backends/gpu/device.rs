//! GPU device initialization and the bitplane round trip

use tracing::{debug, info};

use super::{pci_vendor_name, runtime, shaders};
use crate::codec::{padded_bytes_per_row, Bitplane, BIT_WIDTH};
use crate::config::PowerPreference;
use crate::error::{ProbeError, Result};

/// GPU device manager
pub struct GpuDevice {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub info: wgpu::AdapterInfo,
}

impl GpuDevice {
    /// Initialize GPU device
    pub fn new(power: PowerPreference) -> Result<Self> {
        runtime::block_on(async { Self::new_async(power).await })
    }

    async fn new_async(power: PowerPreference) -> Result<Self> {
        let instance = wgpu::Instance::default();

        // Request adapter (GPU)
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: power.into(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(ProbeError::NoAdapter)?;

        let info = adapter.get_info();
        info!(
            adapter = %info.name,
            backend = ?info.backend,
            vendor = pci_vendor_name(info.vendor),
            "GPU adapter selected"
        );

        // Request device and queue
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("sinprobe device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await
            .map_err(|e| ProbeError::Device(format!("Failed to create device: {}", e)))?;

        Ok(Self { device, queue, info })
    }

    /// Check if GPU is available
    pub fn is_available() -> bool {
        runtime::block_on(async {
            let instance = wgpu::Instance::default();
            instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::HighPerformance,
                    compatible_surface: None,
                    force_fallback_adapter: false,
                })
                .await
                .is_some()
        })
    }

    /// Evaluate `sin()` over `inputs` and read back the 32×N bitplane
    ///
    /// One compute dispatch, one texture copy, one buffer map.
    pub fn sin_bitplane(&self, inputs: &[f32]) -> Result<Bitplane> {
        runtime::block_on(async { self.sin_bitplane_async(inputs).await })
    }

    async fn sin_bitplane_async(&self, inputs: &[f32]) -> Result<Bitplane> {
        let rows = inputs.len();
        let max_rows = self.device.limits().max_texture_dimension_2d as usize;

        // wgpu doesn't allow zero-sized buffers
        if rows == 0 || rows > max_rows {
            return Err(ProbeError::InvalidInput(format!(
                "battery must have 1..={} inputs, got {}",
                max_rows, rows
            )));
        }

        let shader = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Sin Bitplane Shader"),
                source: wgpu::ShaderSource::Wgsl(shaders::SIN_BITPLANE_SHADER.into()),
            });

        let input_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Battery Inputs"),
            size: std::mem::size_of_val(inputs) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        self.queue
            .write_buffer(&input_buffer, 0, bytemuck::cast_slice(inputs));

        let extent = wgpu::Extent3d {
            width: BIT_WIDTH as u32,
            height: rows as u32,
            depth_or_array_layers: 1,
        };

        // Storage textures are written texel-exact: no sampler, no filtering
        let plane_texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Bitplane"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let plane_view = plane_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group_layout =
            self.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("Sin Bitplane Bind Group Layout"),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::COMPUTE,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Storage { read_only: true },
                                has_dynamic_offset: false,
                                min_binding_size: None,
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::COMPUTE,
                            ty: wgpu::BindingType::StorageTexture {
                                access: wgpu::StorageTextureAccess::WriteOnly,
                                format: wgpu::TextureFormat::Rgba8Unorm,
                                view_dimension: wgpu::TextureViewDimension::D2,
                            },
                            count: None,
                        },
                    ],
                });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Sin Bitplane Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: input_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&plane_view),
                },
            ],
        });

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Sin Bitplane Pipeline Layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        let pipeline = self
            .device
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some("Sin Bitplane Pipeline"),
                layout: Some(&pipeline_layout),
                module: &shader,
                entry_point: "main",
                compilation_options: Default::default(),
                cache: None,
            });

        // Texture copies need 256-byte aligned rows
        let bytes_per_row = padded_bytes_per_row(BIT_WIDTH);
        let staging_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Bitplane Staging Buffer"),
            size: (bytes_per_row * rows) as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Sin Bitplane Encoder"),
            });

        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Sin Bitplane Pass"),
                timestamp_writes: None,
            });
            compute_pass.set_pipeline(&pipeline);
            compute_pass.set_bind_group(0, &bind_group, &[]);

            // One workgroup row per input, 32 invocations across
            compute_pass.dispatch_workgroups(
                (BIT_WIDTH as u32).div_ceil(shaders::WORKGROUP_WIDTH),
                rows as u32,
                1,
            );
        }

        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &plane_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &staging_buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row as u32),
                    rows_per_image: Some(rows as u32),
                },
            },
            extent,
        );

        // Submit commands
        self.queue.submit(Some(encoder.finish()));

        // Read back results
        let buffer_slice = staging_buffer.slice(..);
        let (sender, receiver) = futures_intrusive::channel::shared::oneshot_channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            sender.send(result).ok();
        });

        self.device.poll(wgpu::Maintain::Wait);

        receiver
            .receive()
            .await
            .ok_or_else(|| ProbeError::Readback("Failed to receive mapping result".to_string()))?
            .map_err(|e| ProbeError::Readback(format!("Buffer mapping failed: {:?}", e)))?;

        let plane = {
            let data = buffer_slice.get_mapped_range();
            debug!(bytes = data.len(), bytes_per_row, "bitplane mapped");
            Bitplane::from_rgba8(BIT_WIDTH, rows, bytes_per_row, &data)
        };

        staging_buffer.unmap();

        plane
    }
}
