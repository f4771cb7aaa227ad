use crate::shaders;
use blockview_assets::{CuboidMesh, FLOATS_PER_VERTEX, MeshId};
use blockview_common::{BlockId, UploadSlot};
use blockview_kernel::FrameSink;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use std::collections::BTreeMap;
use wgpu::util::DeviceExt;

/// Instance slots allocated up front.
pub const DEFAULT_MAX_BLOCKS: u32 = 10_000;

const MATRIX_BYTES: u64 = std::mem::size_of::<[f32; 16]>() as u64;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("{block} does not fit in an instance buffer of {capacity} blocks")]
    CapacityExceeded { block: BlockId, capacity: u32 },
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
}

impl Uniforms {
    const VIEW_OFFSET: u64 = 0;
    const PROJ_OFFSET: u64 = MATRIX_BYTES;
}

/// Byte offset of a block's model matrix in the instance buffer.
fn instance_offset(block: BlockId, capacity: u32) -> Result<u64, RenderError> {
    if block.0 >= capacity {
        return Err(RenderError::CapacityExceeded { block, capacity });
    }
    Ok(block.0 as u64 * MATRIX_BYTES)
}

#[derive(Debug, Clone, Copy)]
struct DrawCall {
    block: BlockId,
    mesh: MeshId,
    vertex_count: u32,
}

/// wgpu resources for drawing blocks.
///
/// Uploads and draws go through a [`WgpuFrame`], which borrows the device and
/// queue for the duration of one frame.
pub struct WgpuRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    max_blocks: u32,
    mesh_buffers: BTreeMap<MeshId, wgpu::Buffer>,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        Self::with_capacity(device, surface_format, width, height, DEFAULT_MAX_BLOCKS)
    }

    pub fn with_capacity(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        max_blocks: u32,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view: Mat4::IDENTITY.to_cols_array_2d(),
                proj: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("block_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::BLOCK_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("block_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: MATRIX_BYTES,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            1 => Float32x4,
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: max_blocks as u64 * MATRIX_BYTES,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);
        tracing::debug!(?surface_format, max_blocks, "wgpu renderer created");

        Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            instance_buffer,
            max_blocks,
            mesh_buffers: BTreeMap::new(),
            depth_texture,
            surface_format,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    pub fn max_blocks(&self) -> u32 {
        self.max_blocks
    }

    /// Number of distinct meshes with a vertex buffer.
    pub fn mesh_buffer_count(&self) -> usize {
        self.mesh_buffers.len()
    }

    /// Start a frame. Uploads are written to the queue immediately; draws are
    /// collected and encoded by [`WgpuFrame::submit`].
    pub fn frame<'a>(
        &'a mut self,
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
    ) -> WgpuFrame<'a> {
        WgpuFrame {
            renderer: self,
            device,
            queue,
            draws: Vec::new(),
        }
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

/// One frame's worth of GPU work. Implements [`FrameSink`] for the scene.
pub struct WgpuFrame<'a> {
    renderer: &'a mut WgpuRenderer,
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    draws: Vec<DrawCall>,
}

impl WgpuFrame<'_> {
    /// Encode the collected draws into one pass on `target` and submit.
    /// Returns the number of draw calls. A frame with no draws still clears.
    pub fn submit(self, target: &wgpu::TextureView) -> usize {
        let renderer = &*self.renderer;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.1,
                            g: 0.1,
                            b: 0.15,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &renderer.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&renderer.pipeline);
            pass.set_bind_group(0, &renderer.uniform_bind_group, &[]);
            pass.set_vertex_buffer(1, renderer.instance_buffer.slice(..));
            for call in &self.draws {
                let Some(buffer) = renderer.mesh_buffers.get(&call.mesh) else {
                    continue;
                };
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..call.vertex_count, call.block.0..call.block.0 + 1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        tracing::trace!(draws = self.draws.len(), "frame submitted");
        self.draws.len()
    }
}

impl FrameSink for WgpuFrame<'_> {
    type Error = RenderError;

    fn upload(&mut self, slot: UploadSlot, matrix: Mat4) -> Result<(), RenderError> {
        let cols = matrix.to_cols_array();
        let bytes = bytemuck::bytes_of(&cols);
        let (buffer, offset) = match slot {
            UploadSlot::View => (&self.renderer.uniform_buffer, Uniforms::VIEW_OFFSET),
            UploadSlot::Projection => (&self.renderer.uniform_buffer, Uniforms::PROJ_OFFSET),
            UploadSlot::Model(block) => (
                &self.renderer.instance_buffer,
                instance_offset(block, self.renderer.max_blocks)?,
            ),
        };
        self.queue.write_buffer(buffer, offset, bytes);
        Ok(())
    }

    fn draw(&mut self, block: BlockId, mesh: &CuboidMesh) -> Result<(), RenderError> {
        instance_offset(block, self.renderer.max_blocks)?;
        let id = mesh.id();
        let device = self.device;
        self.renderer.mesh_buffers.entry(id).or_insert_with(|| {
            tracing::debug!(%id, "creating mesh vertex buffer");
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_vertex_buffer"),
                contents: mesh.as_bytes(),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });
        self.draws.push(DrawCall {
            block,
            mesh: id,
            vertex_count: mesh.vertex_count() as u32,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniforms_hold_two_matrices() {
        assert_eq!(std::mem::size_of::<Uniforms>() as u64, 2 * MATRIX_BYTES);
        assert_eq!(Uniforms::PROJ_OFFSET, 64);
    }

    #[test]
    fn instance_offsets_are_matrix_strided() {
        assert_eq!(instance_offset(BlockId(0), 4).unwrap(), 0);
        assert_eq!(instance_offset(BlockId(3), 4).unwrap(), 192);
    }

    #[test]
    fn block_past_capacity_is_rejected() {
        let err = instance_offset(BlockId(4), 4).unwrap_err();
        assert!(matches!(
            err,
            RenderError::CapacityExceeded {
                block: BlockId(4),
                capacity: 4
            }
        ));
        assert!(err.to_string().contains("block#4"));
    }

    #[test]
    fn vertex_stride_matches_mesh_layout() {
        let mesh = CuboidMesh::unit();
        let stride = FLOATS_PER_VERTEX * std::mem::size_of::<f32>();
        assert_eq!(mesh.as_bytes().len(), stride * mesh.vertex_count());
    }
}
