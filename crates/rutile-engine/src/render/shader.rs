use std::fmt;
use std::path::{Path, PathBuf};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use thiserror::Error;

use super::{RenderCtx, Vertex, DEPTH_FORMAT};

/// Pipeline stage a shader source belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    /// Pipeline creation, where the stages are linked against each other.
    Pipeline,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Pipeline => "pipeline",
        })
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read shader source {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} shader failed to compile: {message}")]
    Compile { stage: ShaderStage, message: String },
}

/// WGSL sources for a vertex/fragment pair. Each module's entry point is `main`.
#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    pub const ENTRY_POINT: &'static str = "main";

    /// Reads both stages from disk.
    pub fn load(vertex: impl AsRef<Path>, fragment: impl AsRef<Path>) -> Result<Self, ShaderError> {
        Ok(Self {
            vertex: read_source(vertex.as_ref())?,
            fragment: read_source(fragment.as_ref())?,
        })
    }
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Uniform block shared by both stages of the solid shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SolidUniforms {
    pub mvp: [[f32; 4]; 4],
    /// rgb + padding.
    pub color: [f32; 4],
}

impl SolidUniforms {
    const MVP_OFFSET: u64 = 0;
    const COLOR_OFFSET: u64 = std::mem::size_of::<[[f32; 4]; 4]>() as u64;
    const SIZE: u64 = std::mem::size_of::<SolidUniforms>() as u64;
}

impl Default for SolidUniforms {
    fn default() -> Self {
        Self {
            mvp: Mat4::IDENTITY.to_cols_array_2d(),
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Flat-colored, depth-tested pipeline for drawing [`Vertex`] meshes into the
/// offscreen target.
pub struct SolidShader {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniforms: wgpu::Buffer,
}

impl SolidShader {
    /// Compiles both stages and builds the pipeline for `ctx.color_format`.
    ///
    /// WGSL errors are caught with a validation scope and returned as
    /// [`ShaderError::Compile`] instead of reaching the uncaptured-error sink.
    pub fn new(ctx: &RenderCtx<'_>, sources: &ShaderSources) -> Result<Self, ShaderError> {
        let vs = compile(ctx.device, ShaderStage::Vertex, &sources.vertex)?;
        let fs = compile(ctx.device, ShaderStage::Fragment, &sources.fragment)?;

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("rutile solid bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: wgpu::BufferSize::new(SolidUniforms::SIZE),
                        },
                        count: None,
                    }],
                });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("rutile solid pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("rutile solid pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs,
                entry_point: Some(ShaderSources::ENTRY_POINT),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs,
                entry_point: Some(ShaderSources::ENTRY_POINT),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });
        // Interface mismatches between the two stages surface here.
        if let Some(err) = pollster::block_on(ctx.device.pop_error_scope()) {
            return Err(ShaderError::Compile {
                stage: ShaderStage::Pipeline,
                message: err.to_string(),
            });
        }

        let uniforms = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("rutile solid ubo"),
            size: SolidUniforms::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        ctx.queue
            .write_buffer(&uniforms, 0, bytemuck::bytes_of(&SolidUniforms::default()));

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("rutile solid bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            }],
        });

        Ok(Self {
            pipeline,
            bind_group,
            uniforms,
        })
    }

    /// Uploads the model-view-projection matrix.
    pub fn set_mvp(&self, queue: &wgpu::Queue, mvp: Mat4) {
        queue.write_buffer(
            &self.uniforms,
            SolidUniforms::MVP_OFFSET,
            bytemuck::cast_slice(&mvp.to_cols_array()),
        );
    }

    /// Uploads the flat color (rgb, linear).
    pub fn set_color(&self, queue: &wgpu::Queue, color: Vec3) {
        queue.write_buffer(
            &self.uniforms,
            SolidUniforms::COLOR_OFFSET,
            bytemuck::cast_slice(&color.extend(1.0).to_array()),
        );
    }

    /// Binds pipeline and uniforms on `pass`.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
    }
}

fn compile(
    device: &wgpu::Device,
    stage: ShaderStage,
    source: &str,
) -> Result<wgpu::ShaderModule, ShaderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let label = format!("rutile solid {stage}");
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(ShaderError::Compile {
            stage,
            message: err.to_string(),
        }),
        None => Ok(module),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_layout_matches_wgsl_struct() {
        // mat4x4<f32> followed by vec4<f32>: 64 + 16 bytes, 16-byte aligned.
        assert_eq!(SolidUniforms::SIZE, 80);
        assert_eq!(SolidUniforms::COLOR_OFFSET, 64);
        assert_eq!(SolidUniforms::SIZE % 16, 0);
    }

    #[test]
    fn missing_source_reports_path() {
        let err = ShaderSources::load("does/not/exist.vert.wgsl", "nope.frag.wgsl").unwrap_err();

        match err {
            ShaderError::Io { path, .. } => {
                assert_eq!(path, PathBuf::from("does/not/exist.vert.wgsl"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn loads_both_stages() {
        let dir = std::env::temp_dir().join(format!("rutile-shader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let vs = dir.join("a.vert.wgsl");
        let fs = dir.join("a.frag.wgsl");
        std::fs::write(&vs, "// vs").unwrap();
        std::fs::write(&fs, "// fs").unwrap();

        let sources = ShaderSources::load(&vs, &fs).unwrap();
        assert_eq!(sources.vertex, "// vs");
        assert_eq!(sources.fragment, "// fs");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn stage_names() {
        assert_eq!(ShaderStage::Vertex.to_string(), "vertex");
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }
}
