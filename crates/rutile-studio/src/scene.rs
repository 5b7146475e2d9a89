use anyhow::Result;
use glam::{Mat4, Vec3};
use rutile_engine::frame::SceneRenderer;
use rutile_engine::render::{GpuAttachments, Mesh, RenderTarget, SolidShader};

/// The single drawable: one triangle, interleaved position / normal / uv.
pub const TRIANGLE_VERTICES: [f32; 24] = [
    -0.5, -0.5, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, //
    0.0, 0.5, 0.0, 0.0, 0.0, 1.0, 0.0, 0.5, //
    0.5, -0.5, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0,
];

pub const TRIANGLE_INDICES: [u32; 3] = [0, 1, 2];

/// Per-frame scene pass: clear, bind the solid shader, upload uniforms, draw.
///
/// Records into its own encoder and submits immediately so the UI pass that
/// samples the target is queued after it.
pub struct SolidScene<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub shader: &'a SolidShader,
    pub mesh: &'a Mesh,
    pub clear: wgpu::Color,
    pub color: Vec3,
}

impl SceneRenderer<GpuAttachments> for SolidScene<'_> {
    fn render(&mut self, target: &RenderTarget<GpuAttachments>, mvp: Mat4) -> Result<()> {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("rutile scene encoder"),
            });

        self.shader.set_color(self.queue, self.color);
        self.shader.set_mvp(self.queue, mvp);

        {
            let mut pass = target.bind(&mut encoder, self.clear);
            self.shader.bind(&mut pass);
            self.mesh.draw(&mut pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }
}
