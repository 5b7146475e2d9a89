/// Renderer-facing context (device/queue + the format renderers draw into).
///
/// This is intentionally small and stable.
#[derive(Copy, Clone)]
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub color_format: wgpu::TextureFormat,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        color_format: wgpu::TextureFormat,
    ) -> Self {
        Self {
            device,
            queue,
            color_format,
        }
    }
}
