/// Represents a single acquired frame.
///
/// This object is short-lived and must be finalized promptly. Holding the surface
/// texture prevents acquisition of subsequent frames.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// A submitted surface texture waiting to be shown.
///
/// Splitting submission from presentation lets the frame loop run work (the
/// deferred render-target resize) between "UI draw data submitted" and "swap".
#[must_use = "the frame is only shown once `present` is called"]
pub struct PendingPresent {
    pub(crate) surface_texture: wgpu::SurfaceTexture,
}

impl PendingPresent {
    /// Queues the texture for presentation (the buffer swap).
    pub fn present(self) {
        self.surface_texture.present();
    }
}
