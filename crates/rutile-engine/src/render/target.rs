use thiserror::Error;

use crate::coords::Resolution;

/// Color format of the offscreen target. Sampled by the UI as a regular texture.
pub const TARGET_COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Depth format of the offscreen target.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// Render-target allocation failures. Always fatal to the caller.
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("render target {requested} exceeds the device limit of {limit}px per side")]
    TooLarge { requested: Resolution, limit: u32 },

    #[error("failed to allocate {requested} render target: {reason}")]
    Allocation { requested: Resolution, reason: String },
}

/// Backing storage of a [`RenderTarget`]: one color and one depth attachment.
///
/// The GPU implementation is [`GpuAttachments`]; the frame loop only depends on
/// this trait so it can be driven without a device.
pub trait Attachments: Sized {
    type Device: ?Sized;
    type Format: Copy;

    /// Allocates both attachments at exactly `size`.
    fn allocate(
        device: &Self::Device,
        format: Self::Format,
        size: Resolution,
    ) -> Result<Self, TargetError>;
}

/// Read-only reference to the target's color attachment.
///
/// Tagged with the allocation it was taken from; a reallocating resize makes
/// every older handle stale (see [`RenderTarget::is_current`]).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureHandle {
    generation: u64,
}

/// Offscreen render target with deferred, size-checked reallocation.
///
/// The attachments always have the size passed to the last successful
/// `new`/`resize`. Binding hands out a render pass that borrows the target, so
/// the target cannot be resized while bound.
pub struct RenderTarget<A: Attachments> {
    attachments: A,
    format: A::Format,
    size: Resolution,
    generation: u64,
}

impl<A: Attachments> RenderTarget<A> {
    /// Allocates the attachments at `size`.
    pub fn new(device: &A::Device, format: A::Format, size: Resolution) -> Result<Self, TargetError> {
        let attachments = A::allocate(device, format, size)?;
        log::debug!("render target allocated at {size}");

        Ok(Self {
            attachments,
            format,
            size,
            generation: 0,
        })
    }

    /// Reallocates the attachments if `size` differs from the current size.
    ///
    /// Returns `Ok(false)` without touching anything when the size is unchanged;
    /// handles taken earlier stay valid. Otherwise contents are discarded and
    /// older handles become stale. On error the previous attachments are kept.
    pub fn resize(&mut self, device: &A::Device, size: Resolution) -> Result<bool, TargetError> {
        if size == self.size {
            return Ok(false);
        }

        self.attachments = A::allocate(device, self.format, size)?;
        log::debug!("render target reallocated {} -> {size}", self.size);

        self.size = size;
        self.generation = self.generation.wrapping_add(1);
        Ok(true)
    }

    #[inline]
    pub fn size(&self) -> Resolution {
        self.size
    }

    /// `width / height` of the current attachments.
    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        self.size.aspect_ratio()
    }

    #[inline]
    pub fn attachments(&self) -> &A {
        &self.attachments
    }

    /// Handle to the color attachment as currently allocated.
    #[inline]
    pub fn texture(&self) -> TextureHandle {
        TextureHandle {
            generation: self.generation,
        }
    }

    /// Whether `handle` still refers to the live color attachment.
    #[inline]
    pub fn is_current(&self, handle: TextureHandle) -> bool {
        handle.generation == self.generation
    }
}

/// wgpu-backed attachments.
pub struct GpuAttachments {
    _color: wgpu::Texture,
    color_view: wgpu::TextureView,
    _depth: wgpu::Texture,
    depth_view: wgpu::TextureView,
}

impl GpuAttachments {
    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color_view
    }
}

impl Attachments for GpuAttachments {
    type Device = wgpu::Device;
    type Format = wgpu::TextureFormat;

    fn allocate(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: Resolution,
    ) -> Result<Self, TargetError> {
        let limit = device.limits().max_texture_dimension_2d;
        if size.width() > limit || size.height() > limit {
            return Err(TargetError::TooLarge {
                requested: size,
                limit,
            });
        }

        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let color = create_attachment(
            device,
            "rutile target color",
            format,
            size,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        let depth = create_attachment(
            device,
            "rutile target depth",
            DEPTH_FORMAT,
            size,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );

        // Scopes pop in reverse push order.
        let validation = pollster::block_on(device.pop_error_scope());
        let oom = pollster::block_on(device.pop_error_scope());
        if let Some(err) = validation.or(oom) {
            return Err(TargetError::Allocation {
                requested: size,
                reason: err.to_string(),
            });
        }

        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Self {
            _color: color,
            color_view,
            _depth: depth,
            depth_view,
        })
    }
}

impl RenderTarget<GpuAttachments> {
    /// Starts a pass that draws into the target, clearing color to `clear` and
    /// depth to 1.0. Dropping the pass unbinds the target.
    pub fn bind<'e>(
        &'e self,
        encoder: &'e mut wgpu::CommandEncoder,
        clear: wgpu::Color,
    ) -> wgpu::RenderPass<'e> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("rutile target pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.attachments.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.attachments.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        })
    }
}

fn create_attachment(
    device: &wgpu::Device,
    label: &str,
    format: wgpu::TextureFormat,
    size: Resolution,
    usage: wgpu::TextureUsages,
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: size.width(),
            height: size.height(),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage,
        view_formats: &[],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Counts allocations and refuses anything wider than `limit`.
    struct Counter {
        allocations: Cell<u32>,
        limit: u32,
    }

    impl Counter {
        fn new() -> Self {
            Self {
                allocations: Cell::new(0),
                limit: 8192,
            }
        }
    }

    struct FakeAttachments {
        size: Resolution,
    }

    impl Attachments for FakeAttachments {
        type Device = Counter;
        type Format = ();

        fn allocate(device: &Counter, _: (), size: Resolution) -> Result<Self, TargetError> {
            if size.width() > device.limit || size.height() > device.limit {
                return Err(TargetError::TooLarge {
                    requested: size,
                    limit: device.limit,
                });
            }
            device.allocations.set(device.allocations.get() + 1);
            Ok(Self { size })
        }
    }

    fn res(w: u32, h: u32) -> Resolution {
        Resolution::new(w, h).unwrap()
    }

    // ── creation ─────────────────────────────────────────────────────────

    #[test]
    fn new_allocates_once_at_requested_size() {
        let dev = Counter::new();
        let target = RenderTarget::<FakeAttachments>::new(&dev, (), res(800, 600)).unwrap();

        assert_eq!(dev.allocations.get(), 1);
        assert_eq!(target.size(), res(800, 600));
        assert_eq!(target.attachments().size, res(800, 600));
    }

    #[test]
    fn oversized_creation_is_an_error() {
        let dev = Counter::new();
        let err = RenderTarget::<FakeAttachments>::new(&dev, (), res(10_000, 10)).err();

        assert!(matches!(err, Some(TargetError::TooLarge { limit: 8192, .. })));
    }

    // ── resize ───────────────────────────────────────────────────────────

    #[test]
    fn resize_to_same_size_is_a_noop() {
        let dev = Counter::new();
        let mut target = RenderTarget::<FakeAttachments>::new(&dev, (), res(640, 480)).unwrap();

        assert!(target.resize(&dev, res(800, 600)).unwrap());
        let handle = target.texture();

        assert!(!target.resize(&dev, res(800, 600)).unwrap());
        assert!(target.is_current(handle));
        assert_eq!(dev.allocations.get(), 2);
    }

    #[test]
    fn reallocating_resize_invalidates_handles() {
        let dev = Counter::new();
        let mut target = RenderTarget::<FakeAttachments>::new(&dev, (), res(800, 600)).unwrap();
        let before = target.texture();

        target.resize(&dev, res(640, 480)).unwrap();

        assert!(!target.is_current(before));
        assert!(target.is_current(target.texture()));
        assert_eq!(target.attachments().size, res(640, 480));
    }

    #[test]
    fn failed_resize_keeps_previous_attachments() {
        let dev = Counter::new();
        let mut target = RenderTarget::<FakeAttachments>::new(&dev, (), res(800, 600)).unwrap();
        let handle = target.texture();

        assert!(target.resize(&dev, res(9000, 9000)).is_err());
        assert_eq!(target.size(), res(800, 600));
        assert!(target.is_current(handle));
    }

    #[test]
    fn aspect_follows_current_size() {
        let dev = Counter::new();
        let mut target = RenderTarget::<FakeAttachments>::new(&dev, (), res(800, 600)).unwrap();
        assert!((target.aspect_ratio() - 800.0 / 600.0).abs() < 1e-6);

        target.resize(&dev, res(500, 1000)).unwrap();
        assert_eq!(target.aspect_ratio(), 0.5);
    }
}
