use anyhow::{Context, Result};
use rutile_engine::core::{App, AppControl, FrameCtx, WindowCtx};
use rutile_engine::device::{Gpu, SurfaceErrorAction};
use rutile_engine::frame::FrameLoop;
use rutile_engine::render::{
    GpuAttachments, Mesh, RenderCtx, RenderTarget, ShaderSources, SolidShader, TARGET_COLOR_FORMAT,
};
use winit::event::WindowEvent;

use crate::camera_control::FlyController;
use crate::config::ShellConfig;
use crate::overlay::EguiLayer;
use crate::scene::{SolidScene, TRIANGLE_INDICES, TRIANGLE_VERTICES};

/// Everything created once the window and device exist.
///
/// Fields are declared in reverse creation order so they drop UI first, then
/// geometry, shader and finally the render target.
struct Studio {
    overlay: EguiLayer,
    mesh: Mesh,
    shader: SolidShader,
    frame_loop: FrameLoop<GpuAttachments>,
    controller: FlyController,
}

/// The visualization shell.
pub struct StudioApp {
    config: ShellConfig,
    studio: Option<Studio>,
}

impl StudioApp {
    pub fn new(config: ShellConfig) -> Self {
        Self {
            config,
            studio: None,
        }
    }
}

impl App for StudioApp {
    fn on_init(&mut self, window: &WindowCtx<'_>, gpu: &Gpu<'_>) -> Result<()> {
        let cfg = &self.config;
        let ctx = RenderCtx::new(gpu.device(), gpu.queue(), TARGET_COLOR_FORMAT);

        let target = RenderTarget::new(gpu.device(), TARGET_COLOR_FORMAT, cfg.target_size)
            .context("failed to create viewport render target")?;
        let frame_loop = FrameLoop::new(target);

        let sources = ShaderSources::load(cfg.vertex_shader_path(), cfg.fragment_shader_path())
            .context("failed to load solid shader")?;
        let shader = SolidShader::new(&ctx, &sources).context("failed to build solid shader")?;

        let mesh = Mesh::from_interleaved(&ctx, &TRIANGLE_VERTICES, &TRIANGLE_INDICES)
            .context("failed to upload triangle")?;

        let overlay = EguiLayer::new(window.window, gpu, cfg.font_scale);

        log::info!(
            "studio ready: target {}, scale factor {}",
            cfg.target_size,
            window.scale_factor()
        );

        self.studio = Some(Studio {
            overlay,
            mesh,
            shader,
            frame_loop,
            controller: FlyController::default(),
        });
        Ok(())
    }

    fn on_window_event(&mut self, window: &WindowCtx<'_>, event: &WindowEvent) -> AppControl {
        if let Some(studio) = self.studio.as_mut() {
            studio.overlay.on_window_event(window.window, event);
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        let Some(studio) = self.studio.as_mut() else {
            return Ok(AppControl::Continue);
        };
        let Studio {
            overlay,
            mesh,
            shader,
            frame_loop,
            controller,
        } = studio;

        let surface_error = {
            let gpu: &Gpu<'_> = ctx.gpu;

            let mut scene = SolidScene {
                device: gpu.device(),
                queue: gpu.queue(),
                shader,
                mesh,
                clear: self.config.clear_color,
                color: self.config.triangle_color,
            };
            let mut ui = overlay.frame(ctx.window.window, gpu);

            frame_loop.run_frame(
                gpu.device(),
                ctx.input,
                ctx.input_frame,
                &mut scene,
                &mut ui,
                controller,
            )?;

            ui.into_surface_error()
        };

        if let Some(err) = surface_error {
            if ctx.gpu.handle_surface_error(err) == SurfaceErrorAction::Fatal {
                anyhow::bail!("surface ran out of memory");
            }
        }

        Ok(AppControl::Continue)
    }
}
