use anyhow::{Context as _, Result};
use egui::load::SizedTexture;
use glam::Vec2;
use rutile_engine::coords::Resolution;
use rutile_engine::device::{Gpu, PendingPresent};
use rutile_engine::frame::{Composed, FrameStats, Overlay, PanelReport};
use rutile_engine::render::{GpuAttachments, RenderTarget, TextureHandle};
use winit::event::WindowEvent;
use winit::window::Window;

/// Persistent egui state: context, winit glue, wgpu renderer and the texture
/// slot the viewport image is registered in.
pub struct EguiLayer {
    // Renderer first: it holds the bind group referencing the target's view.
    renderer: egui_wgpu::Renderer,
    state: egui_winit::State,
    ctx: egui::Context,
    viewport_texture: Option<(TextureHandle, egui::TextureId)>,
}

impl EguiLayer {
    pub fn new(window: &Window, gpu: &Gpu<'_>, font_scale: f32) -> Self {
        let ctx = new_context(font_scale);

        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            window.theme(),
            Some(gpu.device().limits().max_texture_dimension_2d as usize),
        );

        let renderer = egui_wgpu::Renderer::new(
            gpu.device(),
            gpu.surface_format(),
            egui_wgpu::RendererOptions::default(),
        );

        Self {
            renderer,
            state,
            ctx,
            viewport_texture: None,
        }
    }

    /// Feeds a window event to egui. Returns whether egui consumed it.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Borrows the layer for one frame.
    pub fn frame<'a, 'w>(&'a mut self, window: &'a Window, gpu: &'a Gpu<'w>) -> EguiFrame<'a, 'w> {
        EguiFrame {
            layer: self,
            window,
            gpu,
            surface_error: None,
        }
    }

    /// Texture id showing the target's color attachment, re-pointed at the new
    /// view whenever the target has been reallocated.
    fn viewport_texture(
        &mut self,
        device: &wgpu::Device,
        target: &RenderTarget<GpuAttachments>,
    ) -> egui::TextureId {
        let handle = target.texture();
        let view = target.attachments().color_view();

        let id = match self.viewport_texture {
            Some((current, id)) if target.is_current(current) => return id,
            Some((_, id)) => {
                self.renderer.update_egui_texture_from_wgpu_texture(
                    device,
                    view,
                    wgpu::FilterMode::Linear,
                    id,
                );
                id
            }
            None => self
                .renderer
                .register_native_texture(device, view, wgpu::FilterMode::Linear),
        };

        self.viewport_texture = Some((handle, id));
        id
    }
}

/// One frame of UI composition, implementing the frame loop's overlay hook.
pub struct EguiFrame<'a, 'w> {
    layer: &'a mut EguiLayer,
    window: &'a Window,
    gpu: &'a Gpu<'w>,
    surface_error: Option<wgpu::SurfaceError>,
}

impl EguiFrame<'_, '_> {
    /// Surface acquisition error hit during `compose`, if any. The frame was not
    /// presented; the caller decides how to recover.
    pub fn into_surface_error(self) -> Option<wgpu::SurfaceError> {
        self.surface_error
    }
}

impl Overlay<GpuAttachments> for EguiFrame<'_, '_> {
    type Present = PendingPresent;

    fn compose(
        &mut self,
        target: &RenderTarget<GpuAttachments>,
        display: Resolution,
        stats: &FrameStats,
    ) -> Result<Composed<PendingPresent>> {
        let device = self.gpu.device();
        let queue = self.gpu.queue();
        let texture_id = self.layer.viewport_texture(device, target);

        let raw_input = self.layer.state.take_egui_input(self.window);
        let mut report = None;
        let output = self.layer.ctx.run(raw_input, |ctx| {
            report = Some(draw_ui(ctx, texture_id, display, stats));
        });
        self.layer
            .state
            .handle_platform_output(self.window, output.platform_output);
        let report = report.context("egui produced no viewport layout")?;

        let primitives = self.layer.ctx.tessellate(output.shapes, output.pixels_per_point);

        for (id, delta) in &output.textures_delta.set {
            self.layer.renderer.update_texture(device, queue, *id, delta);
        }

        let present = match self.gpu.begin_frame() {
            Ok(mut frame) => {
                let size = self.gpu.size();
                let screen = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [size.width, size.height],
                    pixels_per_point: output.pixels_per_point,
                };

                let ui_buffers = self.layer.renderer.update_buffers(
                    device,
                    queue,
                    &mut frame.encoder,
                    &primitives,
                    &screen,
                );

                {
                    let mut pass = frame
                        .encoder
                        .begin_render_pass(&wgpu::RenderPassDescriptor {
                            label: Some("rutile egui pass"),
                            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                view: &frame.view,
                                resolve_target: None,
                                ops: wgpu::Operations {
                                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                                    store: wgpu::StoreOp::Store,
                                },
                                depth_slice: None,
                            })],
                            depth_stencil_attachment: None,
                            timestamp_writes: None,
                            occlusion_query_set: None,
                        })
                        .forget_lifetime();
                    self.layer.renderer.render(&mut pass, &primitives, &screen);
                }

                self.window.pre_present_notify();
                Some(self.gpu.submit(frame, ui_buffers))
            }
            Err(err) => {
                log::debug!("skipping UI submission: {err}");
                self.surface_error = Some(err);
                None
            }
        };

        for id in &output.textures_delta.free {
            self.layer.renderer.free_texture(id);
        }

        Ok(Composed { report, present })
    }

    // `render_platform_windows` keeps its no-op default: see `new_context`.
}

/// Creates the egui context with text scaled by `font_scale`.
///
/// Secondary viewports are embedded in the main window, so the overlay never
/// owns other platform windows.
fn new_context(font_scale: f32) -> egui::Context {
    let ctx = egui::Context::default();
    ctx.set_embed_viewports(true);
    apply_font_scale(&ctx, font_scale);
    ctx
}

/// Lays out the docked UI: a stats side panel and the viewport filling the rest.
///
/// The content region is read before the image is placed; the image is shown at
/// `display`, the size the target was rendered at.
pub fn draw_ui(
    ctx: &egui::Context,
    texture: egui::TextureId,
    display: Resolution,
    stats: &FrameStats,
) -> PanelReport {
    egui::SidePanel::right("rutile stats")
        .resizable(true)
        .show(ctx, |ui| {
            ui.heading("Frame");
            ui.label(format!("#{}", stats.index));
            ui.label(format!("frame  {:.2} ms", stats.last_frame.as_secs_f64() * 1e3));
            ui.label(format!("render {:.2} ms", stats.last_render.as_secs_f64() * 1e3));
            ui.label(format!("target {}", stats.target));
        });

    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            let available = ui.available_size();

            let size = egui::vec2(display.width() as f32, display.height() as f32);
            let image = egui::Image::new(SizedTexture::new(texture, size)).uv(egui::Rect::from_min_max(
                egui::pos2(0.0, 0.0),
                egui::pos2(1.0, 1.0),
            ));
            let response = ui.add(image);

            panel_report(available, response.rect, response.hovered())
        })
        .inner
}

fn panel_report(available: egui::Vec2, image: egui::Rect, hovered: bool) -> PanelReport {
    PanelReport {
        desired: Resolution::from_extent(available.x, available.y),
        offset: Vec2::new(image.min.x, image.min.y),
        hovered,
    }
}

fn apply_font_scale(ctx: &egui::Context, scale: f32) {
    ctx.style_mut(|style| {
        for font in style.text_styles.values_mut() {
            font.size *= scale;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn stats() -> FrameStats {
        FrameStats {
            index: 7,
            last_frame: Duration::from_millis(16),
            last_render: Duration::from_millis(4),
            target: Resolution::new(800, 600).unwrap(),
        }
    }

    fn run_ui(ctx: &egui::Context, display: Resolution) -> PanelReport {
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(1600.0, 900.0),
            )),
            ..Default::default()
        };
        let mut report = None;
        let _ = ctx.run(input, |ctx| {
            report = Some(draw_ui(ctx, egui::TextureId::User(1), display, &stats()));
        });
        report.unwrap()
    }

    #[test]
    fn report_rounds_available_region() {
        let report = panel_report(
            egui::vec2(640.4, 479.6),
            egui::Rect::from_min_size(egui::pos2(100.0, 50.0), egui::vec2(10.0, 10.0)),
            true,
        );
        assert_eq!(report.desired, Resolution::new(640, 480).unwrap());
        assert_eq!(report.offset, Vec2::new(100.0, 50.0));
        assert!(report.hovered);
    }

    #[test]
    fn collapsed_panel_never_requests_zero() {
        let report = panel_report(egui::vec2(0.0, -3.0), egui::Rect::NOTHING, false);
        assert_eq!(report.desired, Resolution::new(1, 1).unwrap());
    }

    #[test]
    fn viewport_gets_the_space_left_of_the_stats_panel() {
        let ctx = egui::Context::default();
        let report = run_ui(&ctx, Resolution::new(800, 600).unwrap());

        assert!(report.desired.width() < 1600);
        assert_eq!(report.desired.height(), 900);
        assert_eq!(report.offset, Vec2::ZERO);
        assert!(!report.hovered);
    }

    #[test]
    fn desired_size_does_not_depend_on_displayed_size() {
        let ctx = egui::Context::default();
        // The resizable side panel settles its width after the first pass.
        run_ui(&ctx, Resolution::new(800, 600).unwrap());

        let a = run_ui(&ctx, Resolution::new(800, 600).unwrap());
        let b = run_ui(&ctx, Resolution::new(200, 100).unwrap());
        assert_eq!(a.desired, b.desired);
    }

    #[test]
    fn settled_layout_reports_a_steady_size() {
        let ctx = egui::Context::default();
        let mut display = Resolution::new(800, 600).unwrap();
        display = run_ui(&ctx, display).desired;

        // Feed each report back as the next display size, as the frame loop does.
        let settled = run_ui(&ctx, display).desired;
        for _ in 0..5 {
            display = run_ui(&ctx, display).desired;
            assert_eq!(display, settled, "a steady window must not trigger a resize");
        }
    }

    #[test]
    fn context_embeds_secondary_viewports() {
        let ctx = new_context(1.0);
        assert!(ctx.embed_viewports());
    }

    #[test]
    fn font_scale_multiplies_text_styles() {
        let ctx = egui::Context::default();
        let before = ctx.style().text_styles[&egui::TextStyle::Body].size;

        apply_font_scale(&ctx, 2.0);

        let after = ctx.style().text_styles[&egui::TextStyle::Body].size;
        assert_eq!(after, before * 2.0);
    }
}
