use std::path::PathBuf;

use glam::Vec3;
use rutile_engine::coords::Resolution;
use rutile_engine::device::GpuInit;
use rutile_engine::window::RuntimeConfig;
use winit::dpi::LogicalSize;

/// Shell configuration. Composed in code; there are no config files or flags.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub title: String,
    /// Initial window size in logical pixels.
    pub window_size: LogicalSize<f64>,
    /// Render target size before the UI has reported a panel size.
    pub target_size: Resolution,
    pub clear_color: wgpu::Color,
    pub triangle_color: Vec3,
    /// Multiplier applied to every egui text style.
    pub font_scale: f32,
    /// Directory holding `solid.vert.wgsl` and `solid.frag.wgsl`.
    pub shader_dir: PathBuf,
    /// Backend validation on the GPU device.
    pub gpu_debug: bool,
}

impl ShellConfig {
    pub fn vertex_shader_path(&self) -> PathBuf {
        self.shader_dir.join("solid.vert.wgsl")
    }

    pub fn fragment_shader_path(&self) -> PathBuf {
        self.shader_dir.join("solid.frag.wgsl")
    }

    pub fn runtime(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: self.title.clone(),
            initial_size: self.window_size,
        }
    }

    pub fn gpu_init(&self) -> GpuInit {
        GpuInit {
            // egui-wgpu blends in gamma space and wants a non-sRGB surface.
            prefer_srgb: false,
            debug: self.gpu_debug,
            ..GpuInit::default()
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            title: "Rutile".to_string(),
            window_size: LogicalSize::new(1600.0, 900.0),
            target_size: Resolution::clamped(800, 600),
            clear_color: wgpu::Color {
                r: 0.5,
                g: 0.5,
                b: 0.5,
                a: 1.0,
            },
            triangle_color: Vec3::new(1.0, 0.0, 0.0),
            font_scale: 2.0,
            shader_dir: PathBuf::from("assets/shaders"),
            gpu_debug: cfg!(debug_assertions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn shader_paths_are_relative_to_shader_dir() {
        let cfg = ShellConfig::default();
        assert_eq!(cfg.vertex_shader_path(), Path::new("assets/shaders/solid.vert.wgsl"));
        assert_eq!(cfg.fragment_shader_path(), Path::new("assets/shaders/solid.frag.wgsl"));
    }

    #[test]
    fn runtime_and_gpu_follow_shell_settings() {
        let cfg = ShellConfig {
            gpu_debug: true,
            ..ShellConfig::default()
        };

        let rt = cfg.runtime();
        assert_eq!(rt.title, "Rutile");
        assert_eq!(rt.initial_size, LogicalSize::new(1600.0, 900.0));
        assert!(cfg.gpu_init().debug);
    }

    #[test]
    fn default_target_is_800_by_600() {
        assert_eq!(ShellConfig::default().target_size, Resolution::new(800, 600).unwrap());
    }
}
