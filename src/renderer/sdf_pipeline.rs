//! Playfield renderer
//!
//! Renders the entire scene in the fragment shader using signed distance
//! fields over a single fullscreen triangle. The shader works in logical
//! playfield units; the only pixel-aware value is `resolution`.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::RenderInitError;
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState};

/// Maximum number of obstacles uploaded per frame
pub const MAX_OBSTACLES: usize = 16;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Globals {
    pub resolution: [f32; 2],   // offset 0
    pub logical_size: [f32; 2], // offset 8
    pub time: f32,              // offset 16
    pub ground_offset: f32,     // offset 20
    pub ground_line: f32,       // offset 24
    pub avatar_x: f32,          // offset 28
    pub avatar_y: f32,          // offset 32
    pub avatar_radius: f32,     // offset 36
    pub avatar_tilt: f32,       // offset 40
    pub pipe_width: f32,        // offset 44
    pub obstacle_count: u32,    // offset 48
    pub phase: u32,             // offset 52 - 0 start, 1 playing, 2 game over
    pub srgb_target: u32,       // offset 56 - 1 if the surface encodes sRGB itself
    pub _pad: u32,              // pad to 64 bytes
}

/// One `vec4` per obstacle: x, gap_top, gap_size, passed
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ObstacleBlock {
    pub items: [[f32; 4]; MAX_OBSTACLES],
}

/// Build the per-frame uniforms from a read-only view of the game
pub fn pack_scene(
    state: &GameState,
    settings: &Settings,
    size: (u32, u32),
    elapsed: f32,
) -> (Globals, ObstacleBlock) {
    let mut avatar = state.avatar;
    if settings.reduced_motion {
        avatar.tilt = 0.0;
        if state.phase == GamePhase::Start {
            avatar.y = CANVAS_HEIGHT / 2.0;
        }
    }

    let mut block = ObstacleBlock::zeroed();
    let count = state.obstacles.len().min(MAX_OBSTACLES);
    for (slot, o) in block.items.iter_mut().zip(&state.obstacles) {
        *slot = [o.x, o.gap_top, o.gap_size, if o.passed { 1.0 } else { 0.0 }];
    }

    let globals = Globals {
        resolution: [size.0 as f32, size.1 as f32],
        logical_size: [CANVAS_WIDTH, CANVAS_HEIGHT],
        time: elapsed,
        ground_offset: state.ground_offset,
        ground_line: crate::ground_line(),
        avatar_x: AVATAR_X,
        avatar_y: avatar.y,
        avatar_radius: AVATAR_RADIUS,
        avatar_tilt: avatar.tilt,
        pipe_width: PIPE_WIDTH,
        obstacle_count: count as u32,
        phase: match state.phase {
            GamePhase::Start => 0,
            GamePhase::Playing => 1,
            GamePhase::GameOver => 2,
        },
        srgb_target: 0,
        _pad: 0,
    };

    (globals, block)
}

/// Prefer an sRGB surface so the shader can write gamma-encoded colors as-is
pub fn choose_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .or_else(|| formats.first().copied())
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn uniform_buffer<T: Pod>(device: &wgpu::Device, label: &str, initial: &T) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(initial),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

/// Fullscreen-triangle pipeline: no vertex buffers, one color target
fn build_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("playfield_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("sdf_shader.wgsl").into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("playfield_pipeline_layout"),
        bind_group_layouts: &[layout],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("playfield_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

// ============================================================================
// RENDER STATE
// ============================================================================

/// GPU objects for drawing the playfield into one canvas surface
pub struct SdfRenderState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    obstacles_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    /// Page time (ms) the shader clock counts from
    start_time: f64,
}

impl SdfRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderInitError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("gate_flap_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let caps = surface.get_capabilities(adapter);
        let format = choose_format(&caps.formats).ok_or(RenderInitError::NoSurfaceFormat)?;
        log::info!("Surface format {:?} (of {:?})", format, caps.formats);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let globals_buffer = uniform_buffer(&device, "globals", &Globals::zeroed());
        // Uniform rather than storage so WebGL2 fallbacks can bind it
        let obstacles_buffer = uniform_buffer(&device, "obstacles", &ObstacleBlock::zeroed());

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("playfield_bind_group_layout"),
            entries: &[uniform_entry(0), uniform_entry(1)],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("playfield_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: obstacles_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline = build_pipeline(&device, &bind_group_layout, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            obstacles_buffer,
            bind_group,
            start_time: 0.0,
        })
    }

    /// Backing-store size in physical pixels
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Zero-sized requests are ignored (minimized or hidden canvas)
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
    }

    /// Re-apply the current configuration after the surface was lost
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn set_start_time(&mut self, time: f64) {
        self.start_time = time;
    }

    /// Upload this frame's uniforms and draw
    pub fn render(
        &mut self,
        state: &GameState,
        settings: &Settings,
        time: f64,
    ) -> Result<(), wgpu::SurfaceError> {
        let elapsed = ((time - self.start_time) / 1000.0) as f32;
        let (mut globals, obstacles) = pack_scene(state, settings, self.size(), elapsed);
        globals.srgb_target = self.config.format.is_srgb() as u32;

        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
        self.queue
            .write_buffer(&self.obstacles_buffer, 0, bytemuck::bytes_of(&obstacles));

        let frame = self.surface.get_current_texture()?;
        let target = frame.texture.create_view(&Default::default());
        let mut encoder = self.device.create_command_encoder(&Default::default());

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("playfield_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        // Every pixel is overwritten by the fullscreen triangle
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        self.queue.submit([encoder.finish()]);
        frame.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScore;
    use crate::sim::{Obstacle, activate};

    #[test]
    fn test_uniform_sizes_match_shader() {
        assert_eq!(std::mem::size_of::<Globals>(), 64);
        assert_eq!(std::mem::size_of::<ObstacleBlock>(), 16 * MAX_OBSTACLES);
    }

    #[test]
    fn test_pack_scene_copies_obstacles() {
        let mut state = GameState::new(3, HighScore::default());
        activate(&mut state);
        state.obstacles[0].passed = true;

        let (globals, block) = pack_scene(&state, &Settings::default(), (800, 1200), 1.5);
        assert_eq!(globals.obstacle_count, 1);
        assert_eq!(globals.phase, 1);
        assert_eq!(globals.resolution, [800.0, 1200.0]);
        assert_eq!(globals.ground_line, CANVAS_HEIGHT - GROUND_HEIGHT);
        let o = state.obstacles[0];
        assert_eq!(block.items[0], [o.x, o.gap_top, o.gap_size, 1.0]);
        assert_eq!(block.items[1], [0.0; 4]);
    }

    #[test]
    fn test_pack_scene_caps_obstacles() {
        let mut state = GameState::new(3, HighScore::default());
        for i in 0..(MAX_OBSTACLES + 4) {
            state.obstacles.push(Obstacle {
                x: i as f32,
                gap_top: 100.0,
                gap_size: 150.0,
                passed: false,
            });
        }
        let (globals, block) = pack_scene(&state, &Settings::default(), (400, 600), 0.0);
        assert_eq!(globals.obstacle_count as usize, MAX_OBSTACLES);
        assert_eq!(block.items[MAX_OBSTACLES - 1][0], (MAX_OBSTACLES - 1) as f32);
    }

    #[test]
    fn test_reduced_motion_holds_avatar_still() {
        let mut state = GameState::new(3, HighScore::default());
        state.avatar.y = 307.0;
        state.avatar.tilt = 0.8;
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        let (globals, _) = pack_scene(&state, &settings, (400, 600), 0.0);
        assert_eq!(globals.avatar_y, CANVAS_HEIGHT / 2.0);
        assert_eq!(globals.avatar_tilt, 0.0);

        let (globals, _) = pack_scene(&state, &Settings::default(), (400, 600), 0.0);
        assert_eq!(globals.avatar_y, 307.0);
        assert_eq!(globals.avatar_tilt, 0.8);
    }

    #[test]
    fn test_choose_format_prefers_srgb() {
        use wgpu::TextureFormat::*;
        assert_eq!(choose_format(&[Bgra8Unorm, Bgra8UnormSrgb]), Some(Bgra8UnormSrgb));
        assert_eq!(choose_format(&[Rgba8Unorm]), Some(Rgba8Unorm));
        assert_eq!(choose_format(&[]), None);
    }
}
