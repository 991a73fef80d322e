use std::sync::{Arc, Mutex};
use std::time::Instant;
use wgpu::util::DeviceExt;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use galaxy_core::cloud::LodRep;
use galaxy_core::constants::{CHIRP_END_HZ, CHIRP_SECONDS, CHIRP_START_HZ};
use galaxy_core::effects::EffectData;
use galaxy_core::{Galaxy, GalaxyConfig, MusicBackend, MusicError};
use glam::{Quat, Vec3};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    cam_right: [f32; 4],
    cam_up: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct InstanceData {
    pos: [f32; 3],
    scale: f32,
    color: [f32; 4],
}

fn instance(pos: Vec3, scale: f32, rgb: [f32; 3], alpha: f32) -> InstanceData {
    InstanceData {
        pos: pos.to_array(),
        scale,
        color: [rgb[0], rgb[1], rgb[2], alpha],
    }
}

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

struct GpuState<'w> {
    window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    opaque_pipeline: wgpu::RenderPipeline,
    additive_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    // Scene-constant instances built once at startup.
    static_additive_vb: wgpu::Buffer,
    static_additive_count: u32,
    starfield_vb: wgpu::Buffer,
    starfield_count: u32,
    // Per-frame instances, regrown on demand.
    opaque_vb: wgpu::Buffer,
    opaque_cap: usize,
    additive_vb: wgpu::Buffer,
    additive_cap: usize,
    width: u32,
    height: u32,
}

impl<'w> GpuState<'w> {
    async fn new(window: &'w winit::window::Window, galaxy: &Galaxy) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps.formats[0];
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        let depth_view = create_depth(&device, config.width, config.height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(galaxy_core::SCENE_WGSL.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let instance_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32,
                    offset: 12,
                    shader_location: 1,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 16,
                    shader_location: 2,
                },
            ],
        };

        let make_pipeline = |label: &str, blend: wgpu::BlendState, depth_write: bool| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: std::slice::from_ref(&instance_layout),
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: depth_write,
                    depth_compare: if depth_write {
                        wgpu::CompareFunction::Less
                    } else {
                        wgpu::CompareFunction::Always
                    },
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(blend),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                cache: None,
                multiview: None,
            })
        };
        // Near photo clouds, planet, gifts: normal blending with depth.
        let opaque_pipeline = make_pipeline("opaque", wgpu::BlendState::ALPHA_BLENDING, true);
        // Everything glowy: additive, no depth write.
        let additive_pipeline = make_pipeline(
            "additive",
            wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent::OVER,
            },
            false,
        );

        // Galaxy points and nebulae never change; bake them once.
        let mut static_additive: Vec<InstanceData> =
            Vec::with_capacity(galaxy.galaxy_points.positions.len() + galaxy.nebulae.len());
        for (pos, color) in galaxy
            .galaxy_points
            .positions
            .iter()
            .zip(&galaxy.galaxy_points.colors)
        {
            static_additive.push(self::instance(*pos, 0.3, *color, 1.0));
        }
        for nebula in &galaxy.nebulae {
            static_additive.push(self::instance(nebula.position, nebula.scale, nebula.color, 0.05));
        }
        let static_additive_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("static_additive_vb"),
            contents: bytemuck::cast_slice(&static_additive),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let starfield: Vec<InstanceData> = galaxy
            .starfield
            .iter()
            .map(|p| self::instance(*p, 0.5, [0.9, 0.9, 1.0], 0.8))
            .collect();
        let starfield_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("starfield_vb"),
            contents: bytemuck::cast_slice(&starfield),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let opaque_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("opaque_vb"),
            size: (std::mem::size_of::<InstanceData>() * 1024) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let additive_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("additive_vb"),
            size: (std::mem::size_of::<InstanceData>() * 1024) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            opaque_pipeline,
            additive_pipeline,
            uniform_buffer,
            bind_group,
            depth_view,
            static_additive_count: static_additive.len() as u32,
            static_additive_vb,
            starfield_count: starfield.len() as u32,
            starfield_vb,
            opaque_vb,
            opaque_cap: 1024,
            additive_vb,
            additive_cap: 1024,
            width: size.width.max(1),
            height: size.height.max(1),
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.width = new_size.width;
        self.height = new_size.height;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth(&self.device, self.width, self.height);
    }

    fn upload_dynamic(&mut self, opaque: &[InstanceData], additive: &[InstanceData]) {
        if opaque.len() > self.opaque_cap {
            self.opaque_cap = opaque.len().next_power_of_two();
            self.opaque_vb = self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("opaque_vb"),
                size: (std::mem::size_of::<InstanceData>() * self.opaque_cap) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
        }
        if additive.len() > self.additive_cap {
            self.additive_cap = additive.len().next_power_of_two();
            self.additive_vb = self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("additive_vb"),
                size: (std::mem::size_of::<InstanceData>() * self.additive_cap) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
        }
        self.queue
            .write_buffer(&self.opaque_vb, 0, bytemuck::cast_slice(opaque));
        self.queue
            .write_buffer(&self.additive_vb, 0, bytemuck::cast_slice(additive));
    }

    fn render(&mut self, galaxy: &mut Galaxy) -> Result<(), wgpu::SurfaceError> {
        galaxy.camera.aspect = self.width as f32 / self.height as f32;
        let view_mat = galaxy.camera.view_matrix();
        let basis = view_mat.transpose();
        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: (galaxy.camera.projection_matrix() * view_mat).to_cols_array_2d(),
                cam_right: basis.x_axis.to_array(),
                cam_up: basis.y_axis.to_array(),
            }),
        );

        let (opaque, additive) = build_instances(galaxy);
        self.upload_dynamic(&opaque, &additive);
        let star_draw =
            (self.starfield_count as f32 * galaxy.starfield_draw_fraction()) as u32;

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("rpass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.004,
                            g: 0.004,
                            b: 0.012,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.bind_group, &[]);

            rpass.set_pipeline(&self.opaque_pipeline);
            rpass.set_vertex_buffer(0, self.opaque_vb.slice(..));
            rpass.draw(0..6, 0..opaque.len() as u32);

            rpass.set_pipeline(&self.additive_pipeline);
            rpass.set_vertex_buffer(0, self.static_additive_vb.slice(..));
            rpass.draw(0..6, 0..self.static_additive_count);
            rpass.set_vertex_buffer(0, self.starfield_vb.slice(..));
            rpass.draw(0..6, 0..star_draw);
            rpass.set_vertex_buffer(0, self.additive_vb.slice(..));
            rpass.draw(0..6, 0..additive.len() as u32);
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn create_depth(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("depth"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
        .create_view(&wgpu::TextureViewDescriptor::default())
}

/// Flatten the simulation into sprite instances for the two blend modes.
fn build_instances(galaxy: &Galaxy) -> (Vec<InstanceData>, Vec<InstanceData>) {
    let fade = galaxy.flags.fade_opacity;
    let mut opaque: Vec<InstanceData> = Vec::with_capacity(256);
    let mut additive: Vec<InstanceData> = Vec::with_capacity(8192);

    opaque.push(instance(
        Vec3::ZERO,
        galaxy.planet.radius,
        [0.95, 0.6, 0.3],
        1.0,
    ));

    if galaxy.hint.visible {
        opaque.push(instance(galaxy.hint.position, 2.0, [1.0, 1.0, 1.0], 0.9));
        opaque.push(instance(
            galaxy.hint.position,
            2.0 * galaxy.hint.halo_scale,
            [1.0, 1.0, 1.0],
            galaxy.hint.halo_opacity,
        ));
    }

    for gift in galaxy.gifts.iter() {
        let color = if gift.clicked {
            [1.0, 0.9, 0.4]
        } else {
            [0.95, 0.35, 0.6]
        };
        opaque.push(instance(gift.position, 2.5 * gift.scale, color, fade));
    }

    // One marker per character, strung around the ring circumference.
    for ring in &galaxy.rings {
        let pose = Quat::from_euler(glam::EulerRot::XYZ, ring.tilt, 0.0, ring.roll)
            * Quat::from_rotation_x(ring.pitch);
        let n = ring.text.chars().count().max(1);
        for i in 0..n {
            let a = ring.angle + i as f32 / n as f32 * std::f32::consts::TAU;
            let local = Vec3::new(a.cos() * ring.radius, 0.0, a.sin() * ring.radius);
            opaque.push(instance(
                pose * local,
                0.9,
                [1.0, 0.85, 0.95],
                ring.opacity * fade,
            ));
        }
    }

    for cloud in &galaxy.clouds {
        let model = cloud.model_matrix();
        match cloud.rep {
            LodRep::Near => {
                for (p, c) in cloud.points.iter().zip(&cloud.near_colors) {
                    opaque.push(instance(model.transform_point3(*p), 0.35, *c, fade));
                }
            }
            LodRep::Far => {
                for (p, c) in cloud.points.iter().zip(&cloud.far_colors) {
                    additive.push(instance(model.transform_point3(*p), 0.3, *c, fade));
                }
            }
        }
    }

    for entity in galaxy
        .effects
        .ambient
        .iter()
        .chain(&galaxy.effects.hearts)
        .chain(&galaxy.effects.stars)
        .chain(&galaxy.effects.visitors)
        .filter(|e| galaxy_core::lifecycle::is_visible(e))
    {
        match &entity.data {
            EffectData::Firework(sparks) => {
                for p in sparks {
                    additive.push(instance(p.position, 0.8, p.color, p.opacity * fade));
                }
            }
            EffectData::Confetti(flakes) => {
                for f in flakes {
                    additive.push(instance(f.position, 0.5, f.color, f.opacity * fade));
                }
            }
            EffectData::Sparkle(motes) => {
                for m in motes {
                    additive.push(instance(m.position, 0.4, m.color, m.opacity * fade));
                }
            }
            EffectData::Heart(heart) => {
                additive.push(instance(
                    entity.position,
                    heart.scale,
                    [1.0, 0.3, 0.5],
                    heart.opacity * fade,
                ));
            }
            EffectData::ShootingStar(star) => {
                additive.push(instance(
                    entity.position,
                    1.2,
                    [1.0, 1.0, 1.0],
                    star.head_opacity * fade,
                ));
                for (j, p) in star.trail.iter().enumerate() {
                    let falloff = 1.0 - j as f32 / star.trail.len().max(1) as f32;
                    additive.push(instance(
                        *p,
                        0.6 * falloff,
                        [0.8, 0.9, 1.0],
                        star.head_opacity * falloff * fade,
                    ));
                }
            }
            EffectData::Banner(banner) => {
                additive.push(instance(
                    entity.position,
                    4.0 * banner.scale,
                    [1.0, 0.8, 0.3],
                    banner.opacity * fade,
                ));
            }
            EffectData::Spaceship(ship) => {
                additive.push(instance(entity.position, 3.0, [0.0, 1.0, 0.53], 0.8 * fade));
                // Engine trail behind the hull, pulsing with the glow.
                let tail = entity.position - ship.velocity.normalize_or_zero() * 2.0;
                additive.push(instance(tail, 1.0, [1.0, 0.4, 0.0], ship.engine_glow * fade));
            }
            EffectData::Alien(alien) => {
                additive.push(instance(entity.position, 1.8, [0.0, 1.0, 0.67], 0.8 * fade));
                // Waving arms as two small side sprites.
                let reach = 1.2 + alien.wave_angle;
                additive.push(instance(
                    entity.position + Vec3::new(-reach, -1.0, 0.0),
                    0.5,
                    [0.0, 0.87, 0.53],
                    0.7 * fade,
                ));
                additive.push(instance(
                    entity.position + Vec3::new(reach, -1.0, 0.0),
                    0.5,
                    [0.0, 0.87, 0.53],
                    0.7 * fade,
                ));
            }
        }
    }

    (opaque, additive)
}

// ---------------- Native audio (cpal) ----------------

/// One descending chirp: frequency slides 800 to 200 Hz over 0.3 s while the
/// amplitude decays.
struct ChirpVoice {
    phase: f32,
    samples_emitted: u32,
    total_samples: u32,
}

struct AudioState {
    sample_rate: f32,
    chirps: Vec<ChirpVoice>,
    pad_on: bool,
    pad_phase: [f32; 2],
}

fn mix_sample(state: &mut AudioState) -> f32 {
    let mut out = 0.0f32;
    if state.pad_on {
        // Quiet two-note drone standing in for the backing track.
        let sr = state.sample_rate;
        state.pad_phase[0] += std::f32::consts::TAU * 110.0 / sr;
        state.pad_phase[1] += std::f32::consts::TAU * 165.0 / sr;
        for phase in &mut state.pad_phase {
            if *phase > std::f32::consts::TAU {
                *phase -= std::f32::consts::TAU;
            }
        }
        out += 0.03 * (state.pad_phase[0].sin() + state.pad_phase[1].sin());
    }
    let sr = state.sample_rate;
    let mut i = 0;
    while i < state.chirps.len() {
        let chirp = &mut state.chirps[i];
        let t = chirp.samples_emitted as f32 / chirp.total_samples.max(1) as f32;
        let freq = CHIRP_START_HZ * (CHIRP_END_HZ / CHIRP_START_HZ).powf(t);
        let amp = 0.1 * (1.0 - t);
        out += amp * chirp.phase.sin();
        chirp.phase += std::f32::consts::TAU * freq / sr;
        if chirp.phase > std::f32::consts::TAU {
            chirp.phase -= std::f32::consts::TAU;
        }
        chirp.samples_emitted += 1;
        if chirp.samples_emitted >= chirp.total_samples {
            state.chirps.swap_remove(i);
            continue;
        }
        i += 1;
    }
    out.tanh()
}

/// `MusicBackend` over a cpal output stream. Holding the stream keeps the
/// device open for the life of the backend.
struct CpalMusic {
    state: Arc<Mutex<AudioState>>,
    _stream: cpal::Stream,
}

impl CpalMusic {
    fn open() -> Result<Self, MusicError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| MusicError::Device("no output device".into()))?;
        let config = device
            .default_output_config()
            .map_err(|e| MusicError::Device(e.to_string()))?;
        if config.sample_format() != cpal::SampleFormat::F32 {
            return Err(MusicError::Device(format!(
                "unsupported sample format {:?}",
                config.sample_format()
            )));
        }
        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        let state = Arc::new(Mutex::new(AudioState {
            sample_rate,
            chirps: Vec::new(),
            pad_on: false,
            pad_phase: [0.0; 2],
        }));
        let cb_state = Arc::clone(&state);
        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    let mut guard = cb_state.lock().unwrap();
                    let mut frame = 0usize;
                    while frame < data.len() {
                        let s = mix_sample(&mut guard);
                        for ch in 0..channels {
                            if frame + ch < data.len() {
                                data[frame + ch] = s;
                            }
                        }
                        frame += channels;
                    }
                },
                |err| log::error!("audio stream error: {err}"),
                None,
            )
            .map_err(|e| MusicError::Device(e.to_string()))?;
        stream
            .play()
            .map_err(|e| MusicError::Device(e.to_string()))?;
        Ok(Self {
            state,
            _stream: stream,
        })
    }
}

impl MusicBackend for CpalMusic {
    fn play(&mut self) -> Result<(), MusicError> {
        self.state.lock().unwrap().pad_on = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.state.lock().unwrap().pad_on = false;
    }

    fn chirp(&mut self) {
        let mut guard = self.state.lock().unwrap();
        let total = (CHIRP_SECONDS * guard.sample_rate) as u32;
        guard.chirps.push(ChirpVoice {
            phase: 0.0,
            samples_emitted: 0,
            total_samples: total.max(1),
        });
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let music: Box<dyn MusicBackend> = match CpalMusic::open() {
        Ok(backend) => Box::new(backend),
        Err(err) => {
            log::warn!("audio unavailable, running silent: {err}");
            Box::<galaxy_core::NullBackend>::default()
        }
    };
    let mut galaxy = Galaxy::new(GalaxyConfig::default(), music);

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Birthday Galaxy")
        .build(&event_loop)?;

    let mut state = pollster::block_on(GpuState::new(&window, &galaxy))?;
    let start = Instant::now();
    let mut mouse = (0.0f32, 0.0f32);
    let mut pending_accept: Option<u32> = None;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => state.resize(size),
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::WindowEvent {
            event: WindowEvent::CursorMoved { position, .. },
            ..
        } => mouse = (position.x as f32, position.y as f32),
        Event::WindowEvent {
            event:
                WindowEvent::MouseInput {
                    state: ElementState::Pressed,
                    button: MouseButton::Left,
                    ..
                },
            ..
        } => {
            galaxy.click(
                mouse.0,
                mouse.1,
                state.width as f32,
                state.height as f32,
                start.elapsed().as_secs_f64(),
            );
        }
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(KeyCode::Enter),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                },
            ..
        } => {
            if let Some(token) = pending_accept.take() {
                galaxy.accept_popup(token, start.elapsed().as_secs_f64());
            }
        }
        Event::AboutToWait => {
            galaxy.frame(start.elapsed().as_secs_f64());
            for popup in galaxy.drain_popups() {
                // Popups land in the log; Enter accepts a two-button one.
                match popup.accept_token {
                    Some(token) => {
                        pending_accept = Some(token);
                        log::info!("[popup] {} (press Enter to accept)", popup.message);
                    }
                    None => log::info!("[popup] {}", popup.message),
                }
            }
            match state.render(&mut galaxy) {
                Ok(_) => state.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                Err(_) => {}
            }
        }
        _ => {}
    })?;
    Ok(())
}
