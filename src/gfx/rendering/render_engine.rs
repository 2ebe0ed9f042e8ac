//! WGPU-based rendering engine
//!
//! Owns the surface, device and every pipeline. Each frame runs an optional
//! depth-only shadow pass from the shadow-casting directional light, then the
//! main pass with one pipeline per [`FaceCulling`] mode.

use std::sync::Arc;

use wgpu::{util::DeviceExt, TextureFormat};

use crate::{
    config::RendererConfig,
    error::{Result, SceneError},
    gfx::{
        camera::{Camera, PerspectiveCamera, ShadowCamera},
        render_loop::Renderer,
        resources::{
            global_bindings::{GlobalBindings, GlobalUniform},
            material::FaceCulling,
            texture_resource::TextureResource,
        },
        scene::{DrawObject, ObjectGpuResources, ObjectUniform, SceneGraph, SceneObject},
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

const SHADOW_PIPELINE: &str = "Shadow";
const FACE_CULLING_MODES: [FaceCulling; 3] =
    [FaceCulling::Front, FaceCulling::Back, FaceCulling::Double];

fn main_pipeline_name(side: FaceCulling) -> &'static str {
    match side {
        FaceCulling::Front => "Main Front",
        FaceCulling::Back => "Main Back",
        FaceCulling::Double => "Main Double",
    }
}

fn unavailable(what: &str, err: impl std::fmt::Display) -> SceneError {
    SceneError::RendererUnavailable(format!("{what}: {err}"))
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    depth_texture: TextureResource,
    pipeline_manager: PipelineManager,
    global_bindings: GlobalBindings,
    object_layout: BindGroupLayoutWithDesc,

    // Shadow mapping resources
    shadow_map: TextureResource,
    shadow_bind_group: wgpu::BindGroup,
    shadows_enabled: bool,
    shadow_extent: f32,

    clear_color: wgpu::Color,
}

impl RenderEngine {
    /// Creates a render engine drawing into `window`
    ///
    /// Fails with [`SceneError::RendererUnavailable`] when no surface,
    /// adapter or device can be obtained.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        settings: &RendererConfig,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|e| unavailable("surface", e))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| unavailable("adapter", e))?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| unavailable("device", e))?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| unavailable("surface", "no supported texture format"))?;

        let present_mode = if settings.vsync {
            wgpu::PresentMode::Fifo
        } else {
            [wgpu::PresentMode::Mailbox, wgpu::PresentMode::Immediate]
                .into_iter()
                .find(|mode| surface_capabilities.present_modes.contains(mode))
                .unwrap_or(wgpu::PresentMode::Fifo)
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "Surface configured: {:?} {}x{} {:?}",
            format,
            config.width,
            config.height,
            present_mode
        );

        let depth_texture = TextureResource::create_depth_texture(
            &device,
            config.width,
            config.height,
            "Depth Texture",
        );

        let max_dimension = device.limits().max_texture_dimension_2d;
        let shadow_size = if settings.shadow_map_size > max_dimension {
            log::warn!(
                "Shadow map size {} exceeds device limit, using {}",
                settings.shadow_map_size,
                max_dimension
            );
            max_dimension
        } else {
            settings.shadow_map_size
        };
        let shadow_map = TextureResource::create_shadow_map(&device, shadow_size);

        let global_bindings = GlobalBindings::new(&device);
        let object_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(&device, "Object Bind Group Layout");
        let shadow_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_depth_2d())
            .next_binding_fragment(binding_types::sampler(
                wgpu::SamplerBindingType::Comparison,
            ))
            .create(&device, "Shadow Bind Group Layout");
        let shadow_bind_group = BindGroupBuilder::new(&shadow_layout)
            .texture(&shadow_map.view)
            .sampler(&shadow_map.sampler)
            .create(&device, "Shadow Bind Group");

        let device: Arc<wgpu::Device> = device.into();
        let queue: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader("scene", include_str!("scene.wgsl"));
        pipeline_manager.load_shader("shadow", include_str!("shadow.wgsl"));

        // Both faces go into the shadow map so thin shapes still cast
        pipeline_manager.register_pipeline(
            SHADOW_PIPELINE,
            PipelineConfig::default_with_shader("shadow")
                .with_label("Shadow Pass")
                .with_vertex_only()
                .with_cull_mode(None)
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_depth_bias(2, 2.0)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    object_layout.layout.clone(),
                ]),
        );

        for side in FACE_CULLING_MODES {
            let name = main_pipeline_name(side);
            pipeline_manager.register_pipeline(
                name,
                PipelineConfig::default_with_shader("scene")
                    .with_label(name)
                    .with_cull_mode(side.cull_mode())
                    .with_depth_format(TextureResource::DEPTH_FORMAT)
                    .with_color_format(format)
                    .with_bind_group_layouts(vec![
                        global_bindings.bind_group_layout().clone(),
                        object_layout.layout.clone(),
                        shadow_layout.layout.clone(),
                    ]),
            );
        }
        pipeline_manager.create_all_pipelines()?;

        let [r, g, b, a] = settings.clear_color;
        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            format,
            depth_texture,
            pipeline_manager,
            global_bindings,
            object_layout,
            shadow_map,
            shadow_bind_group,
            shadows_enabled: settings.shadows_enabled,
            shadow_extent: settings.shadow_extent,
            clear_color: wgpu::Color { r, g, b, a },
        })
    }

    /// Creates vertex, index and uniform buffers for one object
    fn upload(&self, object: &SceneObject) -> ObjectGpuResources {
        let geometry = object.geometry();
        let label = object.name.as_str();

        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Vertices")),
                contents: bytemuck::cast_slice(&geometry.to_vertices()),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Indices")),
                contents: bytemuck::cast_slice(&geometry.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        let uniform = UniformBuffer::new_with_data(&self.device, &ObjectUniform::new(object));
        let bind_group = BindGroupBuilder::new(&self.object_layout)
            .resource(uniform.binding_resource())
            .create(&self.device, &format!("{label} Bind Group"));

        ObjectGpuResources {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
            uniform,
            bind_group,
        }
    }

    /// The light camera for this frame, when shadows are on and a light casts
    fn shadow_camera(&self, scene: &SceneGraph) -> Option<ShadowCamera> {
        if !self.shadows_enabled {
            return None;
        }
        scene
            .shadow_light()
            .and_then(|light| ShadowCamera::for_light(light, self.shadow_extent))
    }

    fn acquire_frame(&mut self) -> Result<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(frame),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                Err(SceneError::SurfaceLost)
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface texture timed out, skipping frame");
                Err(SceneError::SurfaceLost)
            }
            Err(e) => Err(unavailable("surface texture", e)),
        }
    }

    /// Enables or disables the shadow pass
    pub fn set_shadows_enabled(&mut self, enabled: bool) {
        if self.shadows_enabled != enabled {
            log::info!("Shadows {}", if enabled { "enabled" } else { "disabled" });
            self.shadows_enabled = enabled;
        }
    }

    pub fn shadows_enabled(&self) -> bool {
        self.shadows_enabled
    }

    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

impl Renderer for RenderEngine {
    fn set_viewport_size(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, width, height, "Depth Texture");
        log::debug!("Surface reconfigured to {}x{}", width, height);
    }

    fn prepare(&mut self, scene: &mut SceneGraph) -> Result<()> {
        for object in scene.iter_mut() {
            if object.is_uploaded() {
                object.sync_uniform(&self.queue);
            } else {
                log::debug!(
                    "Uploading {} ({} triangles)",
                    object.name,
                    object.geometry().triangle_count()
                );
                object.gpu = Some(self.upload(object));
            }
        }
        Ok(())
    }

    fn draw(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera) -> Result<()> {
        let light_view_proj = self
            .shadow_camera(scene)
            .map(|shadow_camera| shadow_camera.build_view_projection_matrix());
        self.global_bindings
            .update(&self.queue, GlobalUniform::new(scene, camera, light_view_proj));

        let frame = self.acquire_frame()?;
        let frame_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // PASS 1: shadow depth from the light
        if light_view_proj.is_some() {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Depth Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(pipeline) = self.pipeline_manager.pipeline(SHADOW_PIPELINE) {
                shadow_pass.set_pipeline(pipeline);
                shadow_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
                for object in scene.iter().filter(|object| object.casts_shadow) {
                    shadow_pass.draw_object(object, 1);
                }
            } else {
                log::error!("Shadow pipeline missing, skipping shadow pass");
            }
        }

        // PASS 2: main pass, grouped by face culling mode
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
            render_pass.set_bind_group(2, &self.shadow_bind_group, &[]);

            for side in FACE_CULLING_MODES {
                let mut objects = scene
                    .iter()
                    .filter(|object| object.material.side == side)
                    .peekable();
                if objects.peek().is_none() {
                    continue;
                }
                let Some(pipeline) = self.pipeline_manager.pipeline(main_pipeline_name(side))
                else {
                    log::error!("Pipeline '{}' missing", main_pipeline_name(side));
                    continue;
                };
                render_pass.set_pipeline(pipeline);
                for object in objects {
                    render_pass.draw_object(object, 1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}
