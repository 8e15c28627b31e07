#[cfg(target_arch = "wasm32")]
mod imp {
    use ::wgpu::util::DeviceExt;
    use gpu::{
        AtmosphereUniformBlock, DecodedTexture, GlobeUniformBlock, MaterialDescriptor,
        MaterialKind, ParticleInstance, ParticleUniformBlock, QUAD_VERTEX_COUNT, SphereMesh,
        SphereVertex,
    };
    use scene::globe::TextureRole;
    use scene::particles::ParticlePoint;
    use scene::{FrameRenderer, FrameSnapshot, GlobeSettings, RenderError, ShadingConfig};
    use std::borrow::Cow;

    const DEPTH_FORMAT: ::wgpu::TextureFormat = ::wgpu::TextureFormat::Depth24Plus;
    const TEXTURE_FORMAT: ::wgpu::TextureFormat = ::wgpu::TextureFormat::Rgba8UnormSrgb;

    struct Material {
        pipeline: ::wgpu::RenderPipeline,
        uniform_buffer: ::wgpu::Buffer,
        bind_group: ::wgpu::BindGroup,
    }

    pub struct WgpuRenderer {
        _instance: &'static ::wgpu::Instance,
        surface: ::wgpu::Surface<'static>,
        device: ::wgpu::Device,
        queue: ::wgpu::Queue,
        config: ::wgpu::SurfaceConfiguration,
        _canvas: web_sys::HtmlCanvasElement,
        depth_view: ::wgpu::TextureView,
        globe: Material,
        globe_layout: ::wgpu::BindGroupLayout,
        sampler: ::wgpu::Sampler,
        day_view: ::wgpu::TextureView,
        night_view: ::wgpu::TextureView,
        atmosphere: Material,
        particles: Material,
        sphere_vertices: ::wgpu::Buffer,
        sphere_indices: ::wgpu::Buffer,
        sphere_index_count: u32,
        particle_instances: Option<::wgpu::Buffer>,
        particle_count: u32,
    }

    fn create_depth_view(
        device: &::wgpu::Device,
        config: &::wgpu::SurfaceConfiguration,
    ) -> ::wgpu::TextureView {
        let tex = device.create_texture(&::wgpu::TextureDescriptor {
            label: Some("globe-depth"),
            size: ::wgpu::Extent3d {
                width: config.width.max(1),
                height: config.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: ::wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        tex.create_view(&::wgpu::TextureViewDescriptor::default())
    }

    fn create_texture_view(
        device: &::wgpu::Device,
        queue: &::wgpu::Queue,
        label: &str,
        image: &DecodedTexture,
    ) -> ::wgpu::TextureView {
        let size = ::wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&::wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: ::wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: ::wgpu::TextureUsages::TEXTURE_BINDING | ::wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            ::wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: ::wgpu::Origin3d::ZERO,
                aspect: ::wgpu::TextureAspect::All,
            },
            &image.pixels,
            ::wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.bytes_per_row()),
                rows_per_image: Some(image.height),
            },
            size,
        );
        texture.create_view(&::wgpu::TextureViewDescriptor::default())
    }

    fn globe_bind_group(
        device: &::wgpu::Device,
        layout: &::wgpu::BindGroupLayout,
        uniforms: &::wgpu::Buffer,
        day: &::wgpu::TextureView,
        night: &::wgpu::TextureView,
        sampler: &::wgpu::Sampler,
    ) -> ::wgpu::BindGroup {
        device.create_bind_group(&::wgpu::BindGroupDescriptor {
            label: Some("globe-day-night-bg"),
            layout,
            entries: &[
                ::wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniforms.as_entire_binding(),
                },
                ::wgpu::BindGroupEntry {
                    binding: 1,
                    resource: ::wgpu::BindingResource::TextureView(day),
                },
                ::wgpu::BindGroupEntry {
                    binding: 2,
                    resource: ::wgpu::BindingResource::TextureView(night),
                },
                ::wgpu::BindGroupEntry {
                    binding: 3,
                    resource: ::wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    fn create_pipeline(
        device: &::wgpu::Device,
        material: &MaterialDescriptor,
        layout: &::wgpu::BindGroupLayout,
        buffers: &[::wgpu::VertexBufferLayout<'static>],
        format: ::wgpu::TextureFormat,
    ) -> ::wgpu::RenderPipeline {
        let shader = device.create_shader_module(::wgpu::ShaderModuleDescriptor {
            label: Some(material.label),
            source: ::wgpu::ShaderSource::Wgsl(Cow::Borrowed(material.source)),
        });
        let pipeline_layout = device.create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
            label: Some(material.label),
            bind_group_layouts: &[layout],
            immediate_size: 0,
        });
        device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some(material.label),
            layout: Some(&pipeline_layout),
            vertex: ::wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers,
            },
            fragment: Some(::wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(material.color_target(format))],
            }),
            primitive: material.primitive_state(),
            depth_stencil: Some(material.depth_stencil(DEPTH_FORMAT)),
            multisample: ::wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }

    /// Pipeline, uniform buffer and bind group for a material without textures.
    fn plain_material(
        device: &::wgpu::Device,
        kind: MaterialKind,
        uniform_size: usize,
        buffers: &[::wgpu::VertexBufferLayout<'static>],
        format: ::wgpu::TextureFormat,
    ) -> Material {
        debug_assert!(!kind.uses_textures(), "{kind:?} needs texture bindings");
        let descriptor = kind.descriptor();
        let layout = device.create_bind_group_layout(&::wgpu::BindGroupLayoutDescriptor {
            label: Some(descriptor.label),
            entries: &kind.layout_entries(),
        });
        let uniform_buffer = device.create_buffer(&::wgpu::BufferDescriptor {
            label: Some(descriptor.label),
            size: uniform_size as u64,
            usage: ::wgpu::BufferUsages::UNIFORM | ::wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&::wgpu::BindGroupDescriptor {
            label: Some(descriptor.label),
            layout: &layout,
            entries: &[::wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        Material {
            pipeline: create_pipeline(device, &descriptor, &layout, buffers, format),
            uniform_buffer,
            bind_group,
        }
    }

    impl WgpuRenderer {
        pub async fn new(
            canvas: web_sys::HtmlCanvasElement,
            width: u32,
            height: u32,
            globe_settings: &GlobeSettings,
        ) -> Result<Self, RenderError> {
            // `wgpu::Surface` must not outlive its `wgpu::Instance`; the
            // instance lives as long as the page.
            let instance: &'static ::wgpu::Instance = Box::leak(Box::new(::wgpu::Instance::new(
                &::wgpu::InstanceDescriptor {
                    backends: ::wgpu::Backends::BROWSER_WEBGPU | ::wgpu::Backends::GL,
                    ..Default::default()
                },
            )));

            let surface = instance
                .create_surface(::wgpu::SurfaceTarget::Canvas(canvas.clone()))
                .map_err(|e| RenderError::Init(format!("surface error: {e}")))?;

            let adapter = instance
                .request_adapter(&::wgpu::RequestAdapterOptions {
                    power_preference: ::wgpu::PowerPreference::HighPerformance,
                    compatible_surface: Some(&surface),
                    force_fallback_adapter: false,
                })
                .await
                .map_err(|e| RenderError::Init(format!("adapter error: {e}")))?;

            let (device, queue) = adapter
                .request_device(&::wgpu::DeviceDescriptor {
                    label: Some("globe-device"),
                    required_features: ::wgpu::Features::empty(),
                    required_limits: ::wgpu::Limits::downlevel_webgl2_defaults(),
                    ..Default::default()
                })
                .await
                .map_err(|e| RenderError::Init(format!("device error: {e}")))?;

            let caps = surface.get_capabilities(&adapter);
            let format = caps
                .formats
                .iter()
                .copied()
                .find(|f| f.is_srgb())
                .or_else(|| caps.formats.first().copied())
                .ok_or_else(|| RenderError::Init("surface reports no formats".into()))?;
            let alpha_mode = caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(::wgpu::CompositeAlphaMode::Auto);

            let config = ::wgpu::SurfaceConfiguration {
                usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
                format,
                width: width.max(1),
                height: height.max(1),
                desired_maximum_frame_latency: 2,
                present_mode: ::wgpu::PresentMode::Fifo,
                alpha_mode,
                view_formats: vec![],
            };
            surface.configure(&device, &config);
            let depth_view = create_depth_view(&device, &config);

            let globe_desc = MaterialKind::DayNightGlobe.descriptor();
            let globe_layout = device.create_bind_group_layout(&::wgpu::BindGroupLayoutDescriptor {
                label: Some(globe_desc.label),
                entries: &MaterialKind::DayNightGlobe.layout_entries(),
            });
            let globe_uniforms = device.create_buffer(&::wgpu::BufferDescriptor {
                label: Some(globe_desc.label),
                size: std::mem::size_of::<GlobeUniformBlock>() as u64,
                usage: ::wgpu::BufferUsages::UNIFORM | ::wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let sampler = device.create_sampler(&::wgpu::SamplerDescriptor {
                label: Some("globe-sampler"),
                address_mode_u: ::wgpu::AddressMode::Repeat,
                address_mode_v: ::wgpu::AddressMode::ClampToEdge,
                mag_filter: ::wgpu::FilterMode::Linear,
                min_filter: ::wgpu::FilterMode::Linear,
                mipmap_filter: ::wgpu::MipmapFilterMode::Linear,
                ..Default::default()
            });
            let fallback = DecodedTexture::fallback();
            let day_view = create_texture_view(&device, &queue, "globe-day", &fallback);
            let night_view = create_texture_view(&device, &queue, "globe-night", &fallback);
            let globe = Material {
                pipeline: create_pipeline(
                    &device,
                    &globe_desc,
                    &globe_layout,
                    &[SphereVertex::LAYOUT],
                    format,
                ),
                bind_group: globe_bind_group(
                    &device,
                    &globe_layout,
                    &globe_uniforms,
                    &day_view,
                    &night_view,
                    &sampler,
                ),
                uniform_buffer: globe_uniforms,
            };

            let atmosphere = plain_material(
                &device,
                MaterialKind::AtmosphereRim,
                std::mem::size_of::<AtmosphereUniformBlock>(),
                &[SphereVertex::LAYOUT],
                format,
            );
            let particles = plain_material(
                &device,
                MaterialKind::ParticleGlow,
                std::mem::size_of::<ParticleUniformBlock>(),
                &[ParticleInstance::LAYOUT],
                format,
            );

            // Segment counts are checked against u16 indices at config load.
            let mesh = SphereMesh::generate(globe_settings.width_segments, globe_settings.height_segments);
            let sphere_vertices = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
                label: Some("globe-sphere-vertices"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: ::wgpu::BufferUsages::VERTEX,
            });
            let sphere_indices = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
                label: Some("globe-sphere-indices"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: ::wgpu::BufferUsages::INDEX,
            });

            log::info!("wgpu ready: {:?} backend, {format:?}", adapter.get_info().backend);

            Ok(Self {
                _instance: instance,
                surface,
                device,
                queue,
                config,
                _canvas: canvas,
                depth_view,
                globe,
                globe_layout,
                sampler,
                day_view,
                night_view,
                atmosphere,
                particles,
                sphere_index_count: mesh.index_count(),
                sphere_vertices,
                sphere_indices,
                particle_instances: None,
                particle_count: 0,
            })
        }

        pub fn max_texture_dimension(&self) -> u32 {
            self.device.limits().max_texture_dimension_2d
        }

        /// Replace one globe texture and rebind.
        pub fn upload_texture(&mut self, role: TextureRole, image: &DecodedTexture) {
            let view = create_texture_view(&self.device, &self.queue, role.label(), image);
            match role {
                TextureRole::Day => self.day_view = view,
                TextureRole::Night => self.night_view = view,
            }
            self.globe.bind_group = globe_bind_group(
                &self.device,
                &self.globe_layout,
                &self.globe.uniform_buffer,
                &self.day_view,
                &self.night_view,
                &self.sampler,
            );
        }

        fn reconfigure(&mut self) {
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, &self.config);
        }
    }

    impl FrameRenderer for WgpuRenderer {
        fn render(
            &mut self,
            snapshot: &FrameSnapshot,
            shading: &ShadingConfig,
        ) -> Result<(), RenderError> {
            let frame = match self.surface.get_current_texture() {
                Ok(frame) => frame,
                Err(::wgpu::SurfaceError::Lost | ::wgpu::SurfaceError::Outdated) => {
                    self.reconfigure();
                    return Err(RenderError::Lost);
                }
                Err(e) => return Err(RenderError::Surface(e.to_string())),
            };
            let view = frame
                .texture
                .create_view(&::wgpu::TextureViewDescriptor::default());

            self.queue.write_buffer(
                &self.globe.uniform_buffer,
                0,
                bytemuck::bytes_of(&GlobeUniformBlock::from_snapshot(snapshot, shading)),
            );
            self.queue.write_buffer(
                &self.atmosphere.uniform_buffer,
                0,
                bytemuck::bytes_of(&AtmosphereUniformBlock::from_snapshot(snapshot, shading)),
            );
            self.queue.write_buffer(
                &self.particles.uniform_buffer,
                0,
                bytemuck::bytes_of(&ParticleUniformBlock::from_snapshot(snapshot, shading)),
            );

            let mut encoder = self
                .device
                .create_command_encoder(&::wgpu::CommandEncoderDescriptor {
                    label: Some("globe-frame-encoder"),
                });
            let clear = shading.clear_color.clamped();
            {
                let mut rpass = encoder.begin_render_pass(&::wgpu::RenderPassDescriptor {
                    label: Some("globe-scene-pass"),
                    color_attachments: &[Some(::wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        depth_slice: None,
                        ops: ::wgpu::Operations {
                            load: ::wgpu::LoadOp::Clear(::wgpu::Color {
                                r: clear.r as f64,
                                g: clear.g as f64,
                                b: clear.b as f64,
                                a: 1.0,
                            }),
                            store: ::wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: Some(::wgpu::RenderPassDepthStencilAttachment {
                        view: &self.depth_view,
                        depth_ops: Some(::wgpu::Operations {
                            load: ::wgpu::LoadOp::Clear(1.0),
                            store: ::wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }),
                    occlusion_query_set: None,
                    timestamp_writes: None,
                    multiview_mask: None,
                });

                // Opaque globe first so the additive layers depth-test against it.
                rpass.set_vertex_buffer(0, self.sphere_vertices.slice(..));
                rpass.set_index_buffer(self.sphere_indices.slice(..), ::wgpu::IndexFormat::Uint16);
                for material in [&self.globe, &self.atmosphere] {
                    rpass.set_pipeline(&material.pipeline);
                    rpass.set_bind_group(0, &material.bind_group, &[]);
                    rpass.draw_indexed(0..self.sphere_index_count, 0, 0..1);
                }

                if let Some(instances) = &self.particle_instances {
                    rpass.set_pipeline(&self.particles.pipeline);
                    rpass.set_bind_group(0, &self.particles.bind_group, &[]);
                    rpass.set_vertex_buffer(0, instances.slice(..));
                    rpass.draw(0..QUAD_VERTEX_COUNT, 0..self.particle_count);
                }
            }

            self.queue.submit(std::iter::once(encoder.finish()));
            frame.present();
            Ok(())
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.config.width = width.max(1);
            self.config.height = height.max(1);
            self.reconfigure();
        }

        fn upload_particles(&mut self, points: &[ParticlePoint]) {
            if points.is_empty() {
                self.particle_instances = None;
                self.particle_count = 0;
                return;
            }
            let instances = ParticleInstance::from_points(points);
            self.particle_instances = Some(self.device.create_buffer_init(
                &::wgpu::util::BufferInitDescriptor {
                    label: Some("globe-particle-instances"),
                    contents: bytemuck::cast_slice(&instances),
                    usage: ::wgpu::BufferUsages::VERTEX,
                },
            ));
            self.particle_count = instances.len() as u32;
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use gpu::DecodedTexture;
    use scene::globe::TextureRole;
    use scene::{FrameRenderer, FrameSnapshot, GlobeSettings, RenderError, ShadingConfig};

    #[derive(Debug, Default)]
    pub struct WgpuRenderer;

    impl WgpuRenderer {
        pub async fn new(
            _canvas: web_sys::HtmlCanvasElement,
            _width: u32,
            _height: u32,
            _globe_settings: &GlobeSettings,
        ) -> Result<Self, RenderError> {
            Err(RenderError::Init(
                "wgpu rendering is only available on wasm32 targets".into(),
            ))
        }

        pub fn max_texture_dimension(&self) -> u32 {
            2048
        }

        pub fn upload_texture(&mut self, _role: TextureRole, _image: &DecodedTexture) {}
    }

    impl FrameRenderer for WgpuRenderer {
        fn render(&mut self, _: &FrameSnapshot, _: &ShadingConfig) -> Result<(), RenderError> {
            Err(RenderError::Surface(
                "wgpu rendering is only available on wasm32 targets".into(),
            ))
        }

        fn resize(&mut self, _width: u32, _height: u32) {}
    }
}

pub use imp::WgpuRenderer;
