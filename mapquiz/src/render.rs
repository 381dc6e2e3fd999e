use mapquiz::camera::ViewUniform;
use quizdata::ColorKey;
use wgpu::util::DeviceExt;

/// A wrapper around WGPU texture resources (texture, view, sampler).
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl Texture {
    /// Creates a texture from an RGBA image and uploads it immediately.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::RgbaImage,
        label: Option<&str>,
    ) -> Self {
        let dimensions = (img.width().max(1), img.height().max(1));
        let size = wgpu::Extent3d {
            width: dimensions.0,
            height: dimensions.1,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        if img.width() > 0 && img.height() > 0 {
            queue.write_texture(
                wgpu::ImageCopyTexture {
                    aspect: wgpu::TextureAspect::All,
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                },
                img,
                wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * dimensions.0),
                    rows_per_image: Some(dimensions.1),
                },
                size,
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        // Nearest keeps the flat region colors crisp when zoomed in
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }
}

/// Identifies which reveal pixels a display texture was built from:
/// (catalog generation, reveal revision, active country index).
pub type MapVersion = (u64, u64, usize);

/// GPU resources for the map quad and the HUD overlay.
pub struct Renderer {
    map_pipeline: wgpu::RenderPipeline,
    hud_pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,

    map_texture: Texture,
    map_bind_group: wgpu::BindGroup,
    map_uniform: wgpu::Buffer,
    map_version: MapVersion,

    hud_texture: Texture,
    hud_bind_group: wgpu::BindGroup,
    hud_uniform: wgpu::Buffer,

    pub clear_color: wgpu::Color,
}

impl Renderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        map: &image::RgbaImage,
        version: MapVersion,
        background: ColorKey,
    ) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
            label: Some("texture_bind_group_layout"),
        });

        let shader = device.create_shader_module(wgpu::include_wgsl!("shader.wgsl"));
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Quad Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        // The map replaces the background, the HUD blends over it
        let map_pipeline = create_pipeline(
            device,
            &layout,
            &shader,
            format,
            wgpu::BlendState::REPLACE,
            "Map Pipeline",
        );
        let hud_pipeline = create_pipeline(
            device,
            &layout,
            &shader,
            format,
            wgpu::BlendState::ALPHA_BLENDING,
            "HUD Pipeline",
        );

        let map_uniform = create_uniform(device, "Map Camera Buffer");
        let hud_uniform = create_uniform(device, "HUD Camera Buffer");

        let map_texture = Texture::from_image(device, queue, map, Some("Map Texture"));
        let map_bind_group =
            create_bind_group(device, &bind_group_layout, &map_texture, &map_uniform, "map");

        let hud_texture =
            Texture::from_image(device, queue, &image::RgbaImage::new(1, 1), Some("HUD Texture"));
        let hud_bind_group =
            create_bind_group(device, &bind_group_layout, &hud_texture, &hud_uniform, "hud");

        Self {
            map_pipeline,
            hud_pipeline,
            bind_group_layout,
            map_texture,
            map_bind_group,
            map_uniform,
            map_version: version,
            hud_texture,
            hud_bind_group,
            hud_uniform,
            clear_color: clear_color(background),
        }
    }

    /// Regenerates the map texture if the reveal bitmap changed since the
    /// last upload. Returns whether a new texture was created.
    pub fn sync_map(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::RgbaImage,
        version: MapVersion,
    ) -> bool {
        if version == self.map_version {
            return false;
        }
        // Build the replacement first; the old texture is dropped on assignment
        let texture = Texture::from_image(device, queue, img, Some("Map Texture"));
        let bind_group = create_bind_group(
            device,
            &self.bind_group_layout,
            &texture,
            &self.map_uniform,
            "map",
        );
        self.map_texture = texture;
        self.map_bind_group = bind_group;
        self.map_version = version;
        log::debug!(
            "Regenerated map texture {:?} for version {:?}",
            self.map_texture.texture.size(),
            version
        );
        true
    }

    /// Replaces the HUD overlay with a freshly rasterized frame.
    pub fn update_hud(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::RgbaImage,
    ) {
        let texture = Texture::from_image(device, queue, img, Some("HUD Texture"));
        let bind_group = create_bind_group(
            device,
            &self.bind_group_layout,
            &texture,
            &self.hud_uniform,
            "hud",
        );
        self.hud_texture = texture;
        self.hud_bind_group = bind_group;
    }

    /// Pixel size of the current HUD overlay.
    pub fn hud_size(&self) -> (u32, u32) {
        let size = self.hud_texture.texture.size();
        (size.width, size.height)
    }

    pub fn update_view(&self, queue: &wgpu::Queue, map: ViewUniform, hud: ViewUniform) {
        queue.write_buffer(&self.map_uniform, 0, bytemuck::cast_slice(&[map]));
        queue.write_buffer(&self.hud_uniform, 0, bytemuck::cast_slice(&[hud]));
    }

    pub fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_pipeline(&self.map_pipeline);
        render_pass.set_bind_group(0, &self.map_bind_group, &[]);
        render_pass.draw(0..6, 0..1);

        render_pass.set_pipeline(&self.hud_pipeline);
        render_pass.set_bind_group(0, &self.hud_bind_group, &[]);
        render_pass.draw(0..6, 0..1);
    }
}

fn create_uniform(device: &wgpu::Device, label: &str) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(&[ViewUniform::screen_overlay((1, 1))]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

fn create_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &Texture,
    uniform: &wgpu::Buffer,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: uniform.as_entire_binding(),
            },
        ],
        label: Some(&format!("{}_bind_group", label)),
    })
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    blend: wgpu::BlendState,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: "vs_main",
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}

/// Converts an sRGB color key to the linear clear color of an sRGB surface.
fn clear_color(key: ColorKey) -> wgpu::Color {
    let [r, g, b, a] = key.rgba();
    let linear = |c: u8| (c as f64 / 255.0).powf(2.2);
    wgpu::Color {
        r: linear(r),
        g: linear(g),
        b: linear(b),
        a: a as f64 / 255.0,
    }
}
