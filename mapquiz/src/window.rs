//! The interactive window: winit event loop plus wgpu presentation.

use crate::render::{MapVersion, Renderer};
use anyhow::{Context, Result, anyhow};
use image::RgbaImage;
use mapquiz::app::{Action, AppCore, HudText};
use mapquiz::camera::ViewUniform;
use mapquiz::text::TextRenderer;
use quizdata::ColorKey;
use std::time::Instant;
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

/// Maps a pressed key to a player command.
pub fn action_for_key(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::KeyR => Some(Action::Reset),
        KeyCode::KeyL => Some(Action::Learn),
        KeyCode::KeyQ => Some(Action::Quit),
        KeyCode::KeyS => Some(Action::DebugDump),
        KeyCode::Tab => Some(Action::NextCountry),
        KeyCode::Digit1 => Some(Action::SwitchCountry(0)),
        KeyCode::Digit2 => Some(Action::SwitchCountry(1)),
        KeyCode::Digit3 => Some(Action::SwitchCountry(2)),
        KeyCode::Digit4 => Some(Action::SwitchCountry(3)),
        KeyCode::Digit5 => Some(Action::SwitchCountry(4)),
        _ => None,
    }
}

/// Window, GPU state and the game core.
struct App {
    /// The winit window.
    window: winit::window::Window,
    /// wgpu surface for presenting frames.
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: Renderer,
    text: TextRenderer,
    core: AppCore,
    /// HUD items currently uploaded, to skip re-rasterizing unchanged text.
    last_hud: Vec<HudText>,
    last_frame: Instant,
}

impl App {
    async fn new(
        window: winit::window::Window,
        core: AppCore,
        text: TextRenderer,
        background: ColorKey,
    ) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());

        // SAFETY: window lives as long as surface (both in App struct)
        let surface = unsafe {
            instance.create_surface_unsafe(
                wgpu::SurfaceTargetUnsafe::from_window(&window)
                    .map_err(|e| anyhow!("window has no raw handle: {}", e))?,
            )
        }
        .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to find a suitable GPU adapter")?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("mapquiz device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .context("Failed to create device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = Renderer::new(
            &device,
            &queue,
            surface_format,
            core.catalog.active().reveal.image(),
            map_version(&core),
            background,
        );

        let mut core = core;
        core.resize(size.width, size.height);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            text,
            core,
            last_hud: Vec::new(),
            last_frame: Instant::now(),
        })
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.core.resize(new_size.width, new_size.height);
        }
    }

    fn reconfigure_surface(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn update_title(&self) {
        self.window
            .set_title(&format!("Map quiz - {}", self.core.catalog.active().label));
    }

    /// Handles input events. Returns whether the event was consumed.
    fn input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(action) = action_for_key(*key) {
                    self.core.on_key(action);
                    self.update_title();
                }
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y as f64,
                    // Convert pixel delta to line delta (approximate)
                    MouseScrollDelta::PixelDelta(pos) => pos.y / 40.0,
                };
                self.core.on_scroll(lines);
                true
            }
            WindowEvent::MouseInput { button, state, .. } => {
                let pressed = *state == ElementState::Pressed;
                match button {
                    MouseButton::Left if pressed => {
                        let outcome = self.core.on_left_click();
                        log::debug!("Click: {:?}", outcome);
                    }
                    MouseButton::Right => self.core.set_panning(pressed),
                    _ => {}
                }
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.core.on_cursor_moved(position.x, position.y);
                true
            }
            _ => false,
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let size = self.core.size;

        // Regenerate the map texture only when the reveal bitmap changed
        let version = map_version(&self.core);
        self.renderer.sync_map(
            &self.device,
            &self.queue,
            self.core.catalog.active().reveal.image(),
            version,
        );

        let frame = self.core.hud_frame();
        if frame != self.last_hud || self.renderer.hud_size() != size {
            let overlay: RgbaImage = self.text.render_hud(&frame, size.0, size.1);
            self.renderer.update_hud(&self.device, &self.queue, &overlay);
            self.last_hud = frame;
        }

        let map_view = self
            .core
            .camera
            .to_uniform(self.core.layout().world_rect(), size);
        self.renderer
            .update_view(&self.queue, map_view, ViewUniform::screen_overlay(size));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.renderer.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.renderer.draw(&mut render_pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn map_version(core: &AppCore) -> MapVersion {
    (
        core.catalog.generation(),
        core.catalog.active().reveal.revision(),
        core.catalog.active_index(),
    )
}

/// Opens the quiz window and runs until the player quits.
pub fn run(core: AppCore, text: TextRenderer, background: ColorKey) -> Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;

    let (width, height) = core.size;
    let window = WindowBuilder::new()
        .with_title("Map quiz")
        .with_inner_size(PhysicalSize::new(width, height))
        .with_resizable(true)
        .build(&event_loop)
        .context("Failed to create window")?;

    log::info!("Created window: {}x{}", width, height);

    let mut app = pollster::block_on(App::new(window, core, text, background))?;
    app.update_title();

    event_loop.run(move |event, control_flow| match event {
        Event::WindowEvent {
            ref event,
            window_id,
        } if window_id == app.window.id() => {
            if app.input(event) {
                return;
            }
            match event {
                WindowEvent::CloseRequested => control_flow.exit(),
                WindowEvent::Resized(physical_size) => app.resize(*physical_size),
                WindowEvent::RedrawRequested => match app.render() {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => app.reconfigure_surface(),
                    Err(wgpu::SurfaceError::Outdated) => app.reconfigure_surface(),
                    Err(wgpu::SurfaceError::OutOfMemory) => control_flow.exit(),
                    Err(e) => log::warn!("Render error: {:?}", e),
                },
                _ => {}
            }
        }
        Event::AboutToWait => {
            let now = Instant::now();
            let dt = now.duration_since(app.last_frame).as_secs_f32();
            app.last_frame = now;

            if app.core.tick(dt).should_exit {
                control_flow.exit();
                return;
            }
            app.window.request_redraw();
        }
        _ => {}
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(action_for_key(KeyCode::KeyR), Some(Action::Reset));
        assert_eq!(action_for_key(KeyCode::KeyL), Some(Action::Learn));
        assert_eq!(action_for_key(KeyCode::KeyQ), Some(Action::Quit));
        assert_eq!(action_for_key(KeyCode::KeyS), Some(Action::DebugDump));
        assert_eq!(action_for_key(KeyCode::Digit3), Some(Action::SwitchCountry(2)));
        assert_eq!(action_for_key(KeyCode::Tab), Some(Action::NextCountry));
        assert_eq!(action_for_key(KeyCode::KeyX), None);
    }
}
