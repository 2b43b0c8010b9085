//! audiomorph - a sphere that breathes with the music
//!
//! Bass swells the whole surface, treble roughens it with drifting noise,
//! and the shape slowly tumbles whether or not anything is playing.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use audiomorph::audio::AudioSystem;
use audiomorph::cli::Args;
use audiomorph::mesh::Mesh;
use audiomorph::noise::NoiseField;
use audiomorph::params::{audio_constants::GAIN_STEP, AppConfig};
use audiomorph::rendering::RenderSystem;
use audiomorph::scheduler::{FrameContext, FrameScheduler, GainControl, PlaybackState};
use audiomorph::spectrum::{SpectrumSource, StaticSpectrum};

/// Main application state
struct App {
    config: AppConfig,

    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Morph pipeline
    scheduler: FrameScheduler,
    mesh: Mesh,

    /// None when no output device could be opened
    audio: Option<AudioSystem>,
    /// Stand-in spectrum without audio
    silence: StaticSpectrum,

    start_time: Instant,

    /// Fatal error raised inside the event loop
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(config: AppConfig) -> anyhow::Result<Self> {
        let morph = &config.morph;
        let mesh = Mesh::icosphere(morph.base_radius, morph.mesh_detail);
        let noise = NoiseField::new(morph.noise, morph.noise_seed);
        let scheduler = FrameScheduler::new(morph, &config.spectrum, noise)
            .context("failed to build morph pipeline")?;

        info!(
            "Mesh: {} vertices, {} triangles (detail {})",
            mesh.vertex_count(),
            mesh.triangle_count(),
            morph.mesh_detail
        );

        Ok(Self {
            silence: StaticSpectrum::filled(config.spectrum.bin_count, 0),
            config,
            window: None,
            render_system: None,
            scheduler,
            mesh,
            audio: None,
            start_time: Instant::now(),
            failure: None,
        })
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title("audiomorph")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.render.window_width,
                self.config.render.window_height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("failed to create window")?,
        );

        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &self.mesh,
            self.config.render.clone(),
            self.config.camera.clone(),
        ))
        .context("failed to initialise renderer")?;

        // Visuals still run without sound
        match AudioSystem::new(&self.config.analyser, &self.config.audio) {
            Ok(audio) => self.audio = Some(audio),
            Err(e) => warn!("Audio disabled: {}", e),
        }

        info!("audiomorph is running");
        info!("Space: play/pause, Up/Down: gain, W: wireframe, Esc: quit");

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.start_time = Instant::now();
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, event_loop: &ActiveEventLoop) {
        match key {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::Space => {
                if let Some(audio) = &self.audio {
                    let playing = audio.transport().toggle();
                    info!("Playback: {}", if playing { "playing" } else { "paused" });
                }
            }
            KeyCode::ArrowUp | KeyCode::ArrowDown => {
                if let Some(audio) = &self.audio {
                    let step = if key == KeyCode::ArrowUp {
                        GAIN_STEP
                    } else {
                        -GAIN_STEP
                    };
                    let gain = audio.gain();
                    gain.set_gain(gain.gain() + step);
                    info!("Gain: {:.1}", gain.gain());
                }
            }
            KeyCode::KeyW => {
                if let Some(render_system) = &mut self.render_system {
                    let on = render_system.toggle_wireframe();
                    info!("Wireframe: {}", if on { "on" } else { "off" });
                }
            }
            _ => {}
        }
    }

    /// Run one scheduler tick and draw it
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };

        let spectrum: &dyn SpectrumSource = match &self.audio {
            Some(audio) => audio.spectrum(),
            None => &self.silence,
        };
        let playback: &dyn PlaybackState = match &self.audio {
            Some(audio) => audio.transport(),
            None => &true,
        };

        let ctx = FrameContext {
            mesh: &mut self.mesh,
            spectrum,
            playback,
            elapsed_ms: self.start_time.elapsed().as_secs_f64() * 1000.0,
        };

        if let Err(e) = self.scheduler.tick(ctx, render_system) {
            error!("Render error: {}", e);
            self.failure = Some(anyhow::Error::new(e).context("rendering failed"));
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }
        if let Err(e) = self.init(event_loop) {
            self.failure = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(key),
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(key, event_loop),
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.resolve_config().context("invalid configuration")?;

    if args.dump_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let mut app = App::new(config)?;
    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
