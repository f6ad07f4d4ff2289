//! Main GUI application.

use std::time::{Duration, Instant};

use eframe::egui;
use egui::{Color32, Pos2, Rect, TextureHandle, TextureOptions};

use crate::config::Config;
use crate::game::SinglePlayer;
use crate::sprites::SpriteBank;
use crate::trainer::Trainer;

/// What the window shows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Watch a population train
    Train,
    /// Play a single bird with the space bar
    Play,
}

/// Uploaded GPU textures for every sprite
struct Textures {
    background: TextureHandle,
    bird: [TextureHandle; 3],
    pipe_top: TextureHandle,
    pipe_bottom: TextureHandle,
    base: TextureHandle,
}

impl Textures {
    fn upload(ctx: &egui::Context, sprites: &SpriteBank) -> Self {
        let tex = |name: &str, img: &image::RgbaImage| {
            let size = [img.width() as usize, img.height() as usize];
            let color = egui::ColorImage::from_rgba_unpremultiplied(size, img.as_raw());
            ctx.load_texture(name, color, TextureOptions::NEAREST)
        };

        Self {
            background: tex("background", &sprites.background),
            bird: [
                tex("bird0", &sprites.bird[0].image),
                tex("bird1", &sprites.bird[1].image),
                tex("bird2", &sprites.bird[2].image),
            ],
            pipe_top: tex("pipe_top", &sprites.pipe_top.image),
            pipe_bottom: tex("pipe_bottom", &sprites.pipe_bottom.image),
            base: tex("base", &sprites.base.image),
        }
    }
}

/// Main application state
pub struct FlapnetApp {
    mode: Mode,
    trainer: Trainer,
    player: SinglePlayer,
    config: Config,
    textures: Option<Textures>,
    /// Ticks per rendered frame in train mode
    speed: u32,
    paused: bool,
    last_step: Instant,
}

impl FlapnetApp {
    /// Create a new application with the given configuration
    pub fn new(config: Config, mode: Mode) -> Self {
        let trainer = Trainer::new(config.clone());
        let player = SinglePlayer::new(config.clone(), &trainer.sprites);
        Self {
            mode,
            trainer,
            player,
            config,
            textures: None,
            speed: 1,
            paused: false,
            last_step: Instant::now(),
        }
    }

    /// Create with default configuration
    pub fn with_defaults(mode: Mode) -> Self {
        Self::new(Config::default(), mode)
    }

    fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.config.window.fps as f64)
    }

    fn step_simulation(&mut self) {
        match self.mode {
            Mode::Train => {
                for _ in 0..self.speed {
                    self.trainer.tick();
                }
            }
            Mode::Play => {
                if self.player.alive {
                    self.player.step(&self.trainer.sprites);
                }
            }
        }
    }

    fn handle_input(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            match self.mode {
                Mode::Play => {
                    if self.player.alive {
                        self.player.jump();
                    } else {
                        self.player.reset(&self.trainer.sprites);
                    }
                }
                Mode::Train => self.paused = !self.paused,
            }
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Tab)) {
            self.mode = match self.mode {
                Mode::Train => Mode::Play,
                Mode::Play => Mode::Train,
            };
        }
    }

    /// Paint the world: background, pipes, base, then birds on top.
    fn draw_world(&self, painter: &egui::Painter, origin: Pos2) {
        let textures = match &self.textures {
            Some(t) => t,
            None => return,
        };
        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        let at = |x: f32, y: f32, tex: &TextureHandle| {
            let size = tex.size_vec2();
            Rect::from_min_size(Pos2::new(origin.x + x, origin.y + y), size)
        };

        painter.image(
            textures.background.id(),
            at(0.0, 0.0, &textures.background),
            uv,
            Color32::WHITE,
        );

        let (pipes, base) = match self.mode {
            Mode::Train => (&self.trainer.session.pipes, &self.trainer.session.base),
            Mode::Play => (&self.player.session.pipes, &self.player.session.base),
        };

        for pipe in pipes {
            painter.image(
                textures.pipe_top.id(),
                at(pipe.x, pipe.top as f32, &textures.pipe_top),
                uv,
                Color32::WHITE,
            );
            painter.image(
                textures.pipe_bottom.id(),
                at(pipe.x, pipe.bottom as f32, &textures.pipe_bottom),
                uv,
                Color32::WHITE,
            );
        }

        painter.image(textures.base.id(), at(base.x1, base.y, &textures.base), uv, Color32::WHITE);
        painter.image(textures.base.id(), at(base.x2, base.y, &textures.base), uv, Color32::WHITE);

        match self.mode {
            Mode::Train => {
                for agent in &self.trainer.agents {
                    self.draw_bird(painter, origin, &agent.bird, textures);
                }
            }
            Mode::Play => {
                self.draw_bird(painter, origin, &self.player.bird, textures);
            }
        }
    }

    /// Birds rotate around their center by the current tilt. Screen y grows
    /// downward, so a nose-up tilt is a negative rotation angle.
    fn draw_bird(
        &self,
        painter: &egui::Painter,
        origin: Pos2,
        bird: &crate::bird::Bird,
        textures: &Textures,
    ) {
        let tex = &textures.bird[bird.frame.min(2)];
        let size = tex.size_vec2();
        let rect = Rect::from_min_size(
            Pos2::new(origin.x + bird.x, origin.y + bird.y),
            size,
        );

        let mut mesh = egui::Mesh::with_texture(tex.id());
        mesh.add_rect_with_uv(
            rect,
            Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
            Color32::WHITE,
        );
        mesh.rotate(
            egui::emath::Rot2::from_angle(-bird.tilt.to_radians()),
            rect.center(),
        );
        painter.add(egui::Shape::mesh(mesh));
    }

    fn draw_hud(&self, painter: &egui::Painter, origin: Pos2) {
        let width = self.config.window.width as f32;
        let font = egui::FontId::proportional(28.0);

        match self.mode {
            Mode::Train => {
                painter.text(
                    Pos2::new(origin.x + width - 10.0, origin.y + 10.0),
                    egui::Align2::RIGHT_TOP,
                    format!("Score: {}", self.trainer.session.score),
                    font.clone(),
                    Color32::WHITE,
                );
                painter.text(
                    Pos2::new(origin.x + 10.0, origin.y + 10.0),
                    egui::Align2::LEFT_TOP,
                    format!("Gen: {}", self.trainer.generation),
                    font.clone(),
                    Color32::WHITE,
                );
                painter.text(
                    Pos2::new(origin.x + 10.0, origin.y + 45.0),
                    egui::Align2::LEFT_TOP,
                    format!("Alive: {}", self.trainer.population()),
                    font,
                    Color32::WHITE,
                );
            }
            Mode::Play => {
                painter.text(
                    Pos2::new(origin.x + width - 10.0, origin.y + 10.0),
                    egui::Align2::RIGHT_TOP,
                    format!("Score: {}", self.player.session.score),
                    font.clone(),
                    Color32::WHITE,
                );
                if !self.player.alive {
                    painter.text(
                        Pos2::new(origin.x + width / 2.0, origin.y + 300.0),
                        egui::Align2::CENTER_CENTER,
                        "Space to restart",
                        font,
                        Color32::WHITE,
                    );
                }
            }
        }
    }
}

impl eframe::App for FlapnetApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.textures.is_none() {
            self.textures = Some(Textures::upload(ctx, &self.trainer.sprites));
        }

        self.handle_input(ctx);

        // Pace the simulation to the configured frame rate
        let frame_dt = self.frame_duration();
        if !self.paused && self.last_step.elapsed() >= frame_dt {
            self.step_simulation();
            self.last_step = Instant::now();
        }

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.mode, Mode::Train, "Train");
                ui.selectable_value(&mut self.mode, Mode::Play, "Play");
                ui.separator();
                if self.mode == Mode::Train {
                    let label = if self.paused { "Resume" } else { "Pause" };
                    if ui.button(label).clicked() {
                        self.paused = !self.paused;
                    }
                    ui.add(egui::Slider::new(&mut self.speed, 1..=50).text("speed"));
                }
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::BLACK))
            .show(ctx, |ui| {
                let painter = ui.painter();
                let origin = ui.min_rect().min;
                self.draw_world(painter, origin);
                self.draw_hud(painter, origin);
            });

        ctx.request_repaint_after(frame_dt);
    }
}

/// Launch the windowed front-end
pub fn run_gui(config: Config, mode: Mode) -> eframe::Result<()> {
    let width = config.window.width as f32;
    let height = config.window.height as f32 + 40.0; // room for the control bar

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width, height])
            .with_resizable(false)
            .with_title("FLAPNET"),
        ..Default::default()
    };

    eframe::run_native(
        "FLAPNET",
        native_options,
        Box::new(|_cc| Box::new(FlapnetApp::new(config, mode))),
    )
}
