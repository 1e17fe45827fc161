/// Terminal frame driver for the swaying airship
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use log::{debug, info};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

use airship_core::{Airship, Camera, OscillationController, Sweep};

pub mod cli;
pub mod renderer;

pub use cli::Args;
pub use renderer::AsciiRenderer;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 2.0;

fn camera_for(width: u16, height: u16) -> Camera {
    Camera::with_aspect(width as f32 / (height.max(1) as f32 * CELL_ASPECT))
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    airship: Airship,
    controller: OscillationController,
    sweep: Sweep,
    camera: Camera,
    renderer: AsciiRenderer,
    frame_time: Duration,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(airship: Airship, controller: OscillationController, fps: u32) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            airship,
            controller,
            sweep: Sweep::new(),
            camera: camera_for(width, height),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            frame_time: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        info!("starting frame loop at {:?} per frame", self.frame_time);

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.update();
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        info!("frame loop stopped");
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code: KeyCode::Char('q') | KeyCode::Esc,
                ..
            }) => {
                self.running = false;
            }
            Event::Resize(width, height) => {
                debug!("terminal resized to {}x{}", width, height);
                self.renderer.resize(width as usize, height as usize);
                self.camera = camera_for(width, height);
            }
            _ => {}
        }
    }

    /// Advance the sweep one frame and apply it to the airship
    fn update(&mut self) {
        self.airship.rotation.y = self.sweep.advance(&self.controller);
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.clear();
        self.renderer.render_airship(&self.airship, &self.camera);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        // Status overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Airship | FPS: {:.1} | yaw {:+6.2} deg {:?} | Q=Quit",
                self.fps,
                self.sweep.angle_degrees(),
                self.sweep.direction
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
