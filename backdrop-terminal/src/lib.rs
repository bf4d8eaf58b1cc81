/// Terminal preview of the page backdrop
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use log::{debug, error, info};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

use backdrop_core::{
    Backdrop, Control, InputEvent, InputSource, PageChrome, SceneConfig, Theme, Viewport,
};
use rand::Rng;

pub mod page;
pub mod renderer;

pub use page::VirtualPage;
pub use renderer::AsciiRenderer;

/// Scroll step for arrow keys and the mouse wheel, in viewport heights
const LINE_SCROLL: f32 = 0.05;
const PAGE_SCROLL: f32 = 0.9;

/// Terminal cells map to two surface rows; see `renderer`
fn viewport_for(cols: u16, rows: u16) -> Viewport {
    // The last row is the status line
    Viewport::new(cols as f32, rows.saturating_sub(1) as f32 * 2.0)
}

/// Main application struct for the terminal preview
pub struct TerminalApp {
    backdrop: Backdrop,
    chrome: PageChrome<usize>,
    scene_input: InputSource<Backdrop>,
    chrome_input: InputSource<PageChrome<usize>>,
    page: VirtualPage,
    renderer: AsciiRenderer,
    target_fps: u32,
    running: bool,
    started: Instant,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new<R: Rng + ?Sized>(config: &SceneConfig, theme: &Theme, target_fps: u32, rng: &mut R) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        let viewport = viewport_for(cols, rows);

        let mut chrome = PageChrome::new(config.page.reveal_threshold);
        let page = VirtualPage::new(viewport);
        for block in 0..page.reveal_block_count() {
            chrome.reveals.observe(block);
        }

        Ok(Self {
            backdrop: Backdrop::new(config, theme, viewport, 1.0, rng),
            chrome,
            scene_input: Backdrop::input_source(),
            chrome_input: PageChrome::input_source(),
            page,
            renderer: AsciiRenderer::new(cols as usize, rows.saturating_sub(1) as usize),
            target_fps: target_fps.max(1),
            running: true,
            started: Instant::now(),
            last_fps_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), DisableMouseCapture, terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn now(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_secs_f64(1.0 / self.target_fps as f64);

        // Reveal whatever is on screen before the first scroll
        self.check_reveals();

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_input(event::read()?);
            }

            // Update and render
            let elapsed = self.now();
            self.backdrop.update(elapsed);
            if let Err(never) = self.backdrop.render(&mut self.renderer) {
                match never {}
            }
            self.draw()?;

            // Frame timing
            self.frame_count += 1;
            let spent = frame_start.elapsed();
            if spent < target_frame_time {
                std::thread::sleep(target_frame_time - spent);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_fps_sample).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_fps_sample).as_secs_f32();
                self.frame_count = 0;
                self.last_fps_sample = now;
            }
        }

        info!("terminal preview stopped after {} frames", self.backdrop.frame_count());
        Ok(())
    }

    /// Route an input event to the scene and the page chrome
    fn dispatch(&mut self, event: InputEvent) {
        let now = self.now();
        self.scene_input.dispatch(&mut self.backdrop, &event, now);
        self.chrome_input.dispatch(&mut self.chrome, &event, now);
    }

    fn scroll(&mut self, viewports: f32) {
        self.page.scroll_by(viewports);
        let section = self.page.skills_section();
        self.dispatch(InputEvent::Scroll { section });
        self.check_reveals();
    }

    fn check_reveals(&mut self) {
        for block in self.chrome.check_reveals(self.page.reveal_ratios()) {
            debug!("reveal block {} activated", block);
        }
    }

    fn handle_input(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                self.handle_key(code)
            }
            Event::Mouse(MouseEvent { kind, column, row, .. }) => match kind {
                MouseEventKind::ScrollDown => self.scroll(LINE_SCROLL),
                MouseEventKind::ScrollUp => self.scroll(-LINE_SCROLL),
                _ => self.dispatch(InputEvent::PointerMove {
                    client_x: column as f32,
                    client_y: row as f32 * 2.0,
                }),
            },
            Event::Resize(cols, rows) => {
                let viewport = viewport_for(cols, rows);
                self.page.resize(viewport);
                self.dispatch(InputEvent::Resize {
                    viewport,
                    device_pixel_ratio: 1.0,
                });
                self.scroll(0.0);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Down | KeyCode::Char('j') => self.scroll(LINE_SCROLL),
            KeyCode::Up | KeyCode::Char('k') => self.scroll(-LINE_SCROLL),
            KeyCode::PageDown | KeyCode::Char(' ') => self.scroll(PAGE_SCROLL),
            KeyCode::PageUp => self.scroll(-PAGE_SCROLL),
            KeyCode::Char('m') => self.dispatch(InputEvent::Click(Control::MenuToggle)),
            KeyCode::Char('c') => self.dispatch(InputEvent::Click(Control::CloseMenu)),
            KeyCode::Char('1'..='3') => self.dispatch(InputEvent::Click(Control::NavLink)),
            _ => {}
        }
    }

    fn status_line(&self) -> String {
        format!(
            "FPS {:.1} | scroll {:>3.0}% | skills {:?} | menu {} | revealed {}/{} | j/k PgUp/PgDn scroll, m/c menu, q quit",
            self.fps,
            self.page.scroll_fraction() * 100.0,
            self.backdrop.visibility(),
            if self.chrome.menu.is_active() { "open" } else { "closed" },
            self.chrome.revealed_count(),
            self.page.reveal_block_count(),
        )
    }

    fn draw(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        if let Err(e) = self.renderer.draw(&mut stdout) {
            error!("failed to draw frame: {}", e);
            return Err(e);
        }

        // Draw UI overlay
        let mut status = self.status_line();
        status.truncate(self.renderer.width());
        queue!(
            stdout,
            cursor::MoveTo(0, self.renderer.height() as u16),
            terminal::Clear(terminal::ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(status),
            ResetColor
        )?;

        stdout.flush()
    }
}
