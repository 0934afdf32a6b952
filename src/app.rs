//! App: terminal init, main loop, frame ticking and key handling.

use crate::input::{Action, key_to_action};
use crate::screen::{ScreenController, Visibility};
use crate::theme::Theme;
use crate::ui::DrawOptions;
use crate::{Args, Timings};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{DefaultTerminal, Frame};
use std::time::{Duration, Instant};
use tachyonfx::Effect;
use tracing::{debug, info};

pub struct App {
    theme: Theme,
    controller: ScreenController,
    options: DrawOptions,
    frame_duration: Duration,
    /// TachyonFX fade for the hidden overlay's backdrop (created on its first frame).
    ghost_effect: Option<Effect>,
    /// Last time we processed the ghost effect (for delta).
    ghost_process_time: Option<Instant>,
}

impl App {
    pub fn new(args: &Args, timings: Timings, theme: Theme) -> Self {
        let mut controller = ScreenController::new(timings.shuffle, timings.fade, args.seed);
        if args.visible {
            controller.show(Instant::now());
        }
        Self {
            theme,
            controller,
            options: DrawOptions {
                marker: args.marker,
                fade: timings.fade,
                fade_effect: !args.no_fade,
            },
            frame_duration: frame_duration(args.frame_rate),
            ghost_effect: None,
            ghost_process_time: None,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;

        let result = self.run_loop(&mut terminal);

        // Restore
        let _ = terminal.show_cursor();
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn toggle(&mut self, now: Instant) {
        let visibility = self.controller.toggle(now);
        // a new hide gets a fresh ghost; showing discards any ghost still running
        self.ghost_effect = None;
        self.ghost_process_time = None;
        info!(?visibility, "switch toggled");
    }

    /// Tick the controller and drop the backdrop effect once its fade is over.
    fn advance(&mut self, now: Instant) {
        self.controller.tick(now);
        if self.ghost_effect.is_some()
            && self.controller.visibility() == Visibility::Hidden
            && !self.controller.is_fading(now)
        {
            self.ghost_effect = None;
            self.ghost_process_time = None;
        }
    }

    fn draw(&mut self, frame: &mut Frame, now: Instant) {
        crate::ui::draw(
            frame,
            &self.controller,
            &self.theme,
            &mut self.ghost_effect,
            &mut self.ghost_process_time,
            self.options,
            now,
        );
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();
            self.advance(now);
            terminal.draw(|f| self.draw(f, now))?;

            let timeout = self.frame_duration.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            match key_to_action(key) {
                                Action::Quit => {
                                    if let Some(animator) = self.controller.animator() {
                                        debug!(
                                            cycles = animator.cycles(),
                                            cells = ?animator.cells(),
                                            state = ?animator.state(),
                                            "quitting while loading"
                                        );
                                    }
                                    return Ok(());
                                }
                                Action::Toggle => self.toggle(Instant::now()),
                                Action::None => {}
                            }
                        }
                        Event::Resize(cols, rows) => debug!(cols, rows, "terminal resized"),
                        _ => {}
                    }
                }
            }
        }
    }
}

/// Time budget of one frame. Rates that are not a positive finite number, or whose
/// interval does not fit a `Duration`, fall back to 60 fps.
fn frame_duration(fps: f64) -> Duration {
    const FALLBACK: Duration = Duration::from_nanos(1_000_000_000 / 60);
    if !(fps.is_finite() && fps > 0.0) {
        return FALLBACK;
    }
    Duration::try_from_secs_f64(fps.recip()).unwrap_or(FALLBACK)
}
