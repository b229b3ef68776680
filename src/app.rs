//! App: terminal init, main loop, tick cadence and key handling.

use crate::Args;
use crate::game::{Command, Game};
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use ratatui::style::Color;
use std::time::{Duration, Instant};
use tachyonfx::{Effect, Interpolation, fx};

/// Duration of the line-clear flash in ms.
const LINE_CLEAR_FLASH_MS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    GameOver,
}

pub struct App {
    args: Args,
    theme: Theme,
    game: Game,
    screen: Screen,
    paused: bool,
    /// Level offset used on restart; adjustable with the level keys.
    starting_level: u32,
    last_tick: Instant,
    /// TachyonFX flash over the board when rows clear.
    line_clear_effect: Option<Effect>,
    /// Last time the flash was processed (for delta).
    effect_time: Option<Instant>,
}

impl App {
    pub fn new(args: Args, theme: Theme) -> Self {
        let seed = args.seed.unwrap_or_else(rand::random);
        let game = Game::new(
            args.height as usize,
            args.width as usize,
            args.level,
            seed,
        );
        Self {
            starting_level: args.level,
            args,
            theme,
            game,
            screen: Screen::Playing,
            paused: false,
            last_tick: Instant::now(),
            line_clear_effect: None,
            effect_time: None,
        }
    }

    fn restart(&mut self) {
        self.game.reset(self.starting_level);
        self.screen = Screen::Playing;
        self.paused = false;
        self.last_tick = Instant::now();
        self.line_clear_effect = None;
        self.effect_time = None;
    }

    /// Apply a shell or game action while playing. Returns false to quit.
    fn handle_playing_action(&mut self, action: Action) -> bool {
        if self.paused && !matches!(action, Action::Pause | Action::Quit) {
            return true;
        }
        match action {
            Action::Quit => return false,
            Action::Pause => self.paused = !self.paused,
            Action::Reset => self.restart(),
            Action::LevelUp => {
                self.starting_level += 1;
                self.restart();
            }
            Action::LevelDown => {
                self.starting_level = self.starting_level.saturating_sub(1).max(1);
                self.restart();
            }
            Action::MoveLeft => self.game.handle_input(Command::MoveLeft),
            Action::MoveRight => self.game.handle_input(Command::MoveRight),
            Action::SoftDrop => self.game.handle_input(Command::SoftDrop),
            Action::RotateCw => self.game.handle_input(Command::RotateRight),
            Action::RotateCcw => self.game.handle_input(Command::RotateLeft),
            Action::None => {}
        }
        true
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{
                EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
            },
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;
        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let tick_interval = Duration::from_secs_f64(1.0 / self.args.tick_rate.max(1.0));
        loop {
            let now = Instant::now();
            terminal.draw(|f| {
                crate::ui::draw(
                    f,
                    &self.game,
                    &self.theme,
                    self.screen,
                    self.paused,
                    f.area(),
                    &mut self.line_clear_effect,
                    &mut self.effect_time,
                    now,
                );
            })?;

            if self.line_clear_effect.as_ref().is_some_and(|e| e.done()) {
                self.line_clear_effect = None;
                self.effect_time = None;
            }

            // Poll input until the next tick is due, capped so rendering
            // stays responsive.
            let timeout = tick_interval
                .saturating_sub(self.last_tick.elapsed())
                .min(Duration::from_millis(16));
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind == KeyEventKind::Release {
                            continue;
                        }
                        let action = key_to_action(key);
                        match self.screen {
                            Screen::Playing => {
                                if !self.handle_playing_action(action) {
                                    return Ok(());
                                }
                            }
                            Screen::GameOver => match action {
                                Action::Quit => return Ok(()),
                                Action::Reset => self.restart(),
                                Action::LevelUp => {
                                    self.starting_level += 1;
                                    self.restart();
                                }
                                Action::LevelDown => {
                                    self.starting_level =
                                        self.starting_level.saturating_sub(1).max(1);
                                    self.restart();
                                }
                                _ => {}
                            },
                        }
                    }
                }
            }

            if self.screen == Screen::Playing
                && !self.paused
                && self.last_tick.elapsed() >= tick_interval
            {
                self.last_tick = Instant::now();
                let outcome = self.game.tick();
                if outcome.rows_cleared > 0 && !self.args.no_animation {
                    self.line_clear_effect = Some(fx::fade_from(
                        Color::White,
                        Color::White,
                        (LINE_CLEAR_FLASH_MS, Interpolation::Linear),
                    ));
                    self.effect_time = None;
                }
                if self.game.game_over() {
                    self.screen = Screen::GameOver;
                }
            }
        }
    }
}
