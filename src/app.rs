use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::Rect;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::{
    action::Action,
    cli::Cli,
    components::{assets::Assets, canvas::TerminalCanvas, help::Help},
    config::Config,
    game::Game,
    tui,
};

pub struct App {
    config: Config,
    game: Game,
    canvas: TerminalCanvas,
    tick_rate: f64,
    frame_rate: f64,
    should_quit: bool,
    should_suspend: bool,
    show_help: bool,
    pending_input: Vec<Action>,
    last_tick: Instant,
}

impl App {
    pub fn new(args: &Cli) -> Result<Self> {
        let mut config = Config::new()?;
        args.apply(&mut config.game);

        let game = Game::new(&config.game, &config.keybindings)?;
        let assets = Assets::load(&config.game)?;
        let canvas = TerminalCanvas::new(assets, config.game.window_width as u32, config.game.window_height as u32);
        info!(seed = config.game.seed, tick_rate = args.tick_rate, "game ready");

        Ok(Self {
            config,
            game,
            canvas,
            tick_rate: args.tick_rate,
            frame_rate: args.frame_rate,
            should_quit: false,
            should_suspend: false,
            show_help: false,
            pending_input: Vec::new(),
            last_tick: Instant::now(),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();

        let mut tui = tui::Tui::new()?;
        tui.tick_rate(self.tick_rate);
        tui.frame_rate(self.frame_rate);
        tui.enter()?;

        loop {
            if let Some(e) = tui.next().await {
                match e {
                    tui::Event::Init => self.restart_clock(),
                    tui::Event::Tick => action_tx.send(Action::Tick)?,
                    tui::Event::Render => action_tx.send(Action::Render)?,
                    tui::Event::Resize(x, y) => action_tx.send(Action::Resize(x, y))?,
                    tui::Event::Error => action_tx.send(Action::Error("failed to read terminal event".to_string()))?,
                    tui::Event::Key(key) => {
                        let key = normalize_key(key);
                        if let Some(action) = self.config.keybindings.action_for(self.game.stage(), &key) {
                            debug!("Got action: {action:?}");
                            action_tx.send(action.clone())?;
                        }
                    },
                }
            }

            while let Ok(action) = action_rx.try_recv() {
                if action != Action::Tick && action != Action::Render {
                    debug!("{action:?}");
                }
                match action {
                    Action::Tick => self.tick(),
                    Action::Quit => self.pending_input.push(action),
                    Action::Game(_) if !self.show_help => self.pending_input.push(action),
                    Action::Suspend => self.should_suspend = true,
                    Action::Resume => {
                        self.should_suspend = false;
                        self.restart_clock();
                    },
                    Action::ToggleShowHelp => {
                        self.show_help = !self.show_help;
                        self.restart_clock();
                    },
                    Action::Resize(w, h) => {
                        tui.resize(Rect::new(0, 0, w, h))?;
                        self.render(&mut tui)?;
                    },
                    Action::Render => self.render(&mut tui)?,
                    Action::Error(message) => error!("{message}"),
                    Action::Game(_) => {},
                }
            }
            if self.should_suspend {
                tui.suspend()?;
                action_tx.send(Action::Resume)?;
                tui.resume()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;
        Ok(())
    }

    /// Hands the inputs gathered since the last tick to the game, then advances it by the measured time.
    fn tick(&mut self) {
        let input = std::mem::take(&mut self.pending_input);
        if !self.game.handle_input(&input) {
            self.should_quit = true;
            return;
        }
        if self.show_help {
            return;
        }

        let elapsed_ms = u64::try_from(self.last_tick.elapsed().as_millis()).unwrap_or(u64::MAX);
        // Sub-millisecond remainders carry over to the next tick.
        self.last_tick += Duration::from_millis(elapsed_ms);
        self.game.advance(elapsed_ms, &mut self.canvas);
    }

    fn restart_clock(&mut self) {
        self.last_tick = Instant::now();
    }

    fn render(&self, tui: &mut tui::Tui) -> Result<()> {
        tui.draw(|f| {
            let area = f.area();
            f.render_widget(&self.canvas, area);

            if self.show_help {
                f.render_widget(self.help(), area);
            }
        })?;
        Ok(())
    }

    fn help(&self) -> Help {
        let stage = self.game.stage();
        let mut groups = vec![("System".to_string(), &self.config.keybindings.global)];
        if let Some(keymap) = self.config.keybindings.stages.get(&stage) {
            groups.push((stage.to_string(), keymap));
        }
        Help::new(groups)
    }
}

/// Shifted symbols such as `?` arrive with SHIFT set; bindings name them without it.
fn normalize_key(key: KeyEvent) -> KeyEvent {
    let mut modifiers = key.modifiers;
    if let KeyCode::Char(c) = key.code {
        if !c.is_alphabetic() {
            modifiers.remove(KeyModifiers::SHIFT);
        }
    }
    KeyEvent::new(key.code, modifiers)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_normalize_key_strips_shift_from_symbols() {
        let question = KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT);
        assert_eq!(normalize_key(question), KeyEvent::new(KeyCode::Char('?'), KeyModifiers::empty()));

        let upper_r = KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT);
        assert_eq!(normalize_key(upper_r), upper_r);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(normalize_key(ctrl_c), ctrl_c);
    }
}
