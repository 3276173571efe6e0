use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{debug, info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};

use crate::game::{GameEngine, GameState, GameStatus, TickResult};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionMetrics;
use crate::render::Renderer;

/// Redraw at ~30 FPS, independent of the game speed
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// Interactive game loop: owns the session and feeds it ticks and key presses
pub struct PlayMode {
    engine: GameEngine,
    state: GameState,
    metrics: SessionMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(mut engine: GameEngine) -> Self {
        let state = engine.reset();
        let renderer = Renderer::new(engine.config().clone());

        Self {
            engine,
            state,
            metrics: SessionMetrics::new(),
            renderer,
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        info!("game started at speed {}", self.state.speed);

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut scheduled_speed = self.state.speed;
        let mut tick_timer = timer_with_period(self.tick_interval());
        let mut render_timer = interval(RENDER_INTERVAL);

        loop {
            // Only one branch runs at a time, so a key press never lands mid-tick
            tokio::select! {
                maybe_event = event_stream.next() => {
                    self.handle_stream_item(maybe_event);
                }

                _ = tick_timer.tick() => {
                    if self.state.is_running() {
                        self.update_game();
                    }
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    let snapshot = self.state.snapshot();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }

            // Speed changes on a speed-up and on restart; the period follows it
            if self.state.speed != scheduled_speed {
                scheduled_speed = self.state.speed;
                tick_timer = timer_with_period(self.tick_interval());
            }
        }

        info!(
            "quitting after {} games, best score {}",
            self.metrics.games_played, self.metrics.best_score
        );

        Ok(())
    }

    fn tick_interval(&self) -> Duration {
        self.engine.config().tick_interval(self.state.speed)
    }

    /// A finished stream means input is gone for good, so the game stops
    fn handle_stream_item(&mut self, item: Option<io::Result<Event>>) {
        match item {
            Some(Ok(event)) => self.handle_event(event),
            Some(Err(err)) => warn!("failed to read terminal event: {}", err),
            None => {
                info!("input closed");
                self.should_quit = true;
            }
        }
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            let action = self.input_handler.handle_key_event(key);
            self.handle_action(action);
        }
    }

    fn handle_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Turn(direction) => {
                if !self.state.set_direction(direction) {
                    debug!(
                        "ignored turn to {:?} while heading {:?}",
                        direction,
                        self.state.direction()
                    );
                }
            }
            KeyAction::Restart => {
                if self.state.is_ended() {
                    self.reset_game();
                }
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }
    }

    fn update_game(&mut self) -> TickResult {
        let result = self.engine.tick(&mut self.state);

        if result.info.speed_changed {
            info!("next tick in {:?}", self.tick_interval());
        }

        if let GameStatus::Ended(collision) = self.state.status {
            info!(
                "game over ({:?}): score {}, length {}, {} ticks",
                collision,
                self.state.score,
                self.state.snake.len(),
                self.state.ticks
            );
            self.metrics.on_game_over(self.state.score);
        }

        result
    }

    fn reset_game(&mut self) {
        self.state = self.engine.reset();
        self.metrics.on_game_start();
        info!("game restarted");
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Periodic timer whose first tick is one full period away
fn timer_with_period(period: Duration) -> Interval {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CollisionType, Direction, GameConfig, Position};

    fn play_mode() -> PlayMode {
        PlayMode::new(GameEngine::with_seed(GameConfig::default(), 3))
    }

    #[test]
    fn test_game_initialization() {
        let mode = play_mode();
        assert!(mode.state.is_running());
        assert_eq!(mode.state.score, 0);
        assert_eq!(mode.tick_interval(), Duration::from_millis(66));
    }

    #[test]
    fn test_turn_applies_on_next_tick() {
        let mut mode = play_mode();
        mode.state.food = Some(Position::new(500, 500));

        mode.handle_action(KeyAction::Turn(Direction::Down));
        assert_eq!(mode.state.snake.head(), Position::new(100, 100));

        mode.update_game();
        assert_eq!(mode.state.snake.head(), Position::new(100, 120));
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut mode = play_mode();
        mode.state.food = Some(Position::new(500, 500));

        mode.handle_action(KeyAction::Turn(Direction::Left));
        mode.update_game();

        assert_eq!(mode.state.snake.head(), Position::new(120, 100));
    }

    #[test]
    fn test_speed_up_shortens_interval() {
        let mut mode = play_mode();
        mode.state.score = 4;
        mode.state.food = Some(Position::new(120, 100));

        let result = mode.update_game();

        assert!(result.info.speed_changed);
        assert_eq!(mode.tick_interval(), Duration::from_millis(62));
    }

    #[test]
    fn test_game_over_is_recorded() {
        let mut mode = play_mode();
        mode.state.score = 3;
        mode.state.snake.body = vec![
            Position::new(580, 100),
            Position::new(560, 100),
            Position::new(540, 100),
        ];

        let result = mode.update_game();

        assert!(result.terminated);
        assert_eq!(mode.state.status, GameStatus::Ended(CollisionType::Wall));
        assert_eq!(mode.metrics.games_played, 1);
        assert_eq!(mode.metrics.best_score, 3);
    }

    #[test]
    fn test_restart_only_after_game_over() {
        let mut mode = play_mode();
        mode.state.score = 2;

        mode.handle_action(KeyAction::Restart);
        assert_eq!(mode.state.score, 2);

        mode.state.status = GameStatus::Ended(CollisionType::SelfCollision);
        mode.handle_action(KeyAction::Restart);
        assert!(mode.state.is_running());
        assert_eq!(mode.state.score, 0);
        assert_eq!(mode.state.speed, 15);
    }

    #[test]
    fn test_closed_input_stops_the_loop() {
        let mut mode = play_mode();

        let error = io::Error::other("read failed");
        mode.handle_stream_item(Some(Err(error)));
        assert!(!mode.should_quit);

        mode.handle_stream_item(None);
        assert!(mode.should_quit);
    }

    #[test]
    fn test_quit() {
        let mut mode = play_mode();
        mode.handle_action(KeyAction::None);
        assert!(!mode.should_quit);

        mode.handle_action(KeyAction::Quit);
        assert!(mode.should_quit);
    }
}
