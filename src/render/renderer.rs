use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{GameConfig, Position, Snapshot};
use crate::metrics::SessionMetrics;

/// Score line shown above the play area
pub fn score_line(snapshot: &Snapshot) -> String {
    format!("Score: {} (speed: {})", snapshot.score, snapshot.speed)
}

pub fn game_over_line(score: u32) -> String {
    format!("Game over! You scored {}!", score)
}

/// Draws snapshots of a session. Holds no game data of its own.
pub struct Renderer {
    config: GameConfig,
}

impl Renderer {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot, metrics: &SessionMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Play area
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(snapshot, metrics), chunks[0]);

        // Play area is two terminal columns per cell plus the border
        let width = (self.config.columns().max(0) as u16) * 2 + 2;
        let play_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(width),
                Constraint::Min(0),
            ])
            .split(chunks[1])[1];

        if snapshot.ended {
            frame.render_widget(self.render_game_over(snapshot, metrics), play_area);
        } else {
            frame.render_widget(self.render_grid(snapshot), play_area);
        }

        frame.render_widget(self.render_controls(snapshot.ended), chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let step = self.config.step;
        let head = snapshot.snake.first().copied();
        let mut lines = Vec::new();

        for row in 1..=self.config.rows() {
            let y = self.config.min_y + row * step;
            let mut spans = Vec::new();

            for column in 1..=self.config.columns() {
                let pos = Position::new(self.config.min_x + column * step, y);

                let cell = if Some(pos) == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if snapshot.snake.contains(&pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if Some(pos) == snapshot.food {
                    Span::styled(
                        "● ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::raw("  ")
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Plain)
                .border_style(Style::default().fg(Color::Rgb(0x52, 0x5d, 0x69))),
        )
    }

    fn render_stats(&self, snapshot: &Snapshot, metrics: &SessionMetrics) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled(
                score_line(snapshot),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.best_score.to_string(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM))
    }

    fn render_game_over(&self, snapshot: &Snapshot, metrics: &SessionMetrics) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                game_over_line(snapshot.score),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Games played: ", Style::default().fg(Color::Yellow)),
                Span::styled(metrics.games_played.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to play again or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_controls(&self, ended: bool) -> Paragraph<'_> {
        let text = if ended {
            Line::from(vec![
                Span::styled("R", Style::default().fg(Color::Green)),
                Span::raw(" to restart | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ])
        } else {
            Line::from(vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" to move | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ])
        };

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
