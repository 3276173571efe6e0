use std::time::{Duration, Instant};

/// Per-process bookkeeping across restarts. Nothing here outlives the process.
pub struct SessionMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub best_score: u32,
    pub games_played: u32,
    running: bool,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            best_score: 0,
            games_played: 0,
            running: true,
        }
    }

    /// Refresh the clock; it stands still once a game is over
    pub fn update(&mut self) {
        if self.running {
            self.elapsed_time = self.start_time.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.running = true;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.update();
        self.running = false;
        self.games_played += 1;
        self.best_score = self.best_score.max(final_score);
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_formatting() {
        let mut metrics = SessionMetrics::new();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(0);
        assert_eq!(metrics.format_time(), "00:00");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_best_score_tracking() {
        let mut metrics = SessionMetrics::new();

        metrics.on_game_over(10);
        assert_eq!(metrics.best_score, 10);
        assert_eq!(metrics.games_played, 1);

        metrics.on_game_over(5);
        assert_eq!(metrics.best_score, 10);
        assert_eq!(metrics.games_played, 2);

        metrics.on_game_over(15);
        assert_eq!(metrics.best_score, 15);
        assert_eq!(metrics.games_played, 3);
    }

    #[test]
    fn test_clock_stops_at_game_over() {
        let mut metrics = SessionMetrics::new();
        metrics.on_game_over(0);
        let frozen = metrics.elapsed_time;

        std::thread::sleep(Duration::from_millis(20));
        metrics.update();
        assert_eq!(metrics.elapsed_time, frozen);

        metrics.on_game_start();
        metrics.update();
        assert!(metrics.elapsed_time < Duration::from_millis(20));
    }
}
