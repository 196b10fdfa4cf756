//! Game phase transitions
//!
//! `Start → Playing ⇄ Paused`, `Playing → LevelComplete → Playing`,
//! `Playing → GameOver → Start`. User actions arrive as [`Command`]s; the
//! simulation step reports lost balls and cleared levels through
//! [`GameState::lose_ball_set`] and [`GameState::complete_level`].

use super::level::init_level;
use super::state::{GamePhase, GameState, Stats};
use crate::settings::Difficulty;

/// A user action that may change the game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pick the preset for the next game (start screen only)
    SelectDifficulty(Difficulty),
    Start,
    Restart,
    Pause,
    Resume,
    /// Pause key: pause while playing, resume while paused
    TogglePause,
    /// Launch every ball that is still waiting
    Launch,
    NextLevel,
    MainMenu,
}

impl GameState {
    /// Apply a command. Returns false (and changes nothing) when the command
    /// does not apply to the current phase.
    pub fn apply(&mut self, command: Command) -> bool {
        use GamePhase::*;

        let applied = match (command, self.phase) {
            (Command::SelectDifficulty(difficulty), Start) => {
                self.difficulty = difficulty;
                self.reset_ball();
                log::info!("Difficulty set to {}", difficulty.as_str());
                true
            }
            (Command::Start, Start) | (Command::Restart, Paused | LevelComplete | GameOver) => {
                self.start_game();
                true
            }
            (Command::Pause | Command::TogglePause, Playing) => {
                self.phase = Paused;
                true
            }
            (Command::Resume | Command::TogglePause, Paused) => {
                self.phase = Playing;
                true
            }
            (Command::Launch, Playing) => self.launch_waiting_balls() > 0,
            (Command::NextLevel, LevelComplete) => {
                self.next_level();
                true
            }
            (Command::MainMenu, Paused | LevelComplete | GameOver) => {
                self.phase = Start;
                log::info!("Back to main menu");
                true
            }
            _ => false,
        };

        if !applied {
            log::debug!("Ignored {:?} in phase {:?}", command, self.phase);
        }
        applied
    }

    /// Reset stats and begin level 1
    fn start_game(&mut self) {
        let preset = self.difficulty.settings();
        self.stats = Stats::new(preset.lives, self.clock_ms);
        self.reset_ball();
        self.reset_paddle();
        init_level(self);
        self.phase = GamePhase::Playing;
        log::info!(
            "Game started on {} with {} lives (seed {})",
            self.difficulty.as_str(),
            preset.lives,
            self.seed
        );
    }

    fn next_level(&mut self) {
        self.stats.level += 1;
        self.reset_ball();
        self.reset_paddle();
        init_level(self);
        self.phase = GamePhase::Playing;
    }

    /// Every ball is gone: spend a life, and either serve again or end the run
    pub fn lose_ball_set(&mut self) {
        self.stats.lives = self.stats.lives.saturating_sub(1);
        self.stats.reset_combo();

        if self.stats.lives == 0 {
            self.game_over();
        } else {
            log::info!("Ball lost, {} lives left", self.stats.lives);
            self.reset_ball();
            // The level's speed-up carries over to every serve
            let increase = self.features.ball_speed_increase;
            if increase > 0.0 {
                for ball in &mut self.balls {
                    ball.speed_up(increase);
                }
            }
        }
    }

    /// Every brick is down
    pub fn complete_level(&mut self) {
        self.phase = GamePhase::LevelComplete;
        log::info!(
            "Level {} complete, score {}",
            self.stats.level,
            self.stats.score
        );
    }

    fn game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        self.stats.freeze(self.clock_ms);
        log::info!(
            "Game over: score {}, level {}, max combo x{}, time {}",
            self.stats.score,
            self.stats.level,
            self.stats.max_combo,
            super::state::format_time(self.run_time_ms())
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn new_state() -> GameState {
        GameState::new(Difficulty::Normal, 2024, CANVAS_WIDTH, CANVAS_HEIGHT)
    }

    #[test]
    fn test_start_builds_level_one() {
        let mut state = new_state();
        assert!(state.apply(Command::Start));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stats.level, 1);
        assert_eq!(state.stats.lives, 3);
        assert_eq!(state.bricks.len(), 40);
        assert_eq!(state.balls.len(), 1);
        assert!(!state.balls[0].launched);
    }

    #[test]
    fn test_pause_resume() {
        let mut state = new_state();
        assert!(!state.apply(Command::Pause));
        state.apply(Command::Start);

        assert!(state.apply(Command::TogglePause));
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(state.apply(Command::TogglePause));
        assert_eq!(state.phase, GamePhase::Playing);

        assert!(state.apply(Command::Pause));
        assert!(!state.apply(Command::Pause));
        assert!(state.apply(Command::Resume));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_launch_only_while_playing_and_once() {
        let mut state = new_state();
        assert!(!state.apply(Command::Launch));
        state.apply(Command::Start);
        assert!(state.apply(Command::Launch));
        assert!(state.balls[0].launched);
        let vel = state.balls[0].vel;
        assert!(!state.apply(Command::Launch));
        assert_eq!(state.balls[0].vel, vel);
    }

    #[test]
    fn test_difficulty_only_on_start_screen() {
        let mut state = new_state();
        assert!(state.apply(Command::SelectDifficulty(Difficulty::Insane)));
        state.apply(Command::Start);
        assert_eq!(state.stats.lives, 1);
        assert!(!state.apply(Command::SelectDifficulty(Difficulty::Easy)));
        assert_eq!(state.difficulty, Difficulty::Insane);
    }

    #[test]
    fn test_level_complete_then_next_level() {
        let mut state = new_state();
        state.apply(Command::Start);
        state.stats.score = 500;
        state.complete_level();
        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert!(!state.apply(Command::TogglePause));

        assert!(state.apply(Command::NextLevel));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stats.level, 2);
        assert_eq!(state.stats.score, 500);
        assert_eq!(state.bricks.len(), 50);
    }

    #[test]
    fn test_lose_ball_set_respawns() {
        let mut state = new_state();
        state.apply(Command::Start);
        state.stats.combo = 7;
        state.stats.max_combo = 7;
        state.balls.clear();
        state.lose_ball_set();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stats.lives, 2);
        assert_eq!(state.stats.combo, 1);
        assert_eq!(state.stats.max_combo, 7);
        assert_eq!(state.balls.len(), 1);
    }

    #[test]
    fn test_respawn_keeps_level_speed_up() {
        let mut state = new_state();
        state.apply(Command::Start);
        state.stats.level = 5;
        state.complete_level();
        state.apply(Command::NextLevel);
        assert_eq!(state.stats.level, 6);
        assert!((state.balls[0].speed - 6.0).abs() < 1e-6);

        state.balls.clear();
        state.lose_ball_set();
        assert_eq!(state.stats.lives, 2);
        assert_eq!(state.balls.len(), 1);
        assert!((state.balls[0].speed - 6.0).abs() < 1e-6);
        assert_eq!(state.balls[0].base_speed, 5.0);
    }

    #[test]
    fn test_last_life_is_game_over() {
        let mut state = new_state();
        state.apply(Command::Start);
        state.stats.lives = 1;
        state.clock_ms += 65_000.0;
        state.balls.clear();
        state.lose_ball_set();
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.stats.lives, 0);
        assert_eq!(state.stats.elapsed_ms, Some(65_000.0));

        assert!(!state.apply(Command::Start));
        assert!(!state.apply(Command::Resume));
        assert!(state.apply(Command::MainMenu));
        assert_eq!(state.phase, GamePhase::Start);
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut state = new_state();
        state.apply(Command::Start);
        state.stats.lives = 1;
        state.stats.score = 999;
        state.balls.clear();
        state.lose_ball_set();

        assert!(state.apply(Command::Restart));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stats.score, 0);
        assert_eq!(state.stats.lives, 3);
        assert_eq!(state.stats.elapsed_ms, None);
    }
}
