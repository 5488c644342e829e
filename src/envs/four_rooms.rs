//! Deterministic Four Rooms gridworld
//!
//! The grid is indexed two ways:
//! - Cartesian `(x, y)`: x increases left to right, y bottom to top
//! - Matrix `(row, col)`: rows top to bottom, columns left to right
//!
//! `row = size - 1 - y` and `col = x`.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::render::GridRenderer;
use crate::{
    Error, Result,
    types::{Action, Xy},
};

/// Side length of the Four Rooms grid (including outer walls).
pub const GRID_SIZE: usize = 13;

/// Reward for reaching the goal.
pub const GOAL_REWARD: f64 = 100.0;

/// What the agent observes: its own location and the goal location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Observation {
    pub agent_xy: Xy,
    pub goal_xy: Xy,
}

/// Outcome of a single environment step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f64,
    /// The agent reached the goal.
    pub terminated: bool,
    /// The step limit was reached before the goal.
    pub truncated: bool,
    pub last_action: Action,
}

/// A deterministic Four Rooms RL domain.
#[derive(Debug, Clone)]
pub struct FourRoomsEnv {
    size: usize,
    /// Indexed `[row * size + col]`.
    walls_rc: Vec<bool>,
    agent_xy: Option<Xy>,
    goal_xy: Option<Xy>,
    steps: usize,
    max_steps: usize,
}

impl FourRoomsEnv {
    /// Create the 13x13 Four Rooms environment.
    pub fn new() -> Self {
        let size = GRID_SIZE;
        let mut walls_rc = vec![false; size * size];
        let mut wall = |row: usize, col: usize| walls_rc[row * size + col] = true;

        // Outer walls
        for i in 0..size {
            wall(0, i);
            wall(size - 1, i);
            wall(i, 0);
            wall(i, size - 1);
        }

        // Center vertical wall with hallways at rows 3 and 10
        for row in (0..3).chain(4..10).chain(11..size) {
            wall(row, 6);
        }

        // Left horizontal wall with a hallway at column 2
        for col in (0..2).chain(3..7) {
            wall(6, col);
        }

        // Right horizontal wall with a hallway at column 9
        for col in (6..9).chain(10..size) {
            wall(7, col);
        }

        Self {
            size,
            walls_rc,
            agent_xy: None,
            goal_xy: None,
            steps: 0,
            max_steps: 4 * size * size,
        }
    }

    /// Override the per-episode step limit.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Steps taken in the current episode.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Smallest and largest coordinate an agent can occupy on either axis.
    pub fn interior_bounds(&self) -> (i32, i32) {
        (1, self.size as i32 - 2)
    }

    /// Convert a Cartesian `(x, y)` coordinate into `(row, col)` indices.
    pub fn xy_to_rc(&self, xy: Xy) -> (i32, i32) {
        (self.size as i32 - 1 - xy.y, xy.x)
    }

    /// Convert a `(row, col)` index into a pixel `(x, y)` coordinate.
    ///
    /// Pixel coordinates increase left to right and top to bottom.
    pub fn rc_to_pix_xy(&self, rc: (i32, i32)) -> (i32, i32) {
        (rc.1, rc.0)
    }

    /// Convert a Cartesian `(x, y)` coordinate into a pixel `(x, y)` coordinate.
    pub fn xy_to_pix_xy(&self, xy: Xy) -> (i32, i32) {
        (xy.x, self.size as i32 - 1 - xy.y)
    }

    fn in_grid(&self, xy: Xy) -> bool {
        let size = self.size as i32;
        (0..size).contains(&xy.x) && (0..size).contains(&xy.y)
    }

    /// Check whether the location is a wall. Locations off the grid count as walls.
    pub fn wall_collision(&self, xy: Xy) -> bool {
        if !self.in_grid(xy) {
            return true;
        }
        let (row, col) = self.xy_to_rc(xy);
        self.walls_rc[row as usize * self.size + col as usize]
    }

    /// Check whether the agent may occupy the location.
    pub fn valid_xy(&self, xy: Xy) -> bool {
        let (low, high) = self.interior_bounds();
        (low..=high).contains(&xy.x) && (low..=high).contains(&xy.y) && !self.wall_collision(xy)
    }

    /// All valid agent locations, ordered by x then y.
    pub fn valid_cells(&self) -> Vec<Xy> {
        let (low, high) = self.interior_bounds();
        (low..=high)
            .flat_map(|x| (low..=high).map(move |y| Xy::new(x, y)))
            .filter(|&xy| self.valid_xy(xy))
            .collect()
    }

    /// Deterministic dynamics: the moved location if it is valid, else `xy`.
    pub fn transition(&self, xy: Xy, action: Action) -> Xy {
        let next = xy.offset(action.direction());
        if self.valid_xy(next) { next } else { xy }
    }

    /// Current observation, if a task is set.
    pub fn observation(&self) -> Option<Observation> {
        Some(Observation {
            agent_xy: self.agent_xy?,
            goal_xy: self.goal_xy?,
        })
    }

    pub fn agent_xy(&self) -> Option<Xy> {
        self.agent_xy
    }

    pub fn goal_xy(&self) -> Option<Xy> {
        self.goal_xy
    }

    fn sample_interior<R: Rng + ?Sized>(&self, rng: &mut R) -> Xy {
        let (low, high) = self.interior_bounds();
        Xy::new(rng.random_range(low..=high), rng.random_range(low..=high))
    }

    /// Reset to a new episode with agent and goal sampled uniformly over
    /// valid, distinct cells.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Observation {
        let mut agent = self.sample_interior(rng);
        while !self.valid_xy(agent) {
            trace!(%agent, "agent sampled into a wall");
            agent = self.sample_interior(rng);
        }

        let mut goal = self.sample_interior(rng);
        while goal == agent || !self.valid_xy(goal) {
            trace!(%goal, "goal sampled into a collision");
            goal = self.sample_interior(rng);
        }

        self.agent_xy = Some(agent);
        self.goal_xy = Some(goal);
        self.steps = 0;

        Observation {
            agent_xy: agent,
            goal_xy: goal,
        }
    }

    /// Reset to a new episode with the given start and goal.
    pub fn set_task(&mut self, start: Xy, goal: Xy) -> Result<Observation> {
        for xy in [start, goal] {
            if !self.valid_xy(xy) {
                return Err(Error::InvalidLocation { x: xy.x, y: xy.y });
            }
        }
        if start == goal {
            return Err(Error::TrivialTask {
                x: start.x,
                y: start.y,
            });
        }

        self.agent_xy = Some(start);
        self.goal_xy = Some(goal);
        self.steps = 0;

        Ok(Observation {
            agent_xy: start,
            goal_xy: goal,
        })
    }

    /// Advance the environment by one action.
    pub fn step(&mut self, action: Action) -> Result<StepResult> {
        let (agent, goal) = match (self.agent_xy, self.goal_xy) {
            (Some(agent), Some(goal)) => (agent, goal),
            _ => return Err(Error::NoTask),
        };
        if agent == goal || self.steps >= self.max_steps {
            return Err(Error::EpisodeOver);
        }

        let next = self.transition(agent, action);
        self.agent_xy = Some(next);
        self.steps += 1;

        let terminated = next == goal;
        let truncated = !terminated && self.steps >= self.max_steps;
        let reward = if terminated { GOAL_REWARD } else { 0.0 };

        Ok(StepResult {
            observation: Observation {
                agent_xy: next,
                goal_xy: goal,
            },
            reward,
            terminated,
            truncated,
            last_action: action,
        })
    }
}

impl Default for FourRoomsEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FourRoomsEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&GridRenderer::new(self).render())
    }
}
