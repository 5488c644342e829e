//! Core value types shared across the crate

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Index of a vertex in a state transition graph.
pub type VertexId = usize;

/// A task is a (start vertex, goal vertex) pair.
pub type Task = (VertexId, VertexId);

/// A behavior is a sequence of vertices from a task's start to its goal.
pub type Path = Vec<VertexId>;

/// Cartesian grid coordinate.
///
/// `x` increases left to right and `y` increases bottom to top, so `(1, 1)` is
/// the bottom-left free cell of the Four Rooms grid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Xy {
    pub x: i32,
    pub y: i32,
}

impl Xy {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this coordinate by the given direction.
    pub fn offset(self, direction: Xy) -> Xy {
        Xy::new(self.x + direction.x, self.y + direction.y)
    }

    /// Euclidean distance between two cells.
    pub fn distance(self, other: Xy) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        dx.hypot(dy)
    }
}

impl fmt::Display for Xy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl FromStr for Xy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_error = || Error::ParseCoordinate {
            input: s.to_string(),
        };
        let trimmed = s.trim().trim_start_matches('(').trim_end_matches(')');
        let (x, y) = trimmed.split_once(',').ok_or_else(parse_error)?;
        let x = x.trim().parse::<i32>().map_err(|_| parse_error())?;
        let y = y.trim().parse::<i32>().map_err(|_| parse_error())?;
        Ok(Xy::new(x, y))
    }
}

/// Primitive actions of the Four Rooms domain.
///
/// The discriminants match the action indices of the environment's action
/// space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Right = 0,
    UpRight = 1,
    Up = 2,
    UpLeft = 3,
    Left = 4,
    DownLeft = 5,
    Down = 6,
    DownRight = 7,
    NoOp = 8,
}

impl Action {
    /// Number of primitive actions.
    pub const COUNT: usize = 9;

    /// All actions in index order.
    pub const ALL: [Action; Action::COUNT] = [
        Action::Right,
        Action::UpRight,
        Action::Up,
        Action::UpLeft,
        Action::Left,
        Action::DownLeft,
        Action::Down,
        Action::DownRight,
        Action::NoOp,
    ];

    /// Look up an action by its index.
    pub fn from_index(index: usize) -> Result<Self, Error> {
        Action::ALL
            .get(index)
            .copied()
            .ok_or(Error::InvalidAction { index })
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Movement in Cartesian space.
    pub fn direction(self) -> Xy {
        match self {
            Action::Right => Xy::new(1, 0),
            Action::UpRight => Xy::new(1, 1),
            Action::Up => Xy::new(0, 1),
            Action::UpLeft => Xy::new(-1, 1),
            Action::Left => Xy::new(-1, 0),
            Action::DownLeft => Xy::new(-1, -1),
            Action::Down => Xy::new(0, -1),
            Action::DownRight => Xy::new(1, -1),
            Action::NoOp => Xy::new(0, 0),
        }
    }

    /// The action moving from `from` to the adjacent cell `to`, if any.
    pub fn between(from: Xy, to: Xy) -> Option<Action> {
        let delta = Xy::new(to.x - from.x, to.y - from.y);
        Action::ALL.into_iter().find(|a| a.direction() == delta)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Right => "right",
            Action::UpRight => "up-right",
            Action::Up => "up",
            Action::UpLeft => "up-left",
            Action::Left => "left",
            Action::DownLeft => "down-left",
            Action::Down => "down",
            Action::DownRight => "down-right",
            Action::NoOp => "no-op",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_indices_roundtrip() {
        for (idx, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), idx);
            assert_eq!(Action::from_index(idx).unwrap(), *action);
        }
        assert!(Action::from_index(9).is_err());
    }

    #[test]
    fn test_action_between_adjacent_cells() {
        let from = Xy::new(3, 3);
        assert_eq!(Action::between(from, Xy::new(4, 4)), Some(Action::UpRight));
        assert_eq!(Action::between(from, Xy::new(3, 2)), Some(Action::Down));
        assert_eq!(Action::between(from, from), Some(Action::NoOp));
        assert_eq!(Action::between(from, Xy::new(5, 3)), None);
    }

    #[test]
    fn test_parse_coordinate() {
        assert_eq!("3,4".parse::<Xy>().unwrap(), Xy::new(3, 4));
        assert_eq!(" (10, 1) ".parse::<Xy>().unwrap(), Xy::new(10, 1));
        assert!("3;4".parse::<Xy>().is_err());
        assert!("a,4".parse::<Xy>().is_err());
    }

    #[test]
    fn test_distance() {
        let a = Xy::new(1, 1);
        assert_eq!(a.distance(Xy::new(4, 5)), 5.0);
        assert!((a.distance(Xy::new(2, 2)) - std::f64::consts::SQRT_2).abs() < 1e-12);
    }
}
