//! Text rendering of the Four Rooms grid
//!
//! Rows are printed top to bottom, so the first line is the top wall.

use std::collections::{HashMap, HashSet};

use super::four_rooms::FourRoomsEnv;
use crate::{graphs::UndirectedGraph, types::Xy};

const REGION_SYMBOLS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzBCDEFHIJKLMNOPQRSTUVWXYZ";

/// Symbol used for a region label.
pub fn region_symbol(region: usize) -> char {
    REGION_SYMBOLS
        .get(region)
        .map(|&b| b as char)
        .unwrap_or('?')
}

/// Builder for text renderings of an environment and overlays.
pub struct GridRenderer<'a> {
    env: &'a FourRoomsEnv,
    labels: HashMap<Xy, String>,
    path: HashSet<Xy>,
    show_task: bool,
}

impl<'a> GridRenderer<'a> {
    pub fn new(env: &'a FourRoomsEnv) -> Self {
        Self {
            env,
            labels: HashMap::new(),
            path: HashSet::new(),
            show_task: true,
        }
    }

    /// Label every vertex of `graph` with its region symbol.
    pub fn with_regions(mut self, graph: &UndirectedGraph<Xy>, labels: &[usize]) -> Self {
        for (xy, &label) in graph.vertices().iter().zip(labels) {
            self.labels.insert(*xy, region_symbol(label).to_string());
        }
        self
    }

    /// Label every vertex of `graph` with its index.
    pub fn with_vertex_numbers(mut self, graph: &UndirectedGraph<Xy>) -> Self {
        for (idx, xy) in graph.vertices().iter().enumerate() {
            self.labels.insert(*xy, idx.to_string());
        }
        self
    }

    /// Mark the cells of a path.
    pub fn with_path(mut self, path: impl IntoIterator<Item = Xy>) -> Self {
        self.path.extend(path);
        self
    }

    /// Do not draw the agent and goal.
    pub fn without_task(mut self) -> Self {
        self.show_task = false;
        self
    }

    fn cell(&self, xy: Xy) -> String {
        if self.env.wall_collision(xy) {
            return "#".to_string();
        }
        if self.show_task {
            if self.env.agent_xy() == Some(xy) {
                return "A".to_string();
            }
            if self.env.goal_xy() == Some(xy) {
                return "G".to_string();
            }
        }
        if self.path.contains(&xy) {
            return "*".to_string();
        }
        self.labels
            .get(&xy)
            .cloned()
            .unwrap_or_else(|| ".".to_string())
    }

    pub fn render(&self) -> String {
        let size = self.env.size() as i32;
        let cells: Vec<Vec<String>> = (0..size)
            .rev()
            .map(|y| (0..size).map(|x| self.cell(Xy::new(x, y))).collect())
            .collect();

        let width = cells
            .iter()
            .flatten()
            .map(|c| c.chars().count())
            .max()
            .unwrap_or(1);

        let mut out = String::new();
        for row in cells {
            let line: Vec<String> = row.iter().map(|c| format!("{c:>width$}")).collect();
            out.push_str(line.join(" ").trim_end());
            out.push('\n');
        }
        out
    }
}
