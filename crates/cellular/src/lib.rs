#![deny(unsafe_code)]
//! Life-like cellular automaton renderer.
//!
//! Seeds a toroidal grid of `floor(width / cellSize) x floor(height / cellSize)`
//! binary cells at random, runs a fixed number of synchronous generations
//! under a birth/survival rule (Conway's Life is B3/S23), and paints the
//! surviving cells as squares. Cell color is positional, not random:
//! `palette[(col + row) % len]`, which gives diagonal color bands.

use algo_art_core::engine::{Frame, Renderer};
use algo_art_core::params::{ParamSchema, ParamSpec};
use algo_art_core::prng::RandomSource;
use algo_art_core::surface::Rect;
use serde_json::{json, Value};

const DEFAULT_CELL_SIZE: f64 = 8.0;
const DEFAULT_INITIAL_DENSITY: f64 = 0.3;
const DEFAULT_ITERATIONS: f64 = 10.0;
const DEFAULT_BIRTH_RULE: &str = "3";
const DEFAULT_SURVIVE_RULE: &str = "23";

/// Upper bound on cell updates (cells times generations) in one render.
pub const MAX_CELL_UPDATES: usize = 100_000_000;

/// Parameter table for `cellular`.
pub static SCHEMA: ParamSchema = ParamSchema {
    algorithm: "cellular",
    params: &[
        ParamSpec::integer(
            "cellSize",
            DEFAULT_CELL_SIZE,
            1.0,
            30.0,
            "Cell edge in pixels",
        ),
        ParamSpec::number(
            "initialDensity",
            DEFAULT_INITIAL_DENSITY,
            0.0,
            1.0,
            0.01,
            "Probability that a cell starts alive",
        ),
        ParamSpec::integer(
            "iterations",
            DEFAULT_ITERATIONS,
            1.0,
            2000.0,
            "Generations to run",
        ),
        ParamSpec::rule(
            "birthRule",
            DEFAULT_BIRTH_RULE,
            "Neighbor counts that bring a dead cell to life",
        ),
        ParamSpec::rule(
            "surviveRule",
            DEFAULT_SURVIVE_RULE,
            "Neighbor counts that keep a live cell alive",
        ),
    ],
};

/// Set of Moore-neighbor counts (0..=8) parsed from a digit string.
///
/// Characters that are not decimal digits are ignored, and so is `9`
/// (a cell never has nine neighbors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuleSet([bool; 9]);

impl RuleSet {
    pub fn parse(digits: &str) -> Self {
        let mut set = [false; 9];
        digits
            .chars()
            .filter_map(|c| c.to_digit(10))
            .filter(|&d| d <= 8)
            .for_each(|d| set[d as usize] = true);
        Self(set)
    }

    pub fn contains(&self, neighbors: usize) -> bool {
        self.0.get(neighbors).copied().unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        !self.0.iter().any(|&b| b)
    }
}

/// Automaton parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CellularParams {
    pub cell_size: usize,
    pub initial_density: f64,
    pub iterations: usize,
    pub birth_rule: String,
    pub survive_rule: String,
}

impl Default for CellularParams {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE as usize,
            initial_density: DEFAULT_INITIAL_DENSITY,
            iterations: DEFAULT_ITERATIONS as usize,
            birth_rule: DEFAULT_BIRTH_RULE.to_string(),
            survive_rule: DEFAULT_SURVIVE_RULE.to_string(),
        }
    }
}

impl CellularParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        Self {
            cell_size: SCHEMA.spec("cellSize").read_usize(params),
            initial_density: SCHEMA.spec("initialDensity").read_f64(params),
            iterations: SCHEMA.spec("iterations").read_usize(params),
            birth_rule: SCHEMA.spec("birthRule").read_rule(params),
            survive_rule: SCHEMA.spec("surviveRule").read_rule(params),
        }
    }
}

/// Toroidal grid of binary cells, stored column-major (`col * rows + row`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cols: usize,
    rows: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// An all-dead grid.
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![false; cols * rows],
        }
    }

    /// A grid where each cell is alive iff its draw is below `density`.
    ///
    /// Draws one value per cell, column by column, top to bottom.
    pub fn random(cols: usize, rows: usize, density: f64, rng: &mut dyn RandomSource) -> Self {
        let cells = (0..cols * rows).map(|_| rng.next_f64() < density).collect();
        Self { cols, rows, cells }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn alive(&self, col: usize, row: usize) -> bool {
        self.cells[col * self.rows + row]
    }

    pub fn set(&mut self, col: usize, row: usize, alive: bool) {
        self.cells[col * self.rows + row] = alive;
    }

    /// Live cells among the eight Moore neighbors, wrapping at the edges.
    pub fn live_neighbors(&self, col: usize, row: usize) -> usize {
        let mut n = 0;
        for dc in -1..=1 {
            for dr in -1..=1 {
                if dc == 0 && dr == 0 {
                    continue;
                }
                let c = wrap(col, dc, self.cols);
                let r = wrap(row, dr, self.rows);
                n += usize::from(self.alive(c, r));
            }
        }
        n
    }

    /// The next generation, computed entirely from `self`.
    pub fn step(&self, birth: &RuleSet, survive: &RuleSet) -> Grid {
        let mut next = Grid::new(self.cols, self.rows);
        for col in 0..self.cols {
            for row in 0..self.rows {
                let n = self.live_neighbors(col, row);
                let alive = if self.alive(col, row) {
                    survive.contains(n)
                } else {
                    birth.contains(n)
                };
                next.set(col, row, alive);
            }
        }
        next
    }

    /// Iterator over `(col, row)` of every live cell.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let rows = self.rows;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(move |(i, _)| (i / rows, i % rows))
    }
}

/// Generations actually run on a grid of `cells` cells: `iterations`, cut to
/// stay within [`MAX_CELL_UPDATES`] but never below one.
pub fn effective_iterations(iterations: usize, cells: usize) -> usize {
    iterations.min((MAX_CELL_UPDATES / cells.max(1)).max(1))
}

/// Toroidal coordinate wrap: `(coord + offset) mod size`.
fn wrap(coord: usize, offset: isize, size: usize) -> usize {
    ((coord as isize + offset).rem_euclid(size as isize)) as usize
}

/// Cellular automaton renderer.
#[derive(Debug, Clone, Default)]
pub struct Cellular {
    params: CellularParams,
}

impl Cellular {
    pub fn new(params: CellularParams) -> Self {
        Self { params }
    }

    pub fn from_json(params: &Value) -> Self {
        Self::new(CellularParams::from_json(params))
    }

    /// Seeds a `cols x rows` grid from `rng` and runs the generations that fit
    /// the update budget.
    pub fn simulate(&self, cols: usize, rows: usize, rng: &mut dyn RandomSource) -> Grid {
        let birth = RuleSet::parse(&self.params.birth_rule);
        let survive = RuleSet::parse(&self.params.survive_rule);
        let mut grid = Grid::random(cols, rows, self.params.initial_density, rng);
        let generations = effective_iterations(self.params.iterations, grid.cols() * grid.rows());
        for _ in 0..generations {
            grid = grid.step(&birth, &survive);
        }
        grid
    }
}

impl Renderer for Cellular {
    fn render(&self, frame: &mut Frame<'_>) {
        let size = self.params.cell_size.max(1);
        let cols = frame.surface.width() / size;
        let rows = frame.surface.height() / size;
        let grid = self.simulate(cols, rows, frame.rng);

        let cell = size as f64;
        for (col, row) in grid.live_cells() {
            let color = frame.palette.get((col + row) % frame.palette.len());
            let rect = Rect::new(col as f64 * cell, row as f64 * cell, cell, cell);
            frame.surface.fill_rect(rect, color.opaque());
        }
    }

    fn params(&self) -> Value {
        json!({
            "cellSize": self.params.cell_size,
            "initialDensity": self.params.initial_density,
            "iterations": self.params.iterations,
            "birthRule": self.params.birth_rule,
            "surviveRule": self.params.survive_rule,
        })
    }

    fn param_schema(&self) -> &'static ParamSchema {
        &SCHEMA
    }
}
