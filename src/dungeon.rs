#![allow(clippy::cast_sign_loss)]

use std::fmt::Display;

use rand::{rngs::StdRng, Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info};

/// Smallest room edge the generator will sample.
const MIN_ROOM_SIZE: i32 = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Floor,
}

impl Tile {
    pub const fn to_char(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Floor => '.',
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Vector(pub i32, pub i32);

/// Row-major tile grid. Every cell starts as `Wall`; carving only ever
/// turns cells into `Floor`.
pub struct Stage {
    pub width: i32,
    pub height: i32,
    tiles: Vec<Tile>,
}

impl Stage {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::Wall; width as usize * height as usize],
        }
    }

    /// Writes outside the grid are dropped, so carving clips at the
    /// edges instead of wrapping into the next row.
    pub fn set(&mut self, pos: Vector, tile: Tile) {
        if self.contains(pos) {
            let idx = pos.1 as usize * self.width as usize + pos.0 as usize;
            self.tiles[idx] = tile;
        }
    }

    pub fn get(&self, pos: Vector) -> Option<Tile> {
        if self.contains(pos) {
            let idx = pos.1 as usize * self.width as usize + pos.0 as usize;
            self.tiles.get(idx).copied()
        } else {
            None
        }
    }

    pub const fn contains(&self, pos: Vector) -> bool {
        pos.0 >= 0 && pos.0 < self.width && pos.1 >= 0 && pos.1 < self.height
    }

    /// Floors every in-bounds cell of the rectangle with origin `(x, y)`.
    /// Out-of-bounds cells are skipped silently.
    pub fn carve_room(&mut self, x: i32, y: i32, room_width: i32, room_height: i32) {
        for dy in 0..room_height {
            for dx in 0..room_width {
                self.set(Vector(x + dx, y + dy), Tile::Floor);
            }
        }
    }

    /// Rows top-first, for rendering.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.width as usize)
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            for &tile in row {
                write!(f, "{}", tile.to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum GenError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[derive(Copy, Clone, Debug)]
pub struct Config {
    pub width: i32,
    pub height: i32,
    pub num_rooms: u32,
    pub max_room_size: i32,
}

impl Config {
    /// Rejects anything that would make the placement sampling ranges
    /// empty or inverted. With `num_rooms == 0` only the grid
    /// dimensions matter; the result is a grid of solid wall.
    fn validate(&self) -> Result<(), GenError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(GenError::InvalidConfiguration(format!(
                "grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.num_rooms == 0 {
            return Ok(());
        }
        if self.max_room_size < MIN_ROOM_SIZE {
            return Err(GenError::InvalidConfiguration(format!(
                "max_room_size must be at least {MIN_ROOM_SIZE}, got {}",
                self.max_room_size
            )));
        }
        // A room of max_room_size must leave one wall cell on each side,
        // or the origin range [1, dim - room - 1] inverts.
        if self.width < self.max_room_size + 2 || self.height < self.max_room_size + 2 {
            return Err(GenError::InvalidConfiguration(format!(
                "rooms up to {0}x{0} cannot fit a {1}x{2} grid",
                self.max_room_size, self.width, self.height
            )));
        }
        Ok(())
    }
}

pub struct Dungeon {
    config: Config,
    rng: StdRng,
    centers: Vec<Vector>,
}

impl Dungeon {
    pub fn new(config: Config) -> Result<Self, GenError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic variant: the same seed and config always produce
    /// the same stage.
    pub fn with_seed(config: Config, seed: u64) -> Result<Self, GenError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: Config, rng: StdRng) -> Result<Self, GenError> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            centers: Vec::new(),
        })
    }

    pub fn generate(&mut self) -> Stage {
        let mut stage = Stage::new(self.config.width, self.config.height);

        // Each run links only its own rooms; stale centers from an
        // earlier run must not grow corridors into the new stage.
        self.centers.clear();
        self.add_rooms(&mut stage);
        self.connect_rooms(&mut stage);

        info!(
            rooms = self.centers.len(),
            width = stage.width,
            height = stage.height,
            "dungeon generated"
        );
        stage
    }

    fn add_rooms(&mut self, stage: &mut Stage) {
        for _ in 0..self.config.num_rooms {
            let room_w = self.rng.gen_range(MIN_ROOM_SIZE..=self.config.max_room_size);
            let room_h = self.rng.gen_range(MIN_ROOM_SIZE..=self.config.max_room_size);
            // Origins start at 1 so rooms never touch the border.
            // validate() guarantees both ranges are non-empty.
            let x = self.rng.gen_range(1..=self.config.width - room_w - 1);
            let y = self.rng.gen_range(1..=self.config.height - room_h - 1);

            stage.carve_room(x, y, room_w, room_h);

            // Center of the sampled rectangle, not of whatever survived
            // clipping. Overlap between rooms is allowed.
            let center = Vector(x + room_w / 2, y + room_h / 2);
            self.centers.push(center);
            debug!(x, y, room_w, room_h, ?center, "carved room");
        }
    }

    /// Links each room to the one placed before it with an L-shaped
    /// corridor. The first room has no predecessor and no backward link.
    fn connect_rooms(&mut self, stage: &mut Stage) {
        for pair in self.centers.windows(2) {
            carve_corridor(stage, pair[0], pair[1]);
            debug!(from = ?pair[0], to = ?pair[1], "carved corridor");
        }
    }
}

/// Carves a horizontal run at `from`'s row, then a vertical run at
/// `to`'s column. The two legs meet at the elbow `(to.x, from.y)`.
fn carve_corridor(stage: &mut Stage, from: Vector, to: Vector) {
    for x in from.0.min(to.0)..=from.0.max(to.0) {
        stage.set(Vector(x, from.1), Tile::Floor);
    }
    for y in from.1.min(to.1)..=from.1.max(to.1) {
        stage.set(Vector(to.0, y), Tile::Floor);
    }
}
