//! The battle map: a bounded, row-major terrain layer.

use std::cell::Cell;

use xxhash_rust::xxh3::Xxh3;

use crate::geom::Point;
use crate::terrain::TerrainId;

/// Errors from map construction.
///
/// Malformed layer dimensions are the one condition in this subsystem
/// treated as a hard failure rather than a soft empty result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("terrain layer has no rows")]
    EmptyLayer,
    #[error("terrain row {row} has {got} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },
}

/// A rectangular terrain layer, stored row-major (`[y][x]`).
///
/// The map memoizes a full xxh3 content fingerprint over its dimensions
/// and tiles. The fingerprint is invalidated by [`set_terrain`] and
/// recomputed lazily on the next [`fingerprint`] call, so hashing costs
/// O(map) only when terrain has actually changed.
///
/// [`set_terrain`]: BattleMap::set_terrain
/// [`fingerprint`]: BattleMap::fingerprint
#[derive(Debug, Clone)]
pub struct BattleMap {
    width: i32,
    height: i32,
    terrain: Vec<TerrainId>,
    fingerprint: Cell<Option<u64>>,
}

impl BattleMap {
    /// Create a map of the given size with every tile set to the
    /// fallback terrain type.
    pub fn new(width: i32, height: i32) -> Self {
        let w = width.max(0);
        let h = height.max(0);
        Self {
            width: w,
            height: h,
            terrain: vec![TerrainId::FALLBACK; (w * h) as usize],
            fingerprint: Cell::new(None),
        }
    }

    /// Build a map from explicit rows (`rows[y][x]`).
    pub fn from_rows(rows: &[Vec<TerrainId>]) -> Result<Self, MapError> {
        let height = rows.len();
        if height == 0 || rows[0].is_empty() {
            return Err(MapError::EmptyLayer);
        }
        let width = rows[0].len();
        let mut terrain = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(MapError::RaggedRow {
                    row: y,
                    expected: width,
                    got: row.len(),
                });
            }
            terrain.extend_from_slice(row);
        }
        Ok(Self {
            width: width as i32,
            height: height as i32,
            terrain,
            fingerprint: Cell::new(None),
        })
    }

    /// Map width in tiles.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Map height in tiles.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Whether `p` lies within the map bounds.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    /// Terrain id at `p`, or `None` when out of bounds.
    #[inline]
    pub fn at(&self, p: Point) -> Option<TerrainId> {
        if !self.contains(p) {
            return None;
        }
        Some(self.terrain[(p.y * self.width + p.x) as usize])
    }

    /// Set the terrain at `p`. Out-of-bounds writes are ignored.
    ///
    /// Invalidates the memoized fingerprint only when the tile value
    /// actually changes.
    pub fn set_terrain(&mut self, p: Point, id: TerrainId) {
        if !self.contains(p) {
            return;
        }
        let idx = (p.y * self.width + p.x) as usize;
        if self.terrain[idx] != id {
            self.terrain[idx] = id;
            self.fingerprint.set(None);
        }
    }

    /// Full content fingerprint over dimensions and every tile.
    ///
    /// Deterministically changes whenever any terrain relevant to a
    /// query changes; no partial sampling.
    pub fn fingerprint(&self) -> u64 {
        if let Some(fp) = self.fingerprint.get() {
            return fp;
        }
        let mut hasher = Xxh3::new();
        hasher.update(&self.width.to_le_bytes());
        hasher.update(&self.height.to_le_bytes());
        for cell in &self.terrain {
            hasher.update(&cell.value().to_le_bytes());
        }
        let fp = hasher.digest();
        self.fingerprint.set(Some(fp));
        fp
    }
}
