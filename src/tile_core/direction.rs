use std::fmt;
use std::str::FromStr;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::tile_core::error::TileError;

/// Label grids are indexed `labels[y][x]`; North looks toward `y + 1`
/// (the renderer flips the vertical axis) and East toward `x - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Step to the neighbouring tile. Also the step to the neighbouring
    /// chunk when the tile sits on that edge.
    pub const fn offset(self) -> IVec2 {
        match self {
            Direction::North => IVec2::new(0, 1),
            Direction::South => IVec2::new(0, -1),
            Direction::East => IVec2::new(-1, 0),
            Direction::West => IVec2::new(1, 0),
        }
    }

    /// Coordinate one step away in this direction, `None` past the `i32` range.
    pub fn step_coord(self, coord: IVec2) -> Option<IVec2> {
        checked_offset(coord, self.offset())
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }

    pub const fn token(self) -> &'static str {
        match self {
            Direction::North => "n",
            Direction::South => "s",
            Direction::East => "e",
            Direction::West => "w",
        }
    }

    /// Local tiles of a `side`-sized chunk whose neighbour in this
    /// direction lies in the adjacent chunk.
    pub fn edge_tiles(self, side: usize) -> impl Iterator<Item = (usize, usize)> {
        let last = side.saturating_sub(1);
        (0..side).map(move |i| match self {
            Direction::North => (i, last),
            Direction::South => (i, 0),
            Direction::East => (0, i),
            Direction::West => (last, i),
        })
    }

    /// Neighbour of a local tile, or `None` when it falls outside the chunk.
    pub fn step_within(self, x: usize, y: usize, side: usize) -> Option<(usize, usize)> {
        let offset = self.offset();
        let nx = x as i64 + i64::from(offset.x);
        let ny = y as i64 + i64::from(offset.y);
        let side = side as i64;
        if (0..side).contains(&nx) && (0..side).contains(&ny) {
            Some((nx as usize, ny as usize))
        } else {
            None
        }
    }

    /// Neighbour of a local tile, wrapped into the adjacent chunk's
    /// local coordinates.
    pub fn step_wrapped(self, x: usize, y: usize, side: usize) -> (usize, usize) {
        let offset = self.offset();
        let side = side as i64;
        let nx = (x as i64 + i64::from(offset.x)).rem_euclid(side);
        let ny = (y as i64 + i64::from(offset.y)).rem_euclid(side);
        (nx as usize, ny as usize)
    }
}

/// Component-wise `coord + offset`, `None` on overflow.
pub fn checked_offset(coord: IVec2, offset: IVec2) -> Option<IVec2> {
    Some(IVec2::new(
        coord.x.checked_add(offset.x)?,
        coord.y.checked_add(offset.y)?,
    ))
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Direction {
    type Err = TileError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.trim().to_ascii_lowercase().as_str() {
            "n" | "north" => Ok(Direction::North),
            "s" | "south" => Ok(Direction::South),
            "e" | "east" => Ok(Direction::East),
            "w" | "west" => Ok(Direction::West),
            _ => Err(TileError::UnknownDirection(token.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposites_mirror_offsets() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_eq!(direction.offset() + direction.opposite().offset(), IVec2::ZERO);
        }
    }

    #[test]
    fn parses_short_and_long_tokens() {
        assert_eq!("n".parse::<Direction>().unwrap(), Direction::North);
        assert_eq!("West".parse::<Direction>().unwrap(), Direction::West);
        assert_eq!(
            "up".parse::<Direction>(),
            Err(TileError::UnknownDirection("up".to_string()))
        );
    }

    #[test]
    fn edge_tiles_are_exactly_the_tiles_without_inner_neighbour() {
        let side = 4;
        for direction in Direction::ALL {
            let mut edge: Vec<_> = direction.edge_tiles(side).collect();
            edge.sort_unstable();
            let mut expected = Vec::new();
            for x in 0..side {
                for y in 0..side {
                    if direction.step_within(x, y, side).is_none() {
                        expected.push((x, y));
                    }
                }
            }
            expected.sort_unstable();
            assert_eq!(edge, expected, "{direction:?}");
        }
    }

    #[test]
    fn chunk_step_stops_at_the_i32_range() {
        let edge = IVec2::new(i32::MAX, i32::MIN);
        assert_eq!(Direction::West.step_coord(edge), None);
        assert_eq!(Direction::South.step_coord(edge), None);
        assert_eq!(
            Direction::East.step_coord(edge),
            Some(IVec2::new(i32::MAX - 1, i32::MIN))
        );
    }

    #[test]
    fn wrapped_step_lands_on_opposite_edge() {
        assert_eq!(Direction::North.step_wrapped(2, 3, 4), (2, 0));
        assert_eq!(Direction::South.step_wrapped(2, 0, 4), (2, 3));
        assert_eq!(Direction::East.step_wrapped(0, 1, 4), (3, 1));
        assert_eq!(Direction::West.step_wrapped(3, 1, 4), (0, 1));
    }
}
