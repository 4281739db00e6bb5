use std::fmt;

// 중심 블록 기준 (x, z) 방향
//
//           ( 0,  1)
//   (-1,  0)    X    ( 1,  0)
//           ( 0, -1)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Direction(pub i32, pub i32);

impl Direction {
    pub const CENTER: Direction = Direction(0, 0);
    pub const NORTH: Direction = Direction(0, 1);
    pub const EAST: Direction = Direction(1, 0);
    pub const SOUTH: Direction = Direction(0, -1);
    pub const WEST: Direction = Direction(-1, 0);

    pub fn x(&self) -> i32 {
        self.0
    }

    pub fn z(&self) -> i32 {
        self.1
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

pub const K_ROTATION_COUNT: usize = 4;

/// Quarter-turn rotation group over the four cardinal directions.
///
/// Index `i` of the table is the rotation state `i`; rotating by `k` walks `k`
/// steps forward through the table.
#[derive(Debug, Clone)]
pub struct RotationTable {
    directions: [Direction; K_ROTATION_COUNT],
}

impl RotationTable {
    pub fn new() -> Self {
        Self {
            directions: [
                Direction::NORTH,
                Direction::EAST,
                Direction::SOUTH,
                Direction::WEST,
            ],
        }
    }

    pub fn directions(&self) -> &[Direction; K_ROTATION_COUNT] {
        &self.directions
    }

    // identity (north)를 제외한 나머지 방향
    pub fn side_directions(&self) -> &[Direction] {
        &self.directions[1..]
    }

    pub fn index_of(&self, dir: Direction) -> Option<usize> {
        self.directions.iter().position(|&d| d == dir)
    }

    /// Rotates `dir` by `k` quarter turns. Vectors outside the table (the
    /// center) are fixed points.
    pub fn rotate(&self, dir: Direction, k: usize) -> Direction {
        match self.index_of(dir) {
            Some(index) => self.directions[(index + k) % K_ROTATION_COUNT],
            None => dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unittest_rotation_group_is_closed() {
        let table = RotationTable::new();

        for &dir in table.directions() {
            assert_eq!(table.rotate(table.rotate(dir, 1), 1), table.rotate(dir, 2));
            assert_eq!(table.rotate(dir, 4), dir);
            assert_eq!(table.rotate(table.rotate(dir, 1), 3), dir);
        }
    }

    #[test]
    fn unittest_rotation_follows_table_order() {
        let table = RotationTable::new();

        assert_eq!(table.rotate(Direction::NORTH, 1), Direction::EAST);
        assert_eq!(table.rotate(Direction::EAST, 1), Direction::SOUTH);
        assert_eq!(table.rotate(Direction::SOUTH, 1), Direction::WEST);
        assert_eq!(table.rotate(Direction::WEST, 1), Direction::NORTH);
        assert_eq!(table.rotate(Direction::WEST, 6), Direction::EAST);
    }

    #[test]
    fn unittest_index_of() {
        let table = RotationTable::new();

        let indices = table
            .directions()
            .iter()
            .map(|&dir| table.index_of(dir))
            .collect::<Vec<_>>();
        assert_eq!(indices, vec![Some(0), Some(1), Some(2), Some(3)]);
        assert_eq!(table.index_of(Direction::CENTER), None);
    }

    #[test]
    fn unittest_center_is_fixed_point() {
        let table = RotationTable::new();

        for k in 0..K_ROTATION_COUNT {
            assert_eq!(table.rotate(Direction::CENTER, k), Direction::CENTER);
        }
    }
}
