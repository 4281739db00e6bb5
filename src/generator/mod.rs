use itertools::{iproduct, Itertools};

use crate::cell::direction::{Direction, RotationTable, K_ROTATION_COUNT};
use crate::cell::port::{Port, Variant, K_OUTPUT_PORT};
use crate::cell::Family;

/// Expands a canonical layout into its four quarter-turn variants.
///
/// Variant `i` has every port rotated by `i` steps; ports are sorted by name
/// so variants of different layouts compare the same way.
pub fn expand_rotations(table: &RotationTable, layout: &[Port]) -> Vec<Variant> {
    (0..K_ROTATION_COUNT)
        .map(|offset| {
            layout
                .iter()
                .map(|port| Port::new(&port.name, table.rotate(port.direction, offset)))
                .sorted()
                .collect_vec()
        })
        .map(Variant::new)
        .collect()
}

fn output_port() -> Port {
    Port::new(K_OUTPUT_PORT, Direction::NORTH)
}

pub fn pad_variants() -> Vec<Variant> {
    vec![Variant::new(vec![Port::new("X", Direction::CENTER)])]
}

pub fn not_variants(table: &RotationTable) -> Vec<Variant> {
    table
        .side_directions()
        .iter()
        .flat_map(|&dir| expand_rotations(table, &[Port::new("A", dir), output_port()]))
        .collect()
}

pub fn xor_variants(table: &RotationTable) -> Vec<Variant> {
    [
        (Direction::WEST, Direction::EAST),
        (Direction::EAST, Direction::WEST),
    ]
    .into_iter()
    .flat_map(|(a, b)| {
        expand_rotations(
            table,
            &[Port::new("A", a), Port::new("B", b), output_port()],
        )
    })
    .collect()
}

pub fn three_input_variants(table: &RotationTable) -> Vec<Variant> {
    let sides = table.side_directions();

    iproduct!(0..sides.len(), 0..sides.len())
        .filter(|(i1, i2)| i1 != i2)
        .flat_map(|(i1, i2)| {
            // 남은 한 방향
            let i3 = 3 - i1 - i2;

            expand_rotations(
                table,
                &[
                    Port::new("A", sides[i1]),
                    Port::new("B", sides[i2]),
                    Port::new("C", sides[i3]),
                    output_port(),
                ],
            )
        })
        .collect()
}

impl Family {
    pub fn generate(&self, table: &RotationTable) -> Vec<Variant> {
        match self {
            Family::Pad => pad_variants(),
            Family::Not => not_variants(table),
            Family::Xor => xor_variants(table),
            Family::ThreeInput => three_input_variants(table),
        }
    }
}
