use eyre::eyre;
use itertools::{iproduct, Itertools};
use serde::{Deserialize, Serialize};

use crate::cell::direction::RotationTable;
use crate::cell::port::{Port, Variant};
use crate::cell::{CellType, Footprint};
use crate::registry::CellRegistry;

pub mod reader;
pub mod verify;
pub mod xml;

pub const K_STONE_BLOCK: &str = "$stone";
pub const K_BLOCKAGE_BLOCK: &str = "$blockage";

// 위치 (x, y, z)
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position(pub i32, pub i32, pub i32);

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortPlacement {
    pub name: String,
    pub position: Position,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BlockPlacement {
    #[serde(rename = "type")]
    pub block_type: String,
    pub rotation: usize,
    pub position: Position,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct VariantLayout {
    pub name: String,
    pub ports: Vec<PortPlacement>,
    pub blocks: Vec<BlockPlacement>,
}

impl VariantLayout {
    pub fn port_position(&self, name: &str) -> Option<Position> {
        self.ports
            .iter()
            .find(|port| port.name == name)
            .map(|port| port.position)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct CellLayout {
    pub name: String,
    // (x, y, z)
    pub size: (usize, usize, usize),
    pub variants: Vec<VariantLayout>,
}

impl CellLayout {
    pub fn variant(&self, name: &str) -> Option<&VariantLayout> {
        self.variants.iter().find(|variant| variant.name == name)
    }
}

pub fn find_cell<'a>(layouts: &'a [CellLayout], name: &str) -> Option<&'a CellLayout> {
    layouts.iter().find(|cell| cell.name == name)
}

pub fn variant_name(cell_name: &str, index: usize) -> String {
    format!("{cell_name}${:03}", index + 1)
}

/// Center-relative port direction to footprint-local coordinates.
pub fn port_position(footprint: &Footprint, port: &Port) -> Position {
    Position(
        port.direction.x() + footprint.offset,
        Footprint::PORT_LAYER,
        port.direction.z() + footprint.offset,
    )
}

pub struct LayoutBuilder<'a> {
    table: &'a RotationTable,
}

impl<'a> LayoutBuilder<'a> {
    pub fn new(table: &'a RotationTable) -> Self {
        Self { table }
    }

    pub fn build(&self, registry: &CellRegistry) -> eyre::Result<Vec<CellLayout>> {
        registry.iter().map(|cell| self.build_cell(cell)).collect()
    }

    pub fn build_cell(&self, cell: &CellType) -> eyre::Result<CellLayout> {
        let footprint = cell.kind.footprint();

        let variants = cell
            .variants
            .iter()
            .enumerate()
            .map(|(index, variant)| {
                self.build_variant(cell, &footprint, variant_name(cell.name(), index), variant)
            })
            .collect::<eyre::Result<Vec<_>>>()?;

        Ok(CellLayout {
            name: cell.name().to_owned(),
            size: (footprint.size.0, footprint.size.1, footprint.size.2),
            variants,
        })
    }

    fn build_variant(
        &self,
        cell: &CellType,
        footprint: &Footprint,
        name: String,
        variant: &Variant,
    ) -> eyre::Result<VariantLayout> {
        let rotation = self.rotation(cell, &name, variant)?;

        let ports = variant
            .ports
            .iter()
            .map(|port| PortPlacement {
                name: port.name.clone(),
                position: port_position(footprint, port),
            })
            .collect_vec();

        // floor
        let mut blocks = iproduct!(0..footprint.size.0, 0..footprint.size.2)
            .map(|(x, z)| BlockPlacement {
                block_type: K_STONE_BLOCK.to_owned(),
                rotation: 0,
                position: Position(x as i32, 0, z as i32),
            })
            .collect_vec();

        blocks.extend(ports.iter().map(|port| BlockPlacement {
            block_type: K_BLOCKAGE_BLOCK.to_owned(),
            rotation: 0,
            position: port.position,
        }));

        if let Some(block_type) = cell.kind.gate_block_type() {
            blocks.push(BlockPlacement {
                block_type,
                rotation,
                position: Position(footprint.offset, Footprint::PORT_LAYER, footprint.offset),
            });
        }

        Ok(VariantLayout {
            name,
            ports,
            blocks,
        })
    }

    // 출력 포트(Y)의 방향이 게이트 블록의 회전
    fn rotation(&self, cell: &CellType, name: &str, variant: &Variant) -> eyre::Result<usize> {
        if cell.kind.is_pad() {
            return Ok(0);
        }

        let Some(output) = variant.output() else {
            return Ok(0);
        };

        self.table
            .index_of(output.direction)
            .ok_or_else(|| eyre!("{name}: output port {output} is not a cardinal direction"))
    }
}
