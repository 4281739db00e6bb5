use std::collections::BTreeSet;

use eyre::{ensure, eyre, WrapErr};
use itertools::Itertools;

use super::{find_cell, variant_name, CellLayout, Position};
use crate::cell::port::Variant;
use crate::cell::{CellType, Footprint};
use crate::registry::CellRegistry;

pub trait Verify {
    fn verify(&self) -> eyre::Result<()>;
}

impl Verify for CellLayout {
    fn verify(&self) -> eyre::Result<()> {
        ensure!(!self.name.is_empty(), "cell without name");
        ensure!(!self.variants.is_empty(), "{}: no variants", self.name);

        let (x_size, y_size, z_size) = self.size;
        ensure!(
            x_size > 0 && y_size > 0 && z_size > 0,
            "{}: invalid dimensions {:?}",
            self.name,
            self.size
        );

        ensure!(
            self.variants.iter().map(|v| &v.name).all_unique(),
            "{}: duplicated variant name",
            self.name
        );

        let bound_on = |Position(x, y, z): Position| {
            (0..x_size as i32).contains(&x)
                && (0..y_size as i32).contains(&y)
                && (0..z_size as i32).contains(&z)
        };

        for variant in &self.variants {
            ensure!(!variant.name.is_empty(), "{}: variant without name", self.name);
            ensure!(!variant.ports.is_empty(), "{}: no ports", variant.name);
            ensure!(
                variant.ports.iter().map(|p| &p.name).all_unique(),
                "{}: duplicated port name",
                variant.name
            );

            if let Some(port) = variant.ports.iter().find(|p| !bound_on(p.position)) {
                eyre::bail!("{}: port {} out of bounds", variant.name, port.name);
            }
            if let Some(block) = variant.blocks.iter().find(|b| !bound_on(b.position)) {
                eyre::bail!(
                    "{}: block {} at {:?} out of bounds",
                    variant.name,
                    block.block_type,
                    block.position
                );
            }
        }

        Ok(())
    }
}

// 중심 기준 좌표로 되돌린 (이름, x, z)
fn canonical_ports(variant: &Variant) -> BTreeSet<(String, i32, i32)> {
    variant
        .ports
        .iter()
        .map(|port| (port.name.clone(), port.direction.x(), port.direction.z()))
        .collect()
}

fn verify_cell(cell: &CellType, layout: &CellLayout) -> eyre::Result<()> {
    layout.verify()?;

    let footprint = cell.kind.footprint();
    let size = (footprint.size.0, footprint.size.1, footprint.size.2);
    ensure!(
        layout.size == size,
        "dimensions {:?}, expected {:?}",
        layout.size,
        size
    );
    ensure!(
        layout.variants.len() == cell.variants.len(),
        "{} variants, expected {}",
        layout.variants.len(),
        cell.variants.len()
    );

    for (index, (variant, placed)) in cell.variants.iter().zip(&layout.variants).enumerate() {
        let name = variant_name(cell.name(), index);
        ensure!(placed.name == name, "variant {} found, expected {name}", placed.name);

        ensure!(
            placed
                .ports
                .iter()
                .all(|port| port.position.1 == Footprint::PORT_LAYER),
            "{name}: port outside the port layer"
        );

        let recovered = placed
            .ports
            .iter()
            .map(|port| {
                let Position(x, _, z) = port.position;
                (port.name.clone(), x - footprint.offset, z - footprint.offset)
            })
            .collect::<BTreeSet<_>>();
        ensure!(
            recovered == canonical_ports(variant),
            "{name}: ports {recovered:?} do not match {variant}"
        );
    }

    Ok(())
}

/// Checks layouts read back from a variant file against the registry they
/// were generated from.
pub fn verify_layouts(registry: &CellRegistry, layouts: &[CellLayout]) -> eyre::Result<()> {
    ensure!(
        layouts.len() == registry.len(),
        "{} cells found, expected {}",
        layouts.len(),
        registry.len()
    );

    for cell in registry.iter() {
        let layout = find_cell(layouts, cell.name())
            .ok_or_else(|| eyre!("cell {} is missing", cell.name()))?;
        verify_cell(cell, layout).wrap_err_with(|| format!("cell {}", cell.name()))?;
    }

    Ok(())
}
