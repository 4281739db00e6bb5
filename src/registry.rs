use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::cell::direction::RotationTable;
use crate::cell::{CellKind, CellType};

/// Every known cell kind with its generated variants, in `CellKind` order.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Deref)]
pub struct CellRegistry {
    #[deref]
    pub cells: Vec<CellType>,
}

impl CellRegistry {
    pub fn build(table: &RotationTable) -> Self {
        Self::build_only(table, &CellKind::iter().collect_vec())
    }

    // 선택된 종류만 생성, 순서는 항상 CellKind 순서를 따름
    pub fn build_only(table: &RotationTable, kinds: &[CellKind]) -> Self {
        let cells = CellKind::iter()
            .filter(|kind| kinds.contains(kind))
            .map(|kind| {
                let variants = kind.family().generate(table);
                tracing::debug!("{kind}: {} variants", variants.len());

                CellType { kind, variants }
            })
            .collect_vec();

        Self { cells }
    }

    pub fn get(&self, kind: CellKind) -> Option<&CellType> {
        self.cells.iter().find(|cell| cell.kind == kind)
    }

    pub fn variant_count(&self) -> usize {
        self.cells.iter().map(|cell| cell.variants.len()).sum()
    }
}
