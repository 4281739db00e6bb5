use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

pub mod direction;
pub mod port;

use self::port::Variant;

// 사이즈 (x, y, z)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DimSize(pub usize, pub usize, pub usize);

// 게이트 블록 주변으로 포트가 놓이는 영역
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Footprint {
    pub size: DimSize,
    // 중심 블록의 x/z 좌표
    pub offset: i32,
}

impl Footprint {
    pub const PORT_LAYER: i32 = 1;
}

/// Generator shared by one or more cell kinds. Kinds in the same family get
/// identical geometry and differ only in the gate block placed downstream.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Family {
    Pad,
    Not,
    Xor,
    ThreeInput,
}

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum CellKind {
    Pad,
    Not,
    Xor2,
    Xnor2,
    And3,
    Nand3,
    Or3,
    Nor3,
}

impl CellKind {
    pub fn family(&self) -> Family {
        match self {
            CellKind::Pad => Family::Pad,
            CellKind::Not => Family::Not,
            CellKind::Xor2 | CellKind::Xnor2 => Family::Xor,
            CellKind::And3 | CellKind::Nand3 | CellKind::Or3 | CellKind::Nor3 => {
                Family::ThreeInput
            }
        }
    }

    pub fn is_pad(&self) -> bool {
        matches!(self, CellKind::Pad)
    }

    pub fn footprint(&self) -> Footprint {
        if self.is_pad() {
            Footprint {
                size: DimSize(1, 2, 1),
                offset: 0,
            }
        } else {
            Footprint {
                size: DimSize(3, 2, 3),
                offset: 1,
            }
        }
    }

    // pad는 게이트 블록이 없음
    pub fn gate_block_type(&self) -> Option<String> {
        (!self.is_pad()).then(|| format!("${}", self.as_ref().to_lowercase()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellType {
    pub kind: CellKind,
    pub variants: Vec<Variant>,
}

impl CellType {
    pub fn name(&self) -> &str {
        self.kind.as_ref()
    }
}
