use itertools::Itertools;

use super::{BlockPlacement, CellLayout, PortPlacement, VariantLayout};

const K_INDENT: &str = "    ";

pub struct XmlBuilder<'a> {
    cells: &'a [CellLayout],
}

impl<'a> XmlBuilder<'a> {
    pub fn new(cells: &'a [CellLayout]) -> Self {
        Self { cells }
    }

    pub fn build(&self) -> String {
        let mut lines = vec![
            r#"<?xml version="1.0" encoding="UTF-8"?>"#.to_owned(),
            "<cells>".to_owned(),
        ];
        lines.extend(self.cells.iter().flat_map(|cell| Self::print_cell(cell, 1)));
        lines.push("</cells>".to_owned());

        lines.join("\n") + "\n"
    }

    fn print_cell(cell: &CellLayout, depth: usize) -> Vec<String> {
        let tabs = K_INDENT.repeat(depth);
        let (x, y, z) = cell.size;

        let mut lines = vec![format!(
            r#"{tabs}<cell name="{}" xSize="{x}" ySize="{y}" zSize="{z}">"#,
            escape(&cell.name)
        )];
        lines.extend(
            cell.variants
                .iter()
                .flat_map(|variant| Self::print_variant(variant, depth + 1)),
        );
        lines.push(format!("{tabs}</cell>"));
        lines
    }

    fn print_variant(variant: &VariantLayout, depth: usize) -> Vec<String> {
        let tabs = K_INDENT.repeat(depth);
        let inner = K_INDENT.repeat(depth + 1);

        let mut lines = vec![format!(
            r#"{tabs}<variant name="{}">"#,
            escape(&variant.name)
        )];

        lines.push(format!("{inner}<ports>"));
        lines.extend(
            variant
                .ports
                .iter()
                .map(|port| Self::print_port(port, depth + 2)),
        );
        lines.push(format!("{inner}</ports>"));

        lines.push(format!("{inner}<blocks>"));
        lines.extend(
            variant
                .blocks
                .iter()
                .map(|block| Self::print_block(block, depth + 2)),
        );
        lines.push(format!("{inner}</blocks>"));

        lines.push(format!("{tabs}</variant>"));
        lines
    }

    fn print_port(port: &PortPlacement, depth: usize) -> String {
        let super::Position(x, y, z) = port.position;
        format!(
            r#"{}<port name="{}" x="{x}" y="{y}" z="{z}"/>"#,
            K_INDENT.repeat(depth),
            escape(&port.name)
        )
    }

    fn print_block(block: &BlockPlacement, depth: usize) -> String {
        let super::Position(x, y, z) = block.position;
        format!(
            r#"{}<block type="{}" rotation="{}" x="{x}" y="{y}" z="{z}"/>"#,
            K_INDENT.repeat(depth),
            escape(&block.block_type),
            block.rotation
        )
    }
}

fn escape(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '&' => "&amp;".to_owned(),
            '<' => "&lt;".to_owned(),
            '>' => "&gt;".to_owned(),
            '"' => "&quot;".to_owned(),
            c => c.to_string(),
        })
        .join("")
}

pub trait ToXml {
    fn to_xml(&self) -> String;
}

impl ToXml for [CellLayout] {
    fn to_xml(&self) -> String {
        XmlBuilder::new(self).build()
    }
}
