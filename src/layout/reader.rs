use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use eyre::{bail, WrapErr};
use regex::Regex;

use super::{BlockPlacement, CellLayout, PortPlacement, Position, VariantLayout};

const K_TOKEN_PATTERN: &str = r#"(?s)<\?.*?\?>|<!--.*?-->|<(/?)([A-Za-z_][\w\-]*)((?:\s+[\w\-]+\s*=\s*(?:"[^"]*"|'[^']*'))*)\s*(/?)>"#;
const K_ATTRIBUTE_PATTERN: &str = r#"([\w\-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#;

#[derive(Debug, Clone)]
struct XmlTag {
    name: String,
    attributes: HashMap<String, String>,
    // <tag/>
    empty: bool,
}

impl XmlTag {
    fn attribute(&self, key: &str) -> eyre::Result<&str> {
        match self.attributes.get(key) {
            Some(value) if !value.is_empty() => Ok(value.as_str()),
            _ => bail!("<{}>: missing attribute '{key}'", self.name),
        }
    }

    fn number<T>(&self, key: &str) -> eyre::Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let value = self.attribute(key)?;
        value
            .parse()
            .wrap_err_with(|| format!("<{}>: attribute '{key}' is not a number: {value}", self.name))
    }

    fn position(&self) -> eyre::Result<Position> {
        Ok(Position(
            self.number("x")?,
            self.number("y")?,
            self.number("z")?,
        ))
    }
}

#[derive(Debug, Clone)]
enum XmlEvent {
    Start(XmlTag),
    End(String),
}

fn unescape(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn tokenize(text: &str) -> eyre::Result<Vec<XmlEvent>> {
    let token = Regex::new(K_TOKEN_PATTERN)?;
    let attribute = Regex::new(K_ATTRIBUTE_PATTERN)?;

    let mut events = Vec::new();
    let mut ptr = 0;

    for captures in token.captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };

        let gap = &text[ptr..whole.start()];
        if !gap.trim().is_empty() {
            bail!("unexpected content at byte {ptr}: {}", gap.trim());
        }
        ptr = whole.end();

        // declaration, comment
        let Some(name) = captures.get(2) else {
            continue;
        };

        let is_end = captures.get(1).is_some_and(|m| !m.as_str().is_empty());
        let empty = captures.get(4).is_some_and(|m| !m.as_str().is_empty());

        if is_end {
            events.push(XmlEvent::End(name.as_str().to_owned()));
            continue;
        }

        let attributes: HashMap<String, String> = captures
            .get(3)
            .map(|attrs| {
                attribute
                    .captures_iter(attrs.as_str())
                    .filter_map(|attr| {
                        let value = attr.get(2).or_else(|| attr.get(3))?;
                        Some((attr[1].to_owned(), unescape(value.as_str())))
                    })
                    .collect()
            })
            .unwrap_or_default();

        events.push(XmlEvent::Start(XmlTag {
            name: name.as_str().to_owned(),
            attributes,
            empty,
        }));
    }

    if !text[ptr..].trim().is_empty() {
        bail!("unexpected content at byte {ptr}: {}", text[ptr..].trim());
    }

    Ok(events)
}

/// Reads a cell variant document back into layout records.
pub struct LayoutReader {
    events: std::vec::IntoIter<XmlEvent>,
}

impl LayoutReader {
    pub fn new(text: &str) -> eyre::Result<Self> {
        Ok(Self {
            events: tokenize(text)?.into_iter(),
        })
    }

    pub fn read(mut self) -> eyre::Result<Vec<CellLayout>> {
        let root = loop {
            match self.events.next() {
                Some(XmlEvent::Start(tag)) if tag.name == "cells" => break tag,
                Some(XmlEvent::Start(tag)) => self.skip(&tag)?,
                Some(XmlEvent::End(name)) => bail!("unexpected </{name}>"),
                None => bail!("document has no <cells> element"),
            }
        };

        if root.empty {
            self.finish()?;
            return Ok(Vec::new());
        }

        let mut cells = Vec::new();
        while let Some(tag) = self.next_child("cells")? {
            match &tag.name[..] {
                "cell" => cells.push(self.parse_cell(&tag)?),
                _ => self.skip(&tag)?,
            }
        }

        self.finish()?;
        Ok(cells)
    }

    // root 뒤에는 아무 요소도 없어야 함
    fn finish(&mut self) -> eyre::Result<()> {
        match self.events.next() {
            Some(XmlEvent::Start(tag)) => bail!("unexpected <{}> after </cells>", tag.name),
            Some(XmlEvent::End(name)) => bail!("unexpected </{name}> after </cells>"),
            None => Ok(()),
        }
    }

    // 부모 태그가 닫히면 None
    fn next_child(&mut self, parent: &str) -> eyre::Result<Option<XmlTag>> {
        match self.events.next() {
            Some(XmlEvent::Start(tag)) => Ok(Some(tag)),
            Some(XmlEvent::End(name)) if name == parent => Ok(None),
            Some(XmlEvent::End(name)) => bail!("unexpected </{name}> inside <{parent}>"),
            None => bail!("unexpected end of document inside <{parent}>"),
        }
    }

    fn skip(&mut self, tag: &XmlTag) -> eyre::Result<()> {
        if tag.empty {
            return Ok(());
        }

        while let Some(child) = self.next_child(&tag.name)? {
            self.skip(&child)?;
        }

        Ok(())
    }

    fn parse_cell(&mut self, tag: &XmlTag) -> eyre::Result<CellLayout> {
        let name = tag.attribute("name")?.to_owned();
        let size = (
            tag.number("xSize")?,
            tag.number("ySize")?,
            tag.number("zSize")?,
        );

        let mut variants = Vec::new();
        if !tag.empty {
            while let Some(child) = self.next_child("cell")? {
                match &child.name[..] {
                    "variant" => variants.push(
                        self.parse_variant(&child)
                            .wrap_err_with(|| format!("in cell {name}"))?,
                    ),
                    _ => self.skip(&child)?,
                }
            }
        }

        Ok(CellLayout {
            name,
            size,
            variants,
        })
    }

    fn parse_variant(&mut self, tag: &XmlTag) -> eyre::Result<VariantLayout> {
        let mut variant = VariantLayout {
            name: tag.attribute("name")?.to_owned(),
            ..Default::default()
        };

        if tag.empty {
            return Ok(variant);
        }

        while let Some(child) = self.next_child("variant")? {
            let result = match &child.name[..] {
                "ports" => self.parse_ports(&child, &mut variant.ports),
                "blocks" => self.parse_blocks(&child, &mut variant.blocks),
                _ => self.skip(&child),
            };
            result.wrap_err_with(|| format!("in variant {}", variant.name))?;
        }

        Ok(variant)
    }

    fn parse_ports(&mut self, tag: &XmlTag, ports: &mut Vec<PortPlacement>) -> eyre::Result<()> {
        if tag.empty {
            return Ok(());
        }

        while let Some(child) = self.next_child("ports")? {
            if child.name == "port" {
                ports.push(PortPlacement {
                    name: child.attribute("name")?.to_owned(),
                    position: child.position()?,
                });
            }
            self.skip(&child)?;
        }

        Ok(())
    }

    fn parse_blocks(&mut self, tag: &XmlTag, blocks: &mut Vec<BlockPlacement>) -> eyre::Result<()> {
        if tag.empty {
            return Ok(());
        }

        while let Some(child) = self.next_child("blocks")? {
            if child.name == "block" {
                blocks.push(BlockPlacement {
                    block_type: child.attribute("type")?.to_owned(),
                    rotation: child.number("rotation")?,
                    position: child.position()?,
                });
            }
            self.skip(&child)?;
        }

        Ok(())
    }
}

pub fn parse_layouts(text: &str) -> eyre::Result<Vec<CellLayout>> {
    LayoutReader::new(text)?.read()
}

pub fn read_layouts(path: &Path) -> eyre::Result<Vec<CellLayout>> {
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("cannot read variant file {}", path.display()))?;
    parse_layouts(&text).wrap_err_with(|| format!("invalid variant file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use itertools::Itertools;

    use crate::cell::direction::RotationTable;
    use crate::layout::xml::ToXml;
    use crate::layout::{find_cell, LayoutBuilder};
    use crate::registry::CellRegistry;

    use super::*;

    #[test]
    fn unittest_read_generated_document() -> eyre::Result<()> {
        let table = RotationTable::new();
        let registry = CellRegistry::build(&table);
        let layouts = LayoutBuilder::new(&table).build(&registry)?;

        let parsed = parse_layouts(&layouts.to_xml())?;
        assert_eq!(parsed, layouts);

        Ok(())
    }

    #[test]
    fn unittest_round_trip_ports() -> eyre::Result<()> {
        let table = RotationTable::new();
        let registry = CellRegistry::build(&table);
        let parsed = parse_layouts(&LayoutBuilder::new(&table).build(&registry)?.to_xml())?;

        for cell in registry.iter() {
            let offset = cell.kind.footprint().offset;
            let layout = find_cell(&parsed, cell.name()).unwrap();
            assert_eq!(layout.variants.len(), cell.variants.len());

            for (variant, placed) in cell.variants.iter().zip(&layout.variants) {
                let expected = variant
                    .ports
                    .iter()
                    .map(|port| (port.name.clone(), port.direction.x(), port.direction.z()))
                    .collect::<BTreeSet<_>>();
                let recovered = placed
                    .ports
                    .iter()
                    .map(|port| {
                        let Position(x, y, z) = port.position;
                        assert_eq!(y, 1);
                        (port.name.clone(), x - offset, z - offset)
                    })
                    .collect::<BTreeSet<_>>();

                assert_eq!(recovered, expected);
            }
        }

        Ok(())
    }

    #[test]
    fn unittest_lookup_helpers() -> eyre::Result<()> {
        let text = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- hand written -->
<cells>
    <cell name="NOT" xSize="3" ySize="2" zSize="3">
        <variant name="NOT$001">
            <ports>
                <port name="A" x="2" y="1" z="1"/>
                <port name="Y" x="1" y="1" z="2"/>
            </ports>
            <blocks>
                <block type="$not" rotation="0" x="1" y="1" z="1"/>
            </blocks>
        </variant>
        <variant name="NOT$002"/>
    </cell>
</cells>
"#;
        let cells = parse_layouts(text)?;
        let cell = find_cell(&cells, "NOT").unwrap();

        assert_eq!(cell.size, (3, 2, 3));
        assert_eq!(
            cell.variants.iter().map(|v| v.name.as_str()).collect_vec(),
            vec!["NOT$001", "NOT$002"]
        );

        let variant = cell.variant("NOT$001").unwrap();
        assert_eq!(variant.port_position("Y"), Some(Position(1, 1, 2)));
        assert_eq!(variant.port_position("B"), None);
        assert_eq!(variant.blocks[0].block_type, "$not");
        assert!(cell.variant("NOT$002").unwrap().ports.is_empty());
        assert!(cell.variant("NOT$003").is_none());

        Ok(())
    }

    #[test]
    fn unittest_reject_malformed_documents() {
        // missing cell dimension
        assert!(parse_layouts(r#"<cells><cell name="PAD" xSize="1" ySize="2"></cell></cells>"#)
            .is_err());

        // non numeric coordinate
        assert!(parse_layouts(
            r#"<cells><cell name="PAD" xSize="1" ySize="2" zSize="1">
                <variant name="PAD$001"><ports><port name="X" x="a" y="1" z="0"/></ports></variant>
            </cell></cells>"#
        )
        .is_err());

        // empty port name
        assert!(parse_layouts(
            r#"<cells><cell name="PAD" xSize="1" ySize="2" zSize="1">
                <variant name="PAD$001"><ports><port name="" x="0" y="1" z="0"/></ports></variant>
            </cell></cells>"#
        )
        .is_err());

        // unbalanced
        assert!(parse_layouts(r#"<cells><cell name="PAD" xSize="1" ySize="2" zSize="1">"#).is_err());
        assert!(parse_layouts(r#"<cells></cell></cells>"#).is_err());

        // content after the root
        assert!(parse_layouts("<cells></cells></bogus>").is_err());
        assert!(parse_layouts("<cells/></cells>").is_err());
        assert!(parse_layouts(r#"<cells></cells><cell name="X" xSize="a"/>"#).is_err());
        assert!(parse_layouts("<cells></cells><cells></cells>").is_err());

        // stray text and missing root
        assert!(parse_layouts(r#"<cells>oops</cells>"#).is_err());
        assert!(parse_layouts("").is_err());
    }

    #[test]
    fn unittest_unknown_elements_are_skipped() -> eyre::Result<()> {
        let cells = parse_layouts(
            r#"<cells>
                <meta><author name="x"/></meta>
                <cell name="PAD" xSize="1" ySize="2" zSize="1">
                    <variant name="PAD$001">
                        <note/>
                        <ports><port name="X" x="0" y="1" z="0"/></ports>
                    </variant>
                </cell>
            </cells>"#,
        )?;

        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].variants[0].port_position("X"), Some(Position(0, 1, 0)));

        Ok(())
    }

    #[test]
    fn unittest_empty_root() -> eyre::Result<()> {
        assert!(parse_layouts("<cells/>")?.is_empty());
        assert!(parse_layouts("<cells>\n</cells>\n<!-- end -->\n")?.is_empty());
        Ok(())
    }

    #[test]
    fn unittest_single_quoted_attributes() -> eyre::Result<()> {
        let cells = parse_layouts(
            r#"<cells>
                <cell name='PAD' xSize='1' ySize="2" zSize='1'>
                    <variant name='PAD$001'>
                        <ports><port name='X' x='0' y='1' z='0'/></ports>
                        <blocks><block type='$stone' rotation='0' x='0' y='0' z='0'/></blocks>
                    </variant>
                </cell>
            </cells>"#,
        )?;

        assert_eq!(cells[0].name, "PAD");
        assert_eq!(cells[0].size, (1, 2, 1));
        assert_eq!(cells[0].variants[0].port_position("X"), Some(Position(0, 1, 0)));
        assert_eq!(cells[0].variants[0].blocks[0].block_type, "$stone");

        Ok(())
    }
}
