use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use eyre::WrapErr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumString};

use crate::cell::direction::RotationTable;
use crate::cell::CellKind;
use crate::layout::reader::read_layouts;
use crate::layout::verify::verify_layouts;
use crate::layout::xml::ToXml;
use crate::layout::{CellLayout, LayoutBuilder};
use crate::registry::CellRegistry;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    #[default]
    Xml,
    Json,
}

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub output: PathBuf,
    // 비어 있으면 전부
    pub kinds: Vec<CellKind>,
    pub format: OutputFormat,
    pub verify: bool,
}

impl GenerateOptions {
    pub fn new(output: PathBuf) -> Self {
        Self {
            output,
            kinds: Vec::new(),
            format: OutputFormat::default(),
            verify: false,
        }
    }

    fn kinds(&self) -> Vec<CellKind> {
        if self.kinds.is_empty() {
            CellKind::iter().collect()
        } else {
            self.kinds.clone()
        }
    }
}

pub fn render(layouts: &[CellLayout], format: OutputFormat) -> eyre::Result<String> {
    match format {
        OutputFormat::Xml => Ok(layouts.to_xml()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(layouts)? + "\n"),
    }
}

pub fn load(path: &Path, format: OutputFormat) -> eyre::Result<Vec<CellLayout>> {
    match format {
        OutputFormat::Xml => read_layouts(path),
        OutputFormat::Json => {
            let text = fs::read_to_string(path)
                .wrap_err_with(|| format!("cannot read variant file {}", path.display()))?;
            serde_json::from_str(&text)
                .wrap_err_with(|| format!("invalid variant file {}", path.display()))
        }
    }
}

fn write_document(path: &Path, document: &str) -> eyre::Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("cannot create output file {}", path.display()))?;

    let mut writer = BufWriter::new(file);
    writer
        .write_all(document.as_bytes())
        .and_then(|_| writer.flush())
        .wrap_err_with(|| format!("cannot write output file {}", path.display()))
}

/// Generates every requested cell kind and writes the variant document to
/// `options.output`.
pub fn generate(options: &GenerateOptions) -> eyre::Result<()> {
    let table = RotationTable::new();

    let registry = CellRegistry::build_only(&table, &options.kinds());
    tracing::info!(
        "generated {} cells, {} variants",
        registry.len(),
        registry.variant_count()
    );

    let layouts = LayoutBuilder::new(&table).build(&registry)?;
    let document = render(&layouts, options.format)?;

    write_document(&options.output, &document)?;
    tracing::info!(
        "{} document written to {} ({} bytes)",
        options.format,
        options.output.display(),
        document.len()
    );

    if options.verify {
        let loaded = load(&options.output, options.format)?;
        verify_layouts(&registry, &loaded)?;
        tracing::info!("verified {}", options.output.display());
    }

    Ok(())
}
