//! Info command implementation.
//!
//! Prints the name, area and bounding box of every region in the given files.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::error::{RegionError, Result};
use crate::output::{display_path, Printer};
use crate::types::{BoundingBox, MetaValue, PixelRegion};

/// Print area and bounding box of each region
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Region files to describe
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct RegionInfo {
    file: String,
    index: usize,
    shape: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    /// None for compounds, whose area is not computed analytically.
    area: Option<f64>,
    bbox: BoundingBox,
}

impl RegionInfo {
    fn new(file: String, index: usize, region: &PixelRegion) -> Self {
        Self {
            file,
            index: index + 1,
            shape: region.name(),
            label: region
                .meta
                .get("label")
                .and_then(MetaValue::as_str)
                .map(str::to_string),
            area: region.area().ok(),
            bbox: region.bounding_box(),
        }
    }
}

pub fn run(args: InfoArgs, printer: &Printer) -> Result<()> {
    let infos: Vec<RegionInfo> = super::load_all(&args.files)?
        .into_iter()
        .flat_map(|(file, regions)| {
            let file = display_path(&file);
            regions
                .iter()
                .enumerate()
                .map(|(index, region)| RegionInfo::new(file.clone(), index, region))
                .collect::<Vec<_>>()
        })
        .collect();

    if args.json {
        let json = serde_json::to_string_pretty(&infos).map_err(|e| RegionError::Parse {
            message: format!("Failed to serialize region info: {}", e),
            help: None,
        })?;
        println!("{json}");
        return Ok(());
    }

    for info in &infos {
        let area = info
            .area
            .map(|a| format!("{a:.3}"))
            .unwrap_or_else(|| "-".to_string());
        let label = info
            .label
            .as_deref()
            .map(|l| format!(" '{l}'"))
            .unwrap_or_default();
        println!(
            "{}:{} {}{} area={} bbox={}",
            info.file,
            info.index,
            printer.cyan(info.shape),
            label,
            area,
            printer.dim(&info.bbox.to_string())
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_region_file;

    #[test]
    fn test_info_json_shape() {
        let regions = parse_region_file(
            "- shape: circle\n  params: [2, 2, 1]\n  meta: { label: a }\n- shape: compound\n  op: or\n  operands:\n    - { shape: point, params: [0, 0] }\n    - { shape: circle, params: [0, 0, 1] }\n",
        )
        .unwrap();

        let circle = RegionInfo::new("f.yaml".to_string(), 0, &regions[0]);
        let value = serde_json::to_value(&circle).unwrap();
        assert_eq!(value["index"], 1);
        assert_eq!(value["label"], "a");
        assert_eq!(value["bbox"]["ixmin"], 1);

        let compound = RegionInfo::new("f.yaml".to_string(), 1, &regions[1]);
        assert!(compound.area.is_none());
        assert!(serde_json::to_value(&compound).unwrap().get("label").is_none());
    }
}
