//! Legend rendering to **SVG**.
//!
//! - One row per candidate with its gradient swatches (map opacity applied)
//! - Threshold labels under the swatch boundaries, last one with `%`
//! - Canvas sized from the model so long names never clip

pub mod legend;

use crate::present::LegendModel;
use anyhow::{Result, anyhow};
use plotters::prelude::*;
use plotters_svg::SVGBackend;
use std::path::Path;

use legend::{draw_legend, estimate_legend_size_px};

/// Render the legend into an SVG string.
pub fn legend_svg_string(model: &LegendModel, opacity: f64) -> Result<String> {
    if model.rows.is_empty() {
        return Err(anyhow!("legend has no rows"));
    }
    let size = estimate_legend_size_px(model);
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, size).into_drawing_area();
        draw_legend(&root, model, opacity)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(buf)
}

/// Render the legend to an `.svg` file.
pub fn render_legend_svg<P: AsRef<Path>>(model: &LegendModel, out_path: P, opacity: f64) -> Result<()> {
    let out_path = out_path.as_ref();
    match out_path.extension().and_then(|s| s.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("svg") => {}
        _ => return Err(anyhow!("legend output must be an .svg file: {}", out_path.display())),
    }
    let svg = legend_svg_string(model, opacity)?;
    std::fs::write(out_path, svg)?;
    log::debug!("wrote legend to {}", out_path.display());
    Ok(())
}
