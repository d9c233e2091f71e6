//! Legend card layout and drawing: one row of swatches per candidate, threshold
//! labels under the boundaries between swatches.

use anyhow::{Result, anyhow};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::color::Rgb8;
use crate::present::LegendModel;

// Layout constants (shared by the size estimator and the drawing code)
pub(crate) const PAD: i32 = 16;
pub(crate) const TITLE_PX: u32 = 16;
pub(crate) const LABEL_PX: u32 = 12;
pub(crate) const TICK_PX: u32 = 10;
pub(crate) const ROW_H: i32 = 24;
pub(crate) const ROW_GAP: i32 = 4;
pub(crate) const BOX_W: i32 = 20;
pub(crate) const BOX_H: i32 = 8;
pub(crate) const BOX_GAP: i32 = 1;
pub(crate) const LABEL_GAP: i32 = 8;
const MIN_LABEL_W: i32 = 80;
const MAX_LABEL_W: i32 = 160;

/// Heuristic: estimate pixel width of text (Plotters has no built-in text measuring).
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// Cut `text` to `max_px`, ending with an ellipsis when shortened.
pub fn truncate_to_width(text: &str, font_px: u32, max_px: u32) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let mut out: String = String::new();
    for ch in text.chars() {
        out.push(ch);
        if estimate_text_width_px(&format!("{out}…"), font_px) > max_px {
            out.pop();
            break;
        }
    }
    out.push('…');
    out
}

/// Width of the label column, clamped to a sensible range.
pub(crate) fn label_column_px(model: &LegendModel) -> i32 {
    let widest = model
        .rows
        .iter()
        .map(|r| estimate_text_width_px(&r.label, LABEL_PX) as i32)
        .max()
        .unwrap_or(0);
    widest.clamp(MIN_LABEL_W, MAX_LABEL_W)
}

/// Canvas size (w, h) needed to draw `model` without clipping.
pub fn estimate_legend_size_px(model: &LegendModel) -> (u32, u32) {
    let swatches = model.rows.iter().map(|r| r.colors.len()).max().unwrap_or(0) as i32;
    let w = PAD + label_column_px(model) + LABEL_GAP + swatches * (BOX_W + BOX_GAP) + PAD;
    let rows = model.rows.len() as i32;
    let h = PAD
        + TITLE_PX as i32
        + 8
        + rows * ROW_H
        + (rows - 1).max(0) * ROW_GAP
        + TICK_PX as i32
        + 6
        + PAD;
    (w.max(0) as u32, h.max(0) as u32)
}

fn swatch_color(hex: &str, opacity: f64) -> RGBAColor {
    // Unparseable swatches are drawn transparent rather than failing the legend.
    match Rgb8::parse_hex(hex) {
        Ok(c) => RGBColor(c.r, c.g, c.b).mix(opacity),
        Err(_) => RGBColor(255, 255, 255).mix(0.0),
    }
}

/// Draw the legend card into `area`.
pub fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    model: &LegendModel,
    opacity: f64,
) -> Result<()> {
    area.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let title_style: TextStyle = TextStyle::from((FontFamily::SansSerif, TITLE_PX))
        .pos(Pos::new(HPos::Left, VPos::Top))
        .color(&BLACK);
    let label_style: TextStyle = TextStyle::from((FontFamily::SansSerif, LABEL_PX))
        .pos(Pos::new(HPos::Left, VPos::Center))
        .color(&RGBColor(66, 66, 66));
    let tick_style: TextStyle = TextStyle::from((FontFamily::SansSerif, TICK_PX))
        .pos(Pos::new(HPos::Center, VPos::Top))
        .color(&RGBColor(66, 66, 66));

    area.draw(&Text::new(model.title.as_str(), (PAD, PAD), title_style))
        .map_err(|e| anyhow!("{:?}", e))?;

    let label_w = label_column_px(model);
    let swatch_x = PAD + label_w + LABEL_GAP;
    let mut y = PAD + TITLE_PX as i32 + 8;

    for row in &model.rows {
        let center_y = y + ROW_H / 2;
        let label = truncate_to_width(&row.label, LABEL_PX, label_w as u32);
        area.draw(&Text::new(label, (PAD, center_y), label_style.clone()))
            .map_err(|e| anyhow!("{:?}", e))?;

        for (i, hex) in row.colors.iter().enumerate() {
            let x0 = swatch_x + i as i32 * (BOX_W + BOX_GAP);
            area.draw(&Rectangle::new(
                [(x0, center_y - BOX_H / 2), (x0 + BOX_W, center_y + BOX_H / 2)],
                swatch_color(hex, opacity).filled(),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
        }
        y += ROW_H + ROW_GAP;
    }

    // Tick i sits under the boundary between swatch i and i + 1.
    let tick_y = y - ROW_GAP + 2;
    for (i, tick) in model.ticks.iter().enumerate() {
        let x = swatch_x + (i as i32 + 1) * (BOX_W + BOX_GAP) - BOX_GAP;
        area.draw(&Text::new(tick.as_str(), (x, tick_y), tick_style.clone()))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::present::LegendRow;

    #[test]
    fn truncation_adds_single_ellipsis() {
        let s = truncate_to_width("Trzaskowski-Kowalczyk", 12, 60);
        assert!(s.ends_with('…'));
        assert!(estimate_text_width_px(&s, 12) <= 60);
        assert_eq!(truncate_to_width("Braun", 12, 60), "Braun");
    }

    #[test]
    fn size_grows_with_rows() {
        let row = |id: &str| LegendRow {
            candidate: id.into(),
            label: id.into(),
            colors: vec!["#000000".into(); 5],
        };
        let one = LegendModel {
            title: "Wynik".into(),
            rows: vec![row("a")],
            ticks: vec!["20".into(), "40".into(), "60".into(), "80%".into()],
        };
        let mut three = one.clone();
        three.rows.extend([row("b"), row("c")]);
        let (w1, h1) = estimate_legend_size_px(&one);
        let (w3, h3) = estimate_legend_size_px(&three);
        assert_eq!(w1, w3);
        assert_eq!(h3 - h1, 2 * (ROW_H + ROW_GAP) as u32);
    }
}
