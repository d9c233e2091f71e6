//! Read models for the legend, the hover popup and the detail panel, plus
//! plain-text rendering of the two result tables.
//!
//! Nothing here computes new state; it only arranges what the selection,
//! the sorter and the interaction machine already hold.

use crate::color::GRADIENT_COLORS;
use crate::config::Registry;
use crate::error::MapResult;
use crate::interaction::HoverInfo;
use crate::models::{CandidateFilter, District, Election, LngLat};
use crate::results::{CandidateResult, sort_results, top_results, total_votes};
use crate::scale::{DEFAULT_MAX_PERCENT, thresholds};
use crate::selection::SelectionState;
use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Rows shown in the hover popup.
pub const POPUP_ROWS: usize = 3;

pub const LEGEND_TITLE: &str = "Wynik";
pub const DETAIL_PROMPT: &str =
    "Kliknij na mapie żeby zobaczyć szczegółowe wyniki w wybranej Okręgowej Komisji Wyborczej.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendRow {
    pub candidate: String,
    pub label: String,
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendModel {
    pub title: String,
    pub rows: Vec<LegendRow>,
    /// Threshold labels between swatches; the last one carries `%`.
    pub ticks: Vec<String>,
}

/// Legend for the current selection: every winner, or just the chosen candidate.
/// Swatches missing from a candidate gradient are taken from the tie gradient.
pub fn legend_model(registry: &Registry, selection: &SelectionState) -> MapResult<LegendModel> {
    let election = registry.election(&selection.election)?;
    let (ids, max): (Vec<&str>, f64) = match &selection.candidate {
        CandidateFilter::All => (
            election.winners.iter().map(String::as_str).collect(),
            DEFAULT_MAX_PERCENT,
        ),
        CandidateFilter::Candidate(id) => (
            vec![id.as_str()],
            registry
                .candidate(id)
                .and_then(|c| c.max_gradient)
                .unwrap_or(DEFAULT_MAX_PERCENT),
        ),
    };

    let tie = registry.tie_gradient();
    let rows = ids
        .into_iter()
        .map(|id| {
            let candidate = registry.candidate(id);
            let gradient = candidate.and_then(|c| c.gradient.as_deref()).unwrap_or(&[]);
            let colors = (0..GRADIENT_COLORS)
                .map(|i| gradient.get(i).or(tie.get(i)).cloned().unwrap_or_default())
                .collect();
            LegendRow {
                candidate: id.to_string(),
                label: candidate.map(|c| c.last_name().to_string()).unwrap_or_else(|| id.to_string()),
                colors,
            }
        })
        .collect();

    let mut ticks: Vec<String> = thresholds(GRADIENT_COLORS, max).into_iter().map(fmt_number).collect();
    if let Some(last) = ticks.last_mut() {
        last.push('%');
    }
    Ok(LegendModel {
        title: LEGEND_TITLE.to_string(),
        rows,
        ticks,
    })
}

/// Compact popup shown while hovering a district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupModel {
    pub gmina: Option<String>,
    pub number: Option<u32>,
    pub position: LngLat,
    pub results: Vec<CandidateResult>,
}

pub fn popup_model(election: &Election, hover: &HoverInfo) -> PopupModel {
    let sorted = sort_results(&hover.district, election);
    PopupModel {
        gmina: hover.district.gmina(),
        number: hover.district.number(),
        position: hover.position,
        results: top_results(&sorted, POPUP_ROWS).to_vec(),
    }
}

/// Full results of the clicked district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailModel {
    pub number: Option<u32>,
    pub gmina: Option<String>,
    pub turnout: Option<f64>,
    pub results: Vec<CandidateResult>,
    pub total_votes: u64,
}

pub fn detail_model(election: &Election, district: &District) -> DetailModel {
    let results = sort_results(district, election);
    DetailModel {
        number: district.number(),
        gmina: district.gmina(),
        turnout: district.turnout(),
        total_votes: total_votes(&results),
        results,
    }
}

/// Map a locale tag to a `num_format::Locale`. Defaults to Polish.
pub fn map_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().as_str() {
        "en" | "en_us" | "us" => &Locale::en,
        "de" | "de_de" => &Locale::de,
        _ => &Locale::pl,
    }
}

/// Up to two decimals, trailing zeros trimmed.
pub fn fmt_number(x: f64) -> String {
    let s = format!("{:.2}", x);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn fmt_votes(v: Option<u64>, locale: &Locale) -> String {
    v.map(|n| n.to_formatted_string(locale)).unwrap_or_else(|| "-".into())
}

fn fmt_percent(p: Option<f64>) -> String {
    p.map(|x| format!("{}%", fmt_number(x))).unwrap_or_else(|| "-".into())
}

fn name_of<'a>(registry: &'a Registry, id: &'a str) -> &'a str {
    registry.candidate(id).map(|c| c.name.as_str()).unwrap_or(id)
}

fn pad_right(s: &str, width: usize) -> String {
    let n = s.chars().count();
    format!("{s}{}", " ".repeat(width.saturating_sub(n)))
}

fn pad_left(s: &str, width: usize) -> String {
    let n = s.chars().count();
    format!("{}{s}", " ".repeat(width.saturating_sub(n)))
}

/// Three-column table: candidate, votes, percent; optional total footer.
fn render_table(out: &mut String, registry: &Registry, results: &[CandidateResult], total: Option<u64>, locale: &Locale) {
    let rows: Vec<(String, String, String)> = results
        .iter()
        .map(|r| {
            (
                name_of(registry, &r.candidate).to_string(),
                fmt_votes(r.votes, locale),
                fmt_percent(r.percentage),
            )
        })
        .collect();
    let footer = total.map(|t| ("Łącznie głosów".to_string(), t.to_formatted_string(locale)));

    let w0 = rows
        .iter()
        .map(|r| r.0.chars().count())
        .chain(footer.iter().map(|f| f.0.chars().count()))
        .chain(std::iter::once("Kandydat".len()))
        .max()
        .unwrap_or(0);
    let w1 = rows
        .iter()
        .map(|r| r.1.chars().count())
        .chain(footer.iter().map(|f| f.1.chars().count()))
        .chain(std::iter::once("Głosy".chars().count()))
        .max()
        .unwrap_or(0);
    let w2 = rows
        .iter()
        .map(|r| r.2.chars().count())
        .chain(std::iter::once("Proc.".len()))
        .max()
        .unwrap_or(0);

    let _ = writeln!(
        out,
        "{}  {}  {}",
        pad_right("Kandydat", w0),
        pad_left("Głosy", w1),
        pad_left("Proc.", w2)
    );
    for (name, votes, pct) in &rows {
        let _ = writeln!(out, "{}  {}  {}", pad_right(name, w0), pad_left(votes, w1), pad_left(pct, w2));
    }
    if let Some((label, sum)) = footer {
        let _ = writeln!(out, "{}  {}", pad_right(&label, w0), pad_left(&sum, w1));
    }
}

/// Popup as text: "<gmina> OKW <number>" followed by the top rows.
pub fn render_popup_text(popup: &PopupModel, registry: &Registry, locale: &Locale) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} OKW {}",
        popup.gmina.as_deref().unwrap_or("-"),
        popup.number.map(|n| n.to_string()).unwrap_or_else(|| "-".into())
    );
    render_table(&mut out, registry, &popup.results, None, locale);
    out
}

/// Detail panel as text, or the click prompt when nothing is selected.
pub fn render_detail_text(detail: Option<&DetailModel>, registry: &Registry, locale: &Locale) -> String {
    let Some(d) = detail else {
        return format!("{DETAIL_PROMPT}\n");
    };
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Okręgowa Komisja Wyborcza {}",
        d.number.map(|n| n.to_string()).unwrap_or_else(|| "-".into())
    );
    let _ = writeln!(out, "{}", d.gmina.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Frekwencja {}", fmt_percent(d.turnout));
    render_table(&mut out, registry, &d.results, Some(d.total_votes), locale);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_drop_trailing_zeros() {
        assert_eq!(fmt_number(20.0), "20");
        assert_eq!(fmt_number(7.5), "7.5");
        assert_eq!(fmt_number(12.346), "12.35");
    }

    #[test]
    fn english_locale_groups_thousands() {
        assert_eq!(fmt_votes(Some(12345), map_locale("en")), "12,345");
        assert_eq!(fmt_votes(None, map_locale("en")), "-");
    }
}
