//! Stepped fill-color expressions for percentage fields.

use crate::color::NEUTRAL_GRAY;
use serde_json::{Value, json};

/// Default saturation point of a percentage scale.
pub const DEFAULT_MAX_PERCENT: f64 = 100.0;

/// Class breaks for an `n`-color scale saturating at `max`: `i * max / n` for `i` in `1..n`.
pub fn thresholds(n: usize, max: f64) -> Vec<f64> {
    (1..n).map(|i| i as f64 * max / n as f64).collect()
}

/// Build a `step` expression coloring `key` with `gradient`.
///
/// `gradient[i - 1]` applies below the `i`-th threshold and the last color above
/// the final one. Without a gradient the fill is flat [`NEUTRAL_GRAY`].
///
/// ```
/// use obwody_rs::scale::generate_fill_colors;
/// use serde_json::json;
///
/// let g: Vec<String> = ["#a", "#b", "#c", "#d", "#e"].iter().map(|s| s.to_string()).collect();
/// let expr = generate_fill_colors("mentzen_proc", Some(g.as_slice()), Some(20.0));
/// assert_eq!(
///     expr,
///     json!(["step", ["get", "mentzen_proc"], "#a", 4.0, "#b", 8.0, "#c", 12.0, "#d", 16.0, "#e"])
/// );
/// ```
pub fn generate_fill_colors(key: &str, gradient: Option<&[String]>, max: Option<f64>) -> Value {
    let gradient = match gradient {
        Some(g) if !g.is_empty() => g,
        _ => return json!(NEUTRAL_GRAY),
    };
    if gradient.len() == 1 {
        return json!(gradient[0]);
    }

    let max = max.unwrap_or(DEFAULT_MAX_PERCENT);
    let mut expr = vec![json!("step"), json!(["get", key])];
    for (color, threshold) in gradient.iter().zip(thresholds(gradient.len(), max)) {
        expr.push(json!(color));
        expr.push(json!(threshold));
    }
    expr.push(json!(gradient[gradient.len() - 1]));
    Value::Array(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five() -> Vec<String> {
        ["#1", "#2", "#3", "#4", "#5"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_max_breaks_at_fifths() {
        assert_eq!(thresholds(5, 100.0), vec![20.0, 40.0, 60.0, 80.0]);
        let g = five();
        let expr = generate_fill_colors("x_proc", Some(g.as_slice()), None);
        assert_eq!(
            expr,
            json!(["step", ["get", "x_proc"], "#1", 20.0, "#2", 40.0, "#3", 60.0, "#4", 80.0, "#5"])
        );
    }

    #[test]
    fn missing_or_empty_gradient_is_flat_gray() {
        assert_eq!(generate_fill_colors("x_proc", None, None), json!("#616161"));
        assert_eq!(generate_fill_colors("x_proc", Some(&[][..]), None), json!("#616161"));
    }

    #[test]
    fn single_color_is_flat() {
        let g = vec!["#123456".to_string()];
        assert_eq!(generate_fill_colors("x_proc", Some(g.as_slice()), None), json!("#123456"));
    }
}
