//! History → SVG chart rendering.
//!
//! Pure functions over the `History` a `fit` run returned: no figure state,
//! no side channels.  Each function emits a standalone SVG document with the
//! training series as a solid line and the validation series (when the
//! History has one) dashed.

use crate::driver::History;

const WIDTH: f64 = 760.0;
const HEIGHT: f64 = 220.0;
const PAD_L: f64 = 60.0;
const PAD_R: f64 = 16.0;
const PAD_T: f64 = 16.0;
const PAD_B: f64 = 30.0;

const GREY_GRID: &str = "#f0f2f5";
const GREY_TEXT: &str = "#999";
const DARK_TEXT: &str = "#333";
const TRAIN_COLOR: &str = "#dc2626";
const VAL_COLOR: &str = "#1e40af";

struct Series<'a> {
    label: &'a str,
    points: Vec<f64>,
    color: &'a str,
    dashed: bool,
}

/// Loss curves (train solid red, validation dashed blue) over the epochs of
/// a recorded History.
pub fn loss_curve_svg(history: &History) -> String {
    let train: Vec<f64> = history.epochs.iter().map(|r| r.train_loss).collect();
    let val: Vec<f64> = history.epochs.iter().filter_map(|r| r.val_loss).collect();
    render(series_pair("train loss", train, "val loss", val))
}

/// Accuracy (classification) or R² (regression) curves over the epochs of a
/// recorded History.
pub fn metric_curve_svg(history: &History) -> String {
    let train: Vec<f64> = history.epochs.iter().map(|r| r.train_metric).collect();
    let val: Vec<f64> = history.epochs.iter().filter_map(|r| r.val_metric).collect();
    render(series_pair("train metric", train, "val metric", val))
}

fn series_pair<'a>(
    train_label: &'a str,
    train: Vec<f64>,
    val_label: &'a str,
    val: Vec<f64>,
) -> Vec<Series<'a>> {
    let n = train.len();
    let mut series = vec![Series {
        label: train_label,
        points: train,
        color: TRAIN_COLOR,
        dashed: false,
    }];
    // A validation series only renders when every epoch recorded one.
    if val.len() == n && n > 0 {
        series.push(Series {
            label: val_label,
            points: val,
            color: VAL_COLOR,
            dashed: true,
        });
    }
    series
}

fn render(series: Vec<Series<'_>>) -> String {
    let n = series.first().map(|s| s.points.len()).unwrap_or(0);
    if n < 2 {
        return format!(
            "<svg width=\"{w}\" height=\"{h}\" xmlns=\"http://www.w3.org/2000/svg\">\n\
             <text x=\"{x:.1}\" y=\"{y:.1}\" text-anchor=\"middle\" fill=\"{grey}\" font-size=\"12\">\
             not enough epochs to draw a curve</text>\n\
             </svg>",
            w = WIDTH,
            h = HEIGHT,
            x = WIDTH / 2.0,
            y = HEIGHT / 2.0,
            grey = GREY_TEXT,
        );
    }

    let all_vals: Vec<f64> = series.iter().flat_map(|s| s.points.iter().cloned()).collect();
    // Loss curves sit on a zero baseline; metric curves (R²) may dip below it.
    let min_y = all_vals.iter().cloned().fold(0.0f64, f64::min);
    let max_y = all_vals.iter().cloned().fold(0.0f64, f64::max) * 1.05;

    let px = |i: usize, v: f64| -> (f64, f64) {
        let x = PAD_L + (i as f64 / (n - 1) as f64) * (WIDTH - PAD_L - PAD_R);
        let y = PAD_T + (max_y - v) / (max_y - min_y + 1e-12) * (HEIGHT - PAD_T - PAD_B);
        (x, y)
    };

    // Y axis labels and gridlines.
    let y_labels: String = (0..=4).map(|g| {
        let frac = g as f64 / 4.0;
        let val = min_y + (max_y - min_y) * frac;
        let y = PAD_T + (1.0 - frac) * (HEIGHT - PAD_T - PAD_B);
        let w_r = WIDTH - PAD_R;
        format!(
            "<text x=\"{}\" y=\"{:.1}\" text-anchor=\"end\" fill=\"{}\" font-size=\"10\">{:.3}</text>\n\
             <line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"1\"/>",
            PAD_L - 4.0, y + 4.0, GREY_TEXT, val,
            PAD_L, y, w_r, y, GREY_GRID
        )
    }).collect::<Vec<_>>().join("\n");

    // X axis labels: first, middle, last epoch (1-based).
    let x_labels: String = [0, n / 2, n - 1].iter().map(|&i| {
        let (x, _) = px(i, 0.0);
        format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"{}\" font-size=\"10\">{}</text>",
            x, HEIGHT - 4.0, GREY_TEXT, i + 1
        )
    }).collect::<Vec<_>>().join("\n");

    // Polylines.
    let paths: String = series.iter().map(|s| {
        let path: String = s.points.iter().enumerate().map(|(i, &v)| {
            let (x, y) = px(i, v);
            if i == 0 { format!("M{:.1},{:.1}", x, y) } else { format!(" L{:.1},{:.1}", x, y) }
        }).collect();
        let dash = if s.dashed { " stroke-dasharray=\"5,4\"" } else { "" };
        let width = if s.dashed { 1.5 } else { 2.0 };
        format!(
            "<path d=\"{}\" stroke=\"{}\" stroke-width=\"{}\" fill=\"none\"{}/>",
            path, s.color, width, dash
        )
    }).collect::<Vec<_>>().join("\n");

    // Legend, one entry per series, left to right.
    let legend: String = series.iter().enumerate().map(|(i, s)| {
        let x0 = PAD_L + i as f64 * 120.0;
        let sample = if s.dashed {
            format!(
                "<line x1=\"{:.1}\" y1=\"9\" x2=\"{:.1}\" y2=\"9\" stroke=\"{}\" stroke-width=\"1.5\" stroke-dasharray=\"4,3\"/>",
                x0, x0 + 18.0, s.color
            )
        } else {
            format!(
                "<rect x=\"{:.1}\" y=\"4\" width=\"18\" height=\"4\" fill=\"{}\"/>",
                x0, s.color
            )
        };
        format!(
            "{}\n<text x=\"{:.1}\" y=\"13\" fill=\"{}\" font-size=\"10\">{}</text>",
            sample, x0 + 22.0, DARK_TEXT, s.label
        )
    }).collect::<Vec<_>>().join("\n");

    format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n\
         {}\n{}\n{}\n{}\n</svg>",
        WIDTH, HEIGHT, y_labels, x_labels, paths, legend
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::EpochRecord;

    fn history(records: Vec<(f64, Option<f64>)>) -> History {
        History {
            epochs: records.into_iter().enumerate().map(|(i, (loss, val))| EpochRecord {
                epoch: i + 1,
                train_loss: loss,
                val_loss: val,
                train_metric: 0.5,
                val_metric: val.map(|_| 0.5),
            }).collect(),
        }
    }

    #[test]
    fn short_history_renders_placeholder() {
        let svg = loss_curve_svg(&history(vec![(1.0, None)]));
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("not enough epochs"));
    }

    #[test]
    fn train_only_history_has_one_path() {
        let svg = loss_curve_svg(&history(vec![(1.0, None), (0.5, None), (0.25, None)]));
        assert_eq!(svg.matches("<path").count(), 1);
        assert!(svg.contains("train loss"));
        assert!(!svg.contains("val loss"));
    }

    #[test]
    fn validation_series_is_dashed() {
        let svg = loss_curve_svg(&history(vec![(1.0, Some(1.2)), (0.5, Some(0.7))]));
        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains("stroke-dasharray"));
        assert!(svg.contains("val loss"));
    }

    #[test]
    fn metric_curve_uses_metric_labels() {
        let svg = metric_curve_svg(&history(vec![(1.0, None), (0.5, None)]));
        assert!(svg.contains("train metric"));
    }
}
