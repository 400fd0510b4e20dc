use crate::report::ReportError;
use plotters::prelude::*;
use std::path::Path;

const CAPTION_FONT: (&str, u32) = ("sans-serif", 24);
const LABEL_FONT: (&str, u32) = ("sans-serif", 14);

fn chart_err<E: std::fmt::Display>(e: E) -> ReportError {
    ReportError::Chart(e.to_string())
}

fn value_label(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}

/// Vertical bar chart. Bars with `None` get an axis label but no bar, so a
/// bucket nobody posted in stays visibly empty instead of reading as zero.
pub fn render_bar(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    bars: &[(String, Option<f64>)],
) -> Result<(), ReportError> {
    let root = BitMapBackend::new(path, (800, 500)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let max = bars
        .iter()
        .filter_map(|(_, v)| *v)
        .fold(0.0f64, f64::max);
    let y_top = if max > 0.0 { max * 1.15 } else { 1.0 };

    let mut chart = ChartBuilder::on(&root)
        .caption(title, CAPTION_FONT)
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(56)
        .build_cartesian_2d((0u32..bars.len() as u32).into_segmented(), 0f64..y_top)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len())
        .x_label_formatter(&|seg| match seg {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => bars
                .get(*i as usize)
                .map(|(label, _)| label.clone())
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        })
        .x_desc(x_desc)
        .y_desc(y_desc)
        .axis_desc_style(LABEL_FONT)
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(BLUE.mix(0.6).filled())
                .margin(12)
                .data(
                    bars.iter()
                        .enumerate()
                        .filter_map(|(i, (_, v))| v.map(|v| (i as u32, v))),
                ),
        )
        .map_err(chart_err)?;

    chart
        .draw_series(bars.iter().enumerate().filter_map(|(i, (_, v))| {
            v.map(|v| {
                Text::new(
                    value_label(v),
                    (SegmentValue::CenterOf(i as u32), v + y_top * 0.02),
                    LABEL_FONT,
                )
            })
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}

/// Heatmap of a rows × cols table. Absent cells are painted neutral gray
/// and carry no number.
pub fn render_heatmap(
    path: &Path,
    title: &str,
    rows: &[String],
    cols: &[String],
    cells: &[Vec<Option<f64>>],
) -> Result<(), ReportError> {
    let nrows = rows.len();
    let ncols = cols.len();

    let root = BitMapBackend::new(path, (900, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let present: Vec<f64> = cells.iter().flatten().filter_map(|v| *v).collect();
    let min = present.iter().copied().fold(f64::INFINITY, f64::min);
    let max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, CAPTION_FONT)
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(120)
        .build_cartesian_2d(0f64..ncols as f64, 0f64..nrows as f64)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(ncols)
        .y_labels(nrows)
        .x_label_formatter(&|x| {
            cols.get(x.floor() as usize).cloned().unwrap_or_default()
        })
        .y_label_formatter(&|y| {
            let idx = y.floor() as usize;
            if idx < nrows {
                // Row 0 renders at the top of the grid.
                rows[nrows - 1 - idx].clone()
            } else {
                String::new()
            }
        })
        .draw()
        .map_err(chart_err)?;

    let mut tiles = Vec::new();
    let mut labels = Vec::new();
    for (r, row) in cells.iter().enumerate() {
        let y0 = (nrows - 1 - r) as f64;
        for (c, cell) in row.iter().enumerate() {
            let x0 = c as f64;
            let color = match cell {
                Some(v) => scale_color(*v, min, max),
                None => RGBColor(238, 238, 238),
            };
            tiles.push(Rectangle::new(
                [(x0, y0), (x0 + 1.0, y0 + 1.0)],
                color.filled(),
            ));
            tiles.push(Rectangle::new(
                [(x0, y0), (x0 + 1.0, y0 + 1.0)],
                BLACK.mix(0.25),
            ));
            if let Some(v) = cell {
                labels.push(Text::new(
                    format!("{v:.1}"),
                    (x0 + 0.38, y0 + 0.45),
                    LABEL_FONT,
                ));
            }
        }
    }
    chart.draw_series(tiles).map_err(chart_err)?;
    chart.draw_series(labels).map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}

/// Pale-yellow to deep-blue ramp over the observed value range.
fn scale_color(v: f64, min: f64, max: f64) -> RGBColor {
    let t = if max > min { (v - min) / (max - min) } else { 0.5 };
    let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    RGBColor(lerp(255.0, 34.0), lerp(255.0, 94.0), lerp(217.0, 168.0))
}
