//! Chart model and renderers

use crate::errors::OutputError;
use loadspread_config::ReportFormat;
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};

const BAR_COLOR: RGBColor = RGBColor(66, 113, 196);
const LINE_COLOR: RGBColor = RGBColor(214, 69, 65);

/// Data series carried by a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "points", rename_all = "snake_case")]
pub enum ChartData {
    /// Label to count, drawn as bars in the given order
    Distribution(Vec<(String, u64)>),
    /// Server count to average load, drawn as a line
    LoadCurve(Vec<(u32, f64)>),
}

/// A titled chart ready for delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub data: ChartData,
}

impl Chart {
    /// Bar chart of requests handled per server
    pub fn distribution(title: impl Into<String>, bars: Vec<(String, u64)>) -> Self {
        Self {
            title: title.into(),
            x_desc: "Servers".to_string(),
            y_desc: "Number of Requests Handled".to_string(),
            data: ChartData::Distribution(bars),
        }
    }

    /// Line chart of average load against pool size
    pub fn load_curve(title: impl Into<String>, points: Vec<(u32, f64)>) -> Self {
        Self {
            title: title.into(),
            x_desc: "Number of Servers (N)".to_string(),
            y_desc: "Average Load per Server".to_string(),
            data: ChartData::LoadCurve(points),
        }
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ChartData::Distribution(bars) => bars.len(),
            ChartData::LoadCurve(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encode the chart in the requested artifact format
    pub fn encode(&self, format: ReportFormat, dimensions: (u32, u32)) -> Result<Vec<u8>, OutputError> {
        if self.is_empty() {
            return Err(OutputError::EmptyChart(self.title.clone()));
        }

        match format {
            ReportFormat::Svg => render_svg(self, dimensions).map(String::into_bytes),
            ReportFormat::Json => {
                serde_json::to_vec_pretty(self).map_err(|e| OutputError::Serialization {
                    format: "json".to_string(),
                    error: e.to_string(),
                })
            }
            #[cfg(feature = "csv")]
            ReportFormat::Csv => self.to_csv(),
            #[cfg(not(feature = "csv"))]
            ReportFormat::Csv => Err(OutputError::Serialization {
                format: "csv".to_string(),
                error: "CSV support not enabled".to_string(),
            }),
        }
    }

    #[cfg(feature = "csv")]
    fn to_csv(&self) -> Result<Vec<u8>, OutputError> {
        let csv_error = |e: csv::Error| OutputError::Serialization {
            format: "csv".to_string(),
            error: e.to_string(),
        };
        let mut wtr = csv::Writer::from_writer(Vec::new());

        match &self.data {
            ChartData::Distribution(bars) => {
                wtr.write_record(["server", "count"]).map_err(csv_error)?;
                for (label, count) in bars {
                    wtr.write_record([label.clone(), count.to_string()])
                        .map_err(csv_error)?;
                }
            }
            ChartData::LoadCurve(points) => {
                wtr.write_record(["servers", "average_load"]).map_err(csv_error)?;
                for (servers, load) in points {
                    wtr.write_record([servers.to_string(), format!("{:.3}", load)])
                        .map_err(csv_error)?;
                }
            }
        }

        wtr.into_inner().map_err(|e| OutputError::Serialization {
            format: "csv".to_string(),
            error: e.to_string(),
        })
    }
}

fn render_error<E>(error: DrawingAreaErrorKind<E>) -> OutputError
where
    E: std::error::Error + Send + Sync,
{
    OutputError::Render(error.to_string())
}

/// Render a chart as an SVG document
pub fn render_svg(chart: &Chart, dimensions: (u32, u32)) -> Result<String, OutputError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, dimensions).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        match &chart.data {
            ChartData::Distribution(bars) => draw_bars(&root, chart, bars)?,
            ChartData::LoadCurve(points) => draw_curve(&root, chart, points)?,
        }

        root.present().map_err(render_error)?;
    }
    Ok(svg)
}

fn draw_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &Chart,
    bars: &[(String, u64)],
) -> Result<(), OutputError> {
    let max = bars.iter().map(|(_, count)| *count).max().unwrap_or(0);
    let y_top = max + max / 10 + 1;

    let mut ctx = ChartBuilder::on(root)
        .caption(chart.title.as_str(), ("sans-serif", 24).into_font())
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(64)
        .build_cartesian_2d((0..bars.len()).into_segmented(), 0u64..y_top)
        .map_err(render_error)?;

    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len())
        .x_label_formatter(&|value| match value {
            SegmentValue::CenterOf(index) => bars
                .get(*index)
                .map(|(label, _)| label.clone())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc(chart.x_desc.as_str())
        .y_desc(chart.y_desc.as_str())
        .draw()
        .map_err(render_error)?;

    ctx.draw_series(bars.iter().enumerate().map(|(index, (_, count))| {
        let mut bar = Rectangle::new(
            [
                (SegmentValue::Exact(index), 0),
                (SegmentValue::Exact(index + 1), *count),
            ],
            BAR_COLOR.filled(),
        );
        bar.set_margin(0, 0, 8, 8);
        bar
    }))
    .map_err(render_error)?;

    Ok(())
}

fn draw_curve<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &Chart,
    points: &[(u32, f64)],
) -> Result<(), OutputError> {
    let first = points.first().map(|(servers, _)| *servers).unwrap_or(0);
    let last = points.last().map(|(servers, _)| *servers).unwrap_or(first);
    // A single point still needs a non-degenerate x axis
    let x_end = last.max(first + 1);
    let y_max = points.iter().map(|(_, load)| *load).fold(0.0_f64, f64::max);
    let y_top = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let mut ctx = ChartBuilder::on(root)
        .caption(chart.title.as_str(), ("sans-serif", 24).into_font())
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(64)
        .build_cartesian_2d(first..x_end, 0f64..y_top)
        .map_err(render_error)?;

    ctx.configure_mesh()
        .x_labels((x_end - first + 1) as usize)
        .x_label_formatter(&|servers| servers.to_string())
        .y_label_formatter(&|load| format!("{:.1}", load))
        .x_desc(chart.x_desc.as_str())
        .y_desc(chart.y_desc.as_str())
        .draw()
        .map_err(render_error)?;

    ctx.draw_series(LineSeries::new(points.iter().copied(), LINE_COLOR.stroke_width(2)))
        .map_err(render_error)?;
    ctx.draw_series(
        points
            .iter()
            .map(|&(servers, load)| Circle::new((servers, load), 4, LINE_COLOR.filled())),
    )
    .map_err(render_error)?;

    Ok(())
}
