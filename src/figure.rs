//! Figure model
//!
//! A [Figure] describes one logical sub-plot independently of the backend
//! it is rendered to.

use crate::style::PlotStyle;
use plotters::{
    chart::ChartContext,
    coord::{cartesian::Cartesian2d, ranged1d::Ranged, types::RangedCoordf64, Shift},
    drawing::DrawingAreaErrorKind,
    prelude::*,
};
use std::{
    fmt,
    path::{Path, PathBuf},
};

#[derive(Debug, thiserror::Error)]
pub enum FigureError {
    #[error("Failed to draw figure {1:?}: {0}")]
    Drawing(String, String),
    #[error("Failed to write figure to {1:?}: {0}")]
    Writing(String, PathBuf),
}
type Result<T> = std::result::Result<T, FigureError>;

type DrawResult<DB> = std::result::Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Vertical axis scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Linear,
    Log,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Line,
    Markers,
}

/// A labelled set of (x,y) points
///
/// Series with an empty label are left out of the legend.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub color: RGBColor,
    pub kind: SeriesKind,
    pub points: Vec<(f64, f64)>,
}
impl Series {
    pub fn line<S: Into<String>>(label: S, color: RGBColor, x: &[f64], y: &[f64]) -> Self {
        Self {
            label: label.into(),
            color,
            kind: SeriesKind::Line,
            points: x.iter().cloned().zip(y.iter().cloned()).collect(),
        }
    }
    pub fn markers<S: Into<String>>(label: S, color: RGBColor, x: &[f64], y: &[f64]) -> Self {
        Self {
            kind: SeriesKind::Markers,
            ..Self::line(label, color, x, y)
        }
    }
    /// y values of the series
    pub fn y(&self) -> Vec<f64> {
        self.points.iter().map(|(_, y)| *y).collect()
    }
}

/// A 2D figure
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// file name stem, e.g. `miri_lrs_point_sat`
    pub name: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub y_scale: Scale,
    pub series: Vec<Series>,
}
impl Figure {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            y_scale: Scale::Log,
            series: vec![],
        }
    }
    pub fn y_scale(self, y_scale: Scale) -> Self {
        Self { y_scale, ..self }
    }
    pub fn push(&mut self, series: Series) {
        self.series.push(series);
    }
    /// Legend entries in drawing order
    pub fn legend_labels(&self) -> Vec<&str> {
        self.series
            .iter()
            .filter(|s| !s.label.is_empty())
            .map(|s| s.label.as_str())
            .collect()
    }
    /// Points that can be drawn: finite and, on a log scale, positive
    fn drawable(&self, series: &Series) -> Vec<(f64, f64)> {
        series
            .points
            .iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .filter(|(_, y)| self.y_scale == Scale::Linear || *y > 0f64)
            .cloned()
            .collect()
    }
    /// Axes ranges
    pub fn ranges(&self) -> ((f64, f64), (f64, f64)) {
        let (x, y): (Vec<f64>, Vec<f64>) = self
            .series
            .iter()
            .flat_map(|s| self.drawable(s))
            .unzip();
        (
            axis_range(&x, Scale::Linear),
            axis_range(&y, self.y_scale),
        )
    }
    /// Draws the figure on a drawing area
    pub fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        style: &PlotStyle,
    ) -> DrawResult<DB> {
        root.fill(&WHITE)?;
        let ((x0, x1), (y0, y1)) = self.ranges();
        let font = style.font_family.as_str();
        let mut builder = ChartBuilder::on(root);
        builder
            .caption(&self.title, (font, style.caption_font_size))
            .set_label_area_size(LabelAreaPosition::Left, style.label_area.0)
            .set_label_area_size(LabelAreaPosition::Bottom, style.label_area.1)
            .margin(style.margin);
        match self.y_scale {
            Scale::Linear => {
                let mut chart = builder.build_cartesian_2d(x0..x1, y0..y1)?;
                chart
                    .configure_mesh()
                    .x_desc(&self.x_label)
                    .y_desc(&self.y_label)
                    .label_style((font, style.label_font_size))
                    .axis_desc_style((font, style.label_font_size))
                    .draw()?;
                self.draw_series(&mut chart, style)
            }
            Scale::Log => {
                let mut chart = builder.build_cartesian_2d(x0..x1, (y0..y1).log_scale())?;
                chart
                    .configure_mesh()
                    .x_desc(&self.x_label)
                    .y_desc(&self.y_label)
                    .y_label_formatter(&|y| format!("{:.0e}", y))
                    .label_style((font, style.label_font_size))
                    .axis_desc_style((font, style.label_font_size))
                    .draw()?;
                self.draw_series(&mut chart, style)
            }
        }
    }
    fn draw_series<'a, DB, Y>(
        &self,
        chart: &mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, Y>>,
        style: &PlotStyle,
    ) -> DrawResult<DB>
    where
        DB: DrawingBackend + 'a,
        Y: Ranged<ValueType = f64>,
    {
        for series in &self.series {
            let rgb = series.color;
            let points = self.drawable(series);
            let anno = match series.kind {
                SeriesKind::Line => chart.draw_series(LineSeries::new(
                    points,
                    rgb.stroke_width(style.line_width),
                ))?,
                SeriesKind::Markers => chart.draw_series(
                    points
                        .into_iter()
                        .map(|p| Circle::new(p, style.marker_size as i32, rgb.filled())),
                )?,
            };
            if !series.label.is_empty() {
                anno.label(series.label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &rgb));
            }
        }
        if !self.legend_labels().is_empty() {
            chart
                .configure_series_labels()
                .border_style(&BLACK)
                .background_style(&WHITE.mix(0.8))
                .label_font((style.font_family.as_str(), style.label_font_size))
                .position(SeriesLabelPosition::UpperRight)
                .draw()?;
        }
        Ok(())
    }
    /// Renders the figure into a PNG file
    ///
    /// The parent directory must exist.
    pub fn save<P: AsRef<Path>>(&self, path: P, style: &PlotStyle) -> Result<()> {
        let path = path.as_ref();
        let root = BitMapBackend::new(path, style.size).into_drawing_area();
        self.draw(&root, style)
            .map_err(|e| FigureError::Drawing(e.to_string(), self.name.clone()))?;
        root.present()
            .map_err(|e| FigureError::Writing(e.to_string(), path.to_path_buf()))?;
        log::info!("{} saved to {:?}", self.name, path);
        Ok(())
    }
    /// Renders the figure into a SVG document
    pub fn to_svg(&self, style: &PlotStyle) -> Result<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, style.size).into_drawing_area();
            self.draw(&root, style)
                .map_err(|e| FigureError::Drawing(e.to_string(), self.name.clone()))?;
            root.present()
                .map_err(|e| FigureError::Drawing(e.to_string(), self.name.clone()))?;
        }
        Ok(svg)
    }
}
impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ((x0, x1), (y0, y1)) = self.ranges();
        write!(
            f,
            "{:<32}: {:>2} series, x: [{:.3e},{:.3e}], y: [{:.3e},{:.3e}]",
            self.name,
            self.series.len(),
            x0,
            x1,
            y0,
            y1
        )
    }
}

/// Data range padded for display
fn axis_range(values: &[f64], scale: Scale) -> (f64, f64) {
    let (min, max) = values
        .iter()
        .cloned()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(a, b), x| {
            (a.min(x), b.max(x))
        });
    match scale {
        _ if values.is_empty() => match scale {
            Scale::Linear => (0f64, 1f64),
            Scale::Log => (1e-1, 1e1),
        },
        Scale::Linear if min == max => (min - 1f64, max + 1f64),
        Scale::Linear => {
            let pad = 5e-2 * (max - min);
            (min - pad, max + pad)
        }
        Scale::Log => (min * 0.5, max * 2.0),
    }
}
