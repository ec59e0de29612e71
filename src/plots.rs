//! MIRI performance plots
//!
//! Each routine loads the ETC records it needs, builds one [Figure] per
//! logical sub-plot and, if requested, saves the figures as PNG files in
//! ```text
//! <plots root>/ETC<version>/<basename>_<source>_<sens|sat>.png
//! ```
//! The plots root is read from the `MIRI_PLOTS` environment variable and
//! defaults to `plots`. The directories are not created.

use crate::{
    figure::{Figure, FigureError, Series},
    loader::{DataRepository, LoaderError},
    mode::{Mode, MrsBand, SourceType},
    record::{ImagingTable, RecordError, SpectroTable},
    style::{PlotStyle, Style},
};
use plotters::style::RGBColor;
use std::{
    env, fmt,
    path::{Path, PathBuf},
    str::FromStr,
};
use strum_macros::EnumIter;

pub const PLOTS_ENV: &str = "MIRI_PLOTS";
pub const DEFAULT_PLOTS: &str = "plots";
/// LRS slitless to slit frame time ratio
///
/// The slitless subarray is read out in 0.159s against 2.7705s for the full frame.
pub const FRAME_RATIO: f64 = 0.159 / 2.7705;
const X_LABEL: &str = "Wavelength (micron)";

#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    #[error("Failed to load the ETC data")]
    Loader(#[from] LoaderError),
    #[error("The ETC data does not have the expected shape")]
    Record(#[from] RecordError),
    #[error("Failed to render the figure")]
    Figure(#[from] FigureError),
    #[error("Plot not recognized: {0:?} (expected imager, lrs, mrs, sens or bright)")]
    Kind(String),
}
type Result<T> = std::result::Result<T, PlotError>;

fn tableau(index: usize) -> RGBColor {
    let color = colorous::TABLEAU10[index % colorous::TABLEAU10.len()];
    RGBColor(color.r, color.g, color.b)
}
/// Fixed color of the MRS band curves
pub fn band_color(band: MrsBand) -> RGBColor {
    match band {
        MrsBand::Short => tableau(0),
        MrsBand::Medium => tableau(4),
        MrsBand::Long => tableau(2),
    }
}
fn imager_color() -> RGBColor {
    tableau(6)
}
fn lrs_color(config: usize) -> RGBColor {
    tableau(1 + 2 * config)
}

/// Plotted quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Sensitivity,
    Saturation,
}
impl Quantity {
    /// File name suffix
    pub fn suffix(&self) -> &'static str {
        match self {
            Quantity::Sensitivity => "sens",
            Quantity::Saturation => "sat",
        }
    }
    pub fn y_label(&self, source_type: SourceType) -> &'static str {
        match (self, source_type) {
            (Quantity::Sensitivity, SourceType::Point) => "Limiting flux density",
            (Quantity::Sensitivity, SourceType::Extended) => "Limiting surface brightness",
            (Quantity::Saturation, SourceType::Point) => "Saturation flux density",
            (Quantity::Saturation, SourceType::Extended) => "Saturation surface brightness",
        }
    }
}
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Sensitivity => write!(f, "sensitivity"),
            Quantity::Saturation => write!(f, "saturation limits"),
        }
    }
}

/// Slitless saturation limits scaled to the slit full frame readout
pub fn rescale_slitless(sat_limits: &[f64]) -> Vec<f64> {
    sat_limits.iter().map(|x| x / FRAME_RATIO).collect()
}

/// Plot routine options
#[derive(Debug, Clone)]
pub struct PlotOptions {
    save: bool,
    basename: Option<String>,
    style: Style,
    sources: Vec<SourceType>,
    data: DataRepository,
    plots_root: PathBuf,
}
impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            save: false,
            basename: None,
            style: Style::Default,
            sources: vec![SourceType::Point, SourceType::Extended],
            data: DataRepository::default(),
            plots_root: env::var(PLOTS_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_PLOTS)),
        }
    }
}
impl PlotOptions {
    /// Writes the figures to PNG files
    pub fn save(self) -> Self {
        Self { save: true, ..self }
    }
    /// Output file name stem
    pub fn basename<S: Into<String>>(self, basename: S) -> Self {
        Self {
            basename: Some(basename.into()),
            ..self
        }
    }
    pub fn style(self, style: Style) -> Self {
        Self { style, ..self }
    }
    /// Source types of the per-mode routines
    pub fn sources(self, sources: Vec<SourceType>) -> Self {
        Self { sources, ..self }
    }
    pub fn data_repository(self, data: DataRepository) -> Self {
        Self { data, ..self }
    }
    pub fn plots_root<P: AsRef<Path>>(self, plots_root: P) -> Self {
        Self {
            plots_root: plots_root.as_ref().to_path_buf(),
            ..self
        }
    }
    pub fn plot_style(&self) -> PlotStyle {
        self.style.into()
    }
    fn basename_or(&self, default: &str) -> String {
        self.basename.clone().unwrap_or_else(|| default.to_string())
    }
    /// Path to the PNG file of a figure
    pub fn output_path(&self, version: &str, name: &str) -> PathBuf {
        self.plots_root
            .join(format!("ETC{}", version.trim()))
            .join(format!("{}.png", name))
    }
    /// Renders the figure, to a PNG file if requested or in memory otherwise,
    /// and keeps it
    fn emit(&self, version: &str, figure: Figure, figures: &mut Vec<Figure>) -> Result<()> {
        log::info!("{}", figure);
        let style = self.plot_style();
        if self.save {
            figure.save(self.output_path(version, &figure.name), &style)?;
        } else {
            let svg = figure.to_svg(&style)?;
            log::debug!("{} rendered ({} bytes)", figure.name, svg.len());
        }
        figures.push(figure);
        Ok(())
    }
}

fn figure_name(basename: &str, source_type: SourceType, quantity: Quantity) -> String {
    format!("{}_{}_{}", basename, source_type, quantity.suffix())
}
fn figure(
    basename: &str,
    mode: &str,
    version: &str,
    source_type: SourceType,
    quantity: Quantity,
) -> Figure {
    Figure::new(
        figure_name(basename, source_type, quantity),
        format!(
            "MIRI {} {}, {} (ETC {})",
            mode,
            quantity,
            source_type.to_pretty_string().to_lowercase(),
            version.trim()
        ),
        X_LABEL,
        quantity.y_label(source_type),
    )
}

/// One marker per imager filter
fn add_imager(fig: &mut Figure, table: &ImagingTable, quantity: Quantity, label: &str) {
    let values = match quantity {
        Quantity::Sensitivity => &table.lim_fluxes,
        Quantity::Saturation => &table.sat_limits,
    };
    fig.push(Series::markers(
        label,
        imager_color(),
        &table.wavelengths,
        values,
    ));
}
/// Slitless and slit curves, slitless saturation limits rescaled by [FRAME_RATIO]
fn add_lrs(fig: &mut Figure, table: &SpectroTable, quantity: Quantity, prefix: &str) {
    for (k, config) in table.configs.iter().enumerate() {
        let values = match quantity {
            Quantity::Sensitivity => config.lim_fluxes.clone(),
            Quantity::Saturation if k == 0 => rescale_slitless(&config.sat_limits),
            Quantity::Saturation => config.sat_limits.clone(),
        };
        fig.push(Series::line(
            format!("{}{}", prefix, config.label),
            lrs_color(k),
            &config.wavelengths,
            &values,
        ));
    }
}
/// Twelve MRS curves, only the first curve of each band is in the legend
fn add_mrs(fig: &mut Figure, table: &SpectroTable, quantity: Quantity, prefix: &str) {
    use strum::IntoEnumIterator;
    for band in MrsBand::iter() {
        for (i, (_, config)) in table.band(band).enumerate() {
            let values = match quantity {
                Quantity::Sensitivity => &config.lim_fluxes,
                Quantity::Saturation => &config.sat_limits,
            };
            let label = if i == 0 {
                format!("{}{}", prefix, band)
            } else {
                String::new()
            };
            fig.push(Series::line(
                label,
                band_color(band),
                &config.wavelengths,
                values,
            ));
        }
    }
}

/// Imager sensitivity and saturation figures
pub fn imager_figures(
    table: &ImagingTable,
    version: &str,
    source_type: SourceType,
    basename: &str,
) -> [Figure; 2] {
    [Quantity::Sensitivity, Quantity::Saturation].map(|quantity| {
        let mut fig = figure(basename, "Imager", version, source_type, quantity);
        add_imager(&mut fig, table, quantity, &source_type.to_pretty_string());
        fig
    })
}
/// LRS sensitivity and saturation figures
pub fn lrs_figures(
    table: &SpectroTable,
    version: &str,
    source_type: SourceType,
    basename: &str,
) -> [Figure; 2] {
    [Quantity::Sensitivity, Quantity::Saturation].map(|quantity| {
        let mut fig = figure(basename, "LRS", version, source_type, quantity);
        add_lrs(&mut fig, table, quantity, "");
        fig
    })
}
/// MRS sensitivity and saturation figures
pub fn mrs_figures(
    table: &SpectroTable,
    version: &str,
    source_type: SourceType,
    basename: &str,
) -> [Figure; 2] {
    [Quantity::Sensitivity, Quantity::Saturation].map(|quantity| {
        let mut fig = figure(basename, "MRS", version, source_type, quantity);
        add_mrs(&mut fig, table, quantity, "");
        fig
    })
}
/// All modes point source figure
pub fn combined_figure(
    imager: &ImagingTable,
    lrs: &SpectroTable,
    mrs: &SpectroTable,
    version: &str,
    quantity: Quantity,
    basename: &str,
) -> Figure {
    let mut fig = figure(basename, "modes", version, SourceType::Point, quantity);
    add_imager(&mut fig, imager, quantity, "Imager");
    add_lrs(&mut fig, lrs, quantity, "LRS ");
    add_mrs(&mut fig, mrs, quantity, "MRS ");
    fig
}

/// Imager plots: sensitivity and saturation limits for each source type
pub fn make_imager_plots(version: &str, options: &PlotOptions) -> Result<Vec<Figure>> {
    let basename = options.basename_or("miri_imager");
    let mut figures = vec![];
    for &source_type in &options.sources {
        let table = options.data.load(version, Mode::Imaging, source_type)?.imaging()?;
        for fig in imager_figures(&table, version, source_type, &basename) {
            options.emit(version, fig, &mut figures)?;
        }
    }
    Ok(figures)
}
/// LRS plots: slitless and slit sensitivity and saturation limits for each source type
pub fn make_lrs_plots(version: &str, options: &PlotOptions) -> Result<Vec<Figure>> {
    let basename = options.basename_or("miri_lrs");
    let mut figures = vec![];
    for &source_type in &options.sources {
        let table = options.data.load(version, Mode::Lrs, source_type)?.lrs()?;
        for fig in lrs_figures(&table, version, source_type, &basename) {
            options.emit(version, fig, &mut figures)?;
        }
    }
    Ok(figures)
}
/// MRS plots: the 12 channels sensitivity and saturation limits for each source type
pub fn make_mrs_plots(version: &str, options: &PlotOptions) -> Result<Vec<Figure>> {
    let basename = options.basename_or("miri_mrs");
    let mut figures = vec![];
    for &source_type in &options.sources {
        let table = options.data.load(version, Mode::Mrs, source_type)?.mrs()?;
        for fig in mrs_figures(&table, version, source_type, &basename) {
            options.emit(version, fig, &mut figures)?;
        }
    }
    Ok(figures)
}
fn combined_plot(
    version: &str,
    options: &PlotOptions,
    quantity: Quantity,
    default_basename: &str,
) -> Result<Vec<Figure>> {
    let point = SourceType::Point;
    let imager = options.data.load(version, Mode::Imaging, point)?.imaging()?;
    let lrs = options.data.load(version, Mode::Lrs, point)?.lrs()?;
    let mrs = options.data.load(version, Mode::Mrs, point)?.mrs()?;
    let fig = combined_figure(
        &imager,
        &lrs,
        &mrs,
        version,
        quantity,
        &options.basename_or(default_basename),
    );
    let mut figures = vec![];
    options.emit(version, fig, &mut figures)?;
    Ok(figures)
}
/// Point source sensitivity of all the modes
pub fn sens_plot(version: &str, options: &PlotOptions) -> Result<Vec<Figure>> {
    combined_plot(version, options, Quantity::Sensitivity, "miri_sensitivity")
}
/// Point source saturation limits of all the modes
pub fn bright_plot(version: &str, options: &PlotOptions) -> Result<Vec<Figure>> {
    combined_plot(version, options, Quantity::Saturation, "miri_bright_limits")
}

/// The plot routines
#[derive(EnumIter, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    Imager,
    Lrs,
    Mrs,
    Sensitivity,
    Bright,
}
impl PlotKind {
    pub fn make(&self, version: &str, options: &PlotOptions) -> Result<Vec<Figure>> {
        match self {
            PlotKind::Imager => make_imager_plots(version, options),
            PlotKind::Lrs => make_lrs_plots(version, options),
            PlotKind::Mrs => make_mrs_plots(version, options),
            PlotKind::Sensitivity => sens_plot(version, options),
            PlotKind::Bright => bright_plot(version, options),
        }
    }
}
impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlotKind::Imager => write!(f, "imager"),
            PlotKind::Lrs => write!(f, "lrs"),
            PlotKind::Mrs => write!(f, "mrs"),
            PlotKind::Sensitivity => write!(f, "sens"),
            PlotKind::Bright => write!(f, "bright"),
        }
    }
}
impl FromStr for PlotKind {
    type Err = PlotError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "imager" => Ok(PlotKind::Imager),
            "lrs" => Ok(PlotKind::Lrs),
            "mrs" => Ok(PlotKind::Mrs),
            "sens" => Ok(PlotKind::Sensitivity),
            "bright" => Ok(PlotKind::Bright),
            _ => Err(PlotError::Kind(s.to_string())),
        }
    }
}
