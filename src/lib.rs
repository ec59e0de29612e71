//! # MIRI performance
//!
//! Loads the MIRI sensitivity and saturation limits computed with the JWST
//! Exposure Time Calculator (ETC) and plots them.
//!
//! The ETC tables are npz archives, one per observing mode ([Mode]) and
//! source type ([SourceType]), stored in a directory per ETC version.
//!
//! ```no_run
//! use miri_performance::{load_data, make_lrs_plots, PlotOptions};
//!
//! let record = load_data("1.4", "lrs", "point")?;
//! record.summary();
//! let figures = make_lrs_plots("1.4", &PlotOptions::default().save())?;
//! # Ok::<(), miri_performance::Error>(())
//! ```

pub mod error;
pub mod figure;
pub mod loader;
pub mod mode;
pub mod plots;
pub mod record;
pub mod style;

pub use error::Error;
pub use figure::{Figure, Scale, Series};
pub use loader::{load_data, DataRepository};
pub use mode::{Mode, MrsBand, SourceType};
pub use plots::{
    bright_plot, make_imager_plots, make_lrs_plots, make_mrs_plots, sens_plot, PlotKind,
    PlotOptions, FRAME_RATIO,
};
pub use record::{Field, PerformanceRecord};
pub use style::{PlotStyle, Style};
