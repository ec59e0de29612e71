use crate::{
    figure::FigureError, loader::LoaderError, mode::ModeError, plots::PlotError,
    record::RecordError, style::StyleError,
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error in the `mode` module")]
    Mode(#[from] ModeError),
    #[error("Error in the `loader` module")]
    Loader(#[from] LoaderError),
    #[error("Error in the `record` module")]
    Record(#[from] RecordError),
    #[error("Error in the `figure` module")]
    Figure(#[from] FigureError),
    #[error("Error in the `plots` module")]
    Plot(#[from] PlotError),
    #[error("Error in the `style` module")]
    Style(#[from] StyleError),
}
