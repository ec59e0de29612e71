//! Performance record
//!
//! A [PerformanceRecord] is the content of one ETC archive: a mapping from field
//! names to numeric arrays. The loader does not check the shapes of the arrays,
//! the checks happen when a record is turned into one of the per-mode tables
//! ([ImagingTable] or [SpectroTable]).

use crate::mode::MrsBand;
use itertools::{Itertools, MinMaxResult};
use std::{collections::BTreeMap, fmt};

pub const WAVELENGTHS: &str = "wavelengths";
pub const LIM_FLUXES: &str = "lim_fluxes";
pub const SAT_LIMITS: &str = "sat_limits";
pub const CONFIGS: &str = "configs";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RecordError {
    #[error("Field {0:?} is missing from the performance record")]
    MissingField(String),
    #[error("Field {field:?} must be 1-D, found shape {shape}")]
    NotOneDimensional { field: String, shape: String },
    #[error("Field {field:?} has {found} entries, expected {expected}")]
    LengthMismatch {
        field: String,
        expected: usize,
        found: usize,
    },
    #[error("The {mode} record has {found} configurations, expected {expected}")]
    ConfigCount {
        mode: String,
        expected: String,
        found: usize,
    },
    #[error("Configuration #{config} of {field:?} has {found} samples, expected {expected}")]
    SampleMismatch {
        field: String,
        config: usize,
        expected: usize,
        found: usize,
    },
}
type Result<T> = std::result::Result<T, RecordError>;

/// N-dimensional numeric array in row-major order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array {
    pub shape: Vec<usize>,
    pub data: Vec<f64>,
}
impl Array {
    pub fn new(shape: Vec<usize>, data: Vec<f64>) -> Self {
        Self { shape, data }
    }
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }
    /// Splits the array along its last axis
    pub fn rows(&self) -> Vec<&[f64]> {
        match self.shape.last() {
            None => vec![self.data.as_slice()],
            Some(&0) => {
                let n: usize = self.shape[..self.shape.len() - 1].iter().product();
                vec![&self.data[..0]; n]
            }
            Some(&m) => self.data.chunks(m).collect(),
        }
    }
}
impl From<Vec<f64>> for Array {
    fn from(data: Vec<f64>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }
}

/// A named field of a performance record
///
/// A field is either a single array, a sequence of 1-D arrays, one per
/// instrument configuration, when the configurations are sampled differently,
/// or text labels.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Array(Array),
    Indexed(Vec<Array>),
    Labels(Vec<String>),
}
impl Field {
    /// Number of entries along the outer axis
    pub fn len(&self) -> usize {
        match self {
            Field::Array(array) => array.shape.first().copied().unwrap_or(1),
            Field::Indexed(arrays) => arrays.len(),
            Field::Labels(labels) => labels.len(),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Values of a 1-D field
    pub fn values(&self) -> Option<&[f64]> {
        match self {
            Field::Array(array) if array.ndim() == 1 => Some(array.data.as_slice()),
            _ => None,
        }
    }
    /// Text labels
    pub fn labels(&self) -> Option<&[String]> {
        match self {
            Field::Labels(labels) => Some(labels.as_slice()),
            _ => None,
        }
    }
    /// Per-configuration sequences, none for labels
    pub fn sequences(&self) -> Vec<&[f64]> {
        match self {
            Field::Array(array) => array.rows(),
            Field::Indexed(arrays) => arrays.iter().map(|a| a.data.as_slice()).collect(),
            Field::Labels(_) => vec![],
        }
    }
    pub fn shape(&self) -> String {
        match self {
            Field::Array(array) => format!("{:?}", array.shape),
            Field::Indexed(arrays) => format!(
                "{}x{:?}",
                arrays.len(),
                arrays.iter().map(|a| a.data.len()).collect::<Vec<_>>()
            ),
            Field::Labels(labels) => format!("[{}] labels", labels.len()),
        }
    }
    /// Minimum and maximum of all the values of the field
    pub fn minmax(&self) -> Option<(f64, f64)> {
        match self
            .sequences()
            .into_iter()
            .flat_map(|s| s.iter().cloned())
            .minmax_by(|a, b| a.total_cmp(b))
        {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(x) => Some((x, x)),
            MinMaxResult::MinMax(min, max) => Some((min, max)),
        }
    }
}

/// ETC performance tables for one observing mode and one source type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceRecord {
    fields: BTreeMap<String, Field>,
}
impl PerformanceRecord {
    pub fn insert<S: Into<String>>(&mut self, name: S, field: Field) -> Option<Field> {
        self.fields.insert(name.into(), field)
    }
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_str())
    }
    pub fn len(&self) -> usize {
        self.fields.len()
    }
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
    fn field(&self, name: &str) -> Result<&Field> {
        self.get(name)
            .ok_or_else(|| RecordError::MissingField(name.to_string()))
    }
    fn values(&self, name: &str) -> Result<Vec<f64>> {
        let field = self.field(name)?;
        field
            .values()
            .map(|v| v.to_vec())
            .ok_or_else(|| RecordError::NotOneDimensional {
                field: name.to_string(),
                shape: field.shape(),
            })
    }
    /// Imaging tables, one entry per filter
    pub fn imaging(&self) -> Result<ImagingTable> {
        let wavelengths = self.values(WAVELENGTHS)?;
        let lim_fluxes = self.values(LIM_FLUXES)?;
        let sat_limits = self.values(SAT_LIMITS)?;
        for (name, values) in [(LIM_FLUXES, &lim_fluxes), (SAT_LIMITS, &sat_limits)] {
            if values.len() != wavelengths.len() {
                return Err(RecordError::LengthMismatch {
                    field: name.to_string(),
                    expected: wavelengths.len(),
                    found: values.len(),
                });
            }
        }
        Ok(ImagingTable {
            wavelengths,
            lim_fluxes,
            sat_limits,
        })
    }
    /// LRS tables: configuration #0 is slitless, #1 is slit
    pub fn lrs(&self) -> Result<SpectroTable> {
        let n = self.field(WAVELENGTHS)?.sequences().len();
        if n != 2 {
            return Err(RecordError::ConfigCount {
                mode: "lrs".to_string(),
                expected: "2".to_string(),
                found: n,
            });
        }
        let labels = self
            .config_labels(n)
            .unwrap_or_else(|| vec!["slitless".to_string(), "slit".to_string()]);
        self.spectro(labels)
    }
    /// MRS tables, 12 configurations ordered as described in [MrsBand]
    pub fn mrs(&self) -> Result<SpectroTable> {
        let n = self.field(WAVELENGTHS)?.sequences().len();
        if n < MrsBand::N_CONFIG {
            return Err(RecordError::ConfigCount {
                mode: "mrs".to_string(),
                expected: format!("at least {}", MrsBand::N_CONFIG),
                found: n,
            });
        }
        let labels = self
            .config_labels(n)
            .unwrap_or_else(|| (0..n).map(MrsBand::config_label).collect());
        self.spectro(labels)
    }
    /// `configs` labels if the archive has one label per configuration
    fn config_labels(&self, n: usize) -> Option<Vec<String>> {
        match self.get(CONFIGS).and_then(Field::labels) {
            Some(labels) if labels.len() == n => Some(labels.to_vec()),
            Some(labels) => {
                log::warn!(
                    "{} configuration labels for {} configurations, using default labels",
                    labels.len(),
                    n
                );
                None
            }
            None => None,
        }
    }
    fn spectro(&self, labels: Vec<String>) -> Result<SpectroTable> {
        let wavelengths = self.field(WAVELENGTHS)?.sequences();
        let lim_fluxes = self.field(LIM_FLUXES)?.sequences();
        let sat_limits = self.field(SAT_LIMITS)?.sequences();
        for (name, values) in [(LIM_FLUXES, &lim_fluxes), (SAT_LIMITS, &sat_limits)] {
            if values.len() != wavelengths.len() {
                return Err(RecordError::LengthMismatch {
                    field: name.to_string(),
                    expected: wavelengths.len(),
                    found: values.len(),
                });
            }
        }
        let configs = wavelengths
            .iter()
            .zip(lim_fluxes.iter())
            .zip(sat_limits.iter())
            .zip(labels)
            .enumerate()
            .map(|(k, (((w, l), s), label))| {
                for (name, values) in [(LIM_FLUXES, l), (SAT_LIMITS, s)] {
                    if values.len() != w.len() {
                        return Err(RecordError::SampleMismatch {
                            field: name.to_string(),
                            config: k,
                            expected: w.len(),
                            found: values.len(),
                        });
                    }
                }
                Ok(Configuration {
                    label,
                    wavelengths: w.to_vec(),
                    lim_fluxes: l.to_vec(),
                    sat_limits: s.to_vec(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        log::info!(
            "configurations: {}",
            configs.iter().map(|c| c.label.as_str()).join(", ")
        );
        Ok(SpectroTable { configs })
    }
    pub fn summary(&self) {
        println!("SUMMARY:");
        println!(" - # of fields: {}", self.len());
        println!(
            "    {:^16}: {:^20}  ({:^12}, {:^12})",
            "FIELD", "SHAPE", "MIN", "MAX"
        );
        self.fields
            .iter()
            .for_each(|(key, field)| match (field, field.minmax()) {
                (Field::Labels(labels), _) => println!(
                    "  - {:16}: {:^20}  {}",
                    key,
                    field.shape(),
                    labels.join(", ")
                ),
                (_, Some((min, max))) => println!(
                    "  - {:16}: {:^20}  ({:>12.4e}, {:>12.4e})",
                    key,
                    field.shape(),
                    min,
                    max
                ),
                (_, None) => println!("  - {:16}: {:^20}  (empty)", key, field.shape()),
            });
    }
}
impl fmt::Display for PerformanceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self
            .fields
            .iter()
            .map(|(key, field)| format!("{}{}", key, field.shape()))
            .join(", ");
        write!(f, "{{{}}}", fields)
    }
}

/// Imager sensitivity and saturation limits, one entry per filter
#[derive(Debug, Clone, PartialEq)]
pub struct ImagingTable {
    pub wavelengths: Vec<f64>,
    pub lim_fluxes: Vec<f64>,
    pub sat_limits: Vec<f64>,
}
impl ImagingTable {
    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }
    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }
}

/// Spectrometer limits of one instrument configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub label: String,
    pub wavelengths: Vec<f64>,
    pub lim_fluxes: Vec<f64>,
    pub sat_limits: Vec<f64>,
}

/// LRS or MRS limits, one [Configuration] per slit setup or channel
#[derive(Debug, Clone, PartialEq)]
pub struct SpectroTable {
    pub configs: Vec<Configuration>,
}
impl SpectroTable {
    /// MRS configurations of the given band, in channel order
    pub fn band(&self, band: MrsBand) -> impl Iterator<Item = (usize, &Configuration)> {
        band.indices()
            .into_iter()
            .filter_map(move |k| self.configs.get(k).map(|c| (k, c)))
    }
}
