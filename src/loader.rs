//! ETC archive loader
//!
//! The ETC performance tables are stored in npz archives, one per observing
//! mode and source type, within a directory per ETC version:
//! ```text
//! <data root>/ETC<version>/miri_<mode>_sensitivity.npz
//! <data root>/ETC<version>/miri_<mode>_sensitivity_extended*.npz
//! ```
//! The data root is read from the `MIRI_DATA_FILES` environment variable and
//! defaults to `data_files`.

use crate::{
    mode::{Mode, ModeError, SourceType},
    record::{Array, Field, PerformanceRecord},
};
use npyz::{npz::NpzArchive, DType, TypeChar};
use regex::Regex;
use std::{
    collections::BTreeMap,
    env, io,
    path::{Path, PathBuf},
};

pub const DATA_FILES_ENV: &str = "MIRI_DATA_FILES";
pub const DEFAULT_DATA_FILES: &str = "data_files";

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error(transparent)]
    Mode(#[from] ModeError),
    #[error("ETC version is empty")]
    EmptyVersion,
    #[error("Data directory not found: {0:?}")]
    DataDirectory(PathBuf),
    #[error("No unique file match for {pattern} ({found} found)")]
    NoUniqueFile { pattern: String, found: usize },
    #[error("Path is not valid UTF-8: {0:?}")]
    NonUtf8Path(PathBuf),
    #[error("Invalid member name pattern")]
    Regex(#[from] regex::Error),
    #[error("Invalid file pattern")]
    Pattern(#[from] glob::PatternError),
    #[error("Failed to list data files")]
    Glob(#[from] glob::GlobError),
    #[error("Failed to read archive {1:?}")]
    Archive(#[source] io::Error, PathBuf),
    #[error("Member {field}_{index} is missing from archive {path:?}")]
    MissingIndex {
        field: String,
        index: usize,
        path: PathBuf,
    },
}
type Result<T> = std::result::Result<T, LoaderError>;

/// Archive file name for the given mode and source type
///
/// The extended source name is a glob pattern, the suffix of these archives
/// changes from one ETC version to the next.
pub fn file_name(mode: Mode, source_type: SourceType) -> String {
    match source_type {
        SourceType::Point => format!("miri_{}_sensitivity.npz", mode),
        SourceType::Extended => format!("miri_{}_sensitivity_extended*.npz", mode),
    }
}

/// Root directory of the ETC archives
#[derive(Debug, Clone)]
pub struct DataRepository {
    root: PathBuf,
}
impl Default for DataRepository {
    /// Returns the path from the `MIRI_DATA_FILES` environment variable if it is set,
    /// otherwise `data_files`
    fn default() -> Self {
        let root = env::var(DATA_FILES_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_FILES));
        Self { root }
    }
}
impl DataRepository {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
    pub fn root(&self) -> &Path {
        &self.root
    }
    /// Path to the directory of the ETC `version`
    pub fn version_dir(&self, version: &str) -> Result<PathBuf> {
        let version = version.trim();
        if version.is_empty() {
            return Err(LoaderError::EmptyVersion);
        }
        let path = self.root.join(format!("ETC{}", version));
        if path.is_dir() {
            Ok(path)
        } else {
            Err(LoaderError::DataDirectory(path))
        }
    }
    /// Path to the unique archive for the given version, mode and source type
    pub fn locate(&self, version: &str, mode: Mode, source_type: SourceType) -> Result<PathBuf> {
        let data_dir = self.version_dir(version)?;
        let name = file_name(mode, source_type);
        let path = match source_type {
            SourceType::Point => {
                let path = data_dir.join(&name);
                if !path.is_file() {
                    return Err(LoaderError::NoUniqueFile {
                        pattern: path.display().to_string(),
                        found: 0,
                    });
                }
                path
            }
            SourceType::Extended => {
                let dir = data_dir
                    .to_str()
                    .ok_or_else(|| LoaderError::NonUtf8Path(data_dir.clone()))?;
                let pattern = Path::new(&glob::Pattern::escape(dir))
                    .join(&name)
                    .display()
                    .to_string();
                let mut paths = glob::glob(&pattern)?
                    .collect::<std::result::Result<Vec<PathBuf>, glob::GlobError>>()?
                    .into_iter()
                    .filter(|p| p.is_file())
                    .collect::<Vec<_>>();
                if paths.len() != 1 {
                    return Err(LoaderError::NoUniqueFile {
                        pattern,
                        found: paths.len(),
                    });
                }
                paths.remove(0)
            }
        };
        log::info!("{:?}", path);
        Ok(path)
    }
    /// Loads the performance record for the given version, mode and source type
    pub fn load(
        &self,
        version: &str,
        mode: Mode,
        source_type: SourceType,
    ) -> Result<PerformanceRecord> {
        let path = self.locate(version, mode, source_type)?;
        read_archive(&path)
    }
}

/// Loads the performance record for the given version, mode and source type
/// from the default [DataRepository]
///
/// `mode` and `source_type` are checked before the file system is looked up.
pub fn load_data(version: &str, mode: &str, source_type: &str) -> Result<PerformanceRecord> {
    let mode: Mode = mode.parse()?;
    let source_type: SourceType = source_type.parse()?;
    DataRepository::default().load(version, mode, source_type)
}

/// Reads all the arrays of a npz archive
///
/// Numeric members are decoded to `f64` and string members to labels.
/// Members named `<field>_<k>` are gathered into a [Field::Indexed] field,
/// with `k` running from 0 without gaps.
pub fn read_archive<P: AsRef<Path>>(path: P) -> Result<PerformanceRecord> {
    let path = path.as_ref();
    let archive_err = |e: io::Error| LoaderError::Archive(e, path.to_path_buf());
    let mut npz = NpzArchive::open(path).map_err(archive_err)?;
    let names: Vec<String> = npz
        .array_names()
        .map(|name| name.trim_end_matches(".npy").to_string())
        .collect();
    let re_indexed = Regex::new(r"^(\w+?)_(\d+)$")?;

    let mut record = PerformanceRecord::default();
    let mut indexed: BTreeMap<String, BTreeMap<usize, Array>> = BTreeMap::new();
    for name in names {
        let array = match read_member(&mut npz, &name).map_err(archive_err)? {
            Some(Member::Array(array)) => array,
            Some(Member::Labels(labels)) => {
                log::debug!("{:?}: {} labels", name, labels.len());
                record.insert(name, Field::Labels(labels));
                continue;
            }
            None => {
                log::warn!("skipping member {:?} of {:?}: unsupported dtype", name, path);
                continue;
            }
        };
        log::debug!("{:?}: {:?}", name, array.shape);
        match re_indexed
            .captures(&name)
            .and_then(|capts| Some((capts[1].to_string(), capts[2].parse::<usize>().ok()?)))
        {
            Some((field, index)) => {
                indexed.entry(field).or_default().insert(index, array);
            }
            None => {
                record.insert(name, Field::Array(array));
            }
        }
    }
    for (field, arrays) in indexed {
        if record.get(&field).is_some() {
            log::warn!("{:?} is both a member and an indexed member, keeping the member", field);
            continue;
        }
        if let Some(index) = (0..arrays.len()).find(|k| !arrays.contains_key(k)) {
            return Err(LoaderError::MissingIndex {
                field,
                index,
                path: path.to_path_buf(),
            });
        }
        record.insert(field, Field::Indexed(arrays.into_values().collect()));
    }
    Ok(record)
}

/// A decoded npz member
enum Member {
    Array(Array),
    Labels(Vec<String>),
}

/// Decodes a npz member according to its dtype
///
/// Booleans, integers and floats of any width become `f64` arrays, byte and
/// unicode strings become labels.
/// Returns `None` if the member does not exist or if its dtype is not one of these.
fn read_member<R>(npz: &mut NpzArchive<R>, name: &str) -> io::Result<Option<Member>>
where
    R: io::Read + io::Seek,
{
    let Some(npy) = npz.by_name(name)? else {
        return Ok(None);
    };
    let DType::Plain(type_str) = npy.dtype() else {
        return Ok(None);
    };
    let shape: Vec<usize> = npy.shape().iter().map(|&n| n as usize).collect();
    macro_rules! numeric {
        ($t:ty) => {
            Member::Array(Array::new(
                shape,
                npy.into_vec::<$t>()?.into_iter().map(|x| x as f64).collect(),
            ))
        };
    }
    let member = match (type_str.type_char(), type_str.size_field()) {
        (TypeChar::Float, 8) => numeric!(f64),
        (TypeChar::Float, 4) => numeric!(f32),
        (TypeChar::Int, 8) => numeric!(i64),
        (TypeChar::Int, 4) => numeric!(i32),
        (TypeChar::Int, 2) => numeric!(i16),
        (TypeChar::Int, 1) => numeric!(i8),
        (TypeChar::Uint, 8) => numeric!(u64),
        (TypeChar::Uint, 4) => numeric!(u32),
        (TypeChar::Uint, 2) => numeric!(u16),
        (TypeChar::Uint, 1) => numeric!(u8),
        (TypeChar::Bool, _) => Member::Array(Array::new(
            shape,
            npy.into_vec::<bool>()?
                .into_iter()
                .map(|x| if x { 1f64 } else { 0f64 })
                .collect(),
        )),
        (TypeChar::UnicodeStr | TypeChar::ByteStr, _) => Member::Labels(
            npy.into_vec::<String>()?
                .into_iter()
                .map(|label| label.trim().to_string())
                .collect(),
        ),
        _ => return Ok(None),
    };
    Ok(Some(member))
}
