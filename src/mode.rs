use std::{fmt, str::FromStr};
use strum_macros::EnumIter;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ModeError {
    #[error("Mode not recognized: {0:?} (expected imaging, lrs or mrs)")]
    Mode(String),
    #[error("Source type not recognized: {0:?} (expected point or extended)")]
    SourceType(String),
}

/// MIRI observing mode
#[derive(EnumIter, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Imaging,
    Lrs,
    Mrs,
}
impl Mode {
    pub fn to_pretty_string(&self) -> String {
        match self {
            Mode::Imaging => "Imager".to_string(),
            Mode::Lrs => "LRS".to_string(),
            Mode::Mrs => "MRS".to_string(),
        }
    }
}
impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Imaging => write!(f, "imaging"),
            Mode::Lrs => write!(f, "lrs"),
            Mode::Mrs => write!(f, "mrs"),
        }
    }
}
impl FromStr for Mode {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "imaging" => Ok(Mode::Imaging),
            "lrs" => Ok(Mode::Lrs),
            "mrs" => Ok(Mode::Mrs),
            _ => Err(ModeError::Mode(s.to_string())),
        }
    }
}

/// Source brightness profile the ETC numbers were computed for
#[derive(EnumIter, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceType {
    Point,
    Extended,
}
impl SourceType {
    pub fn to_pretty_string(&self) -> String {
        match self {
            SourceType::Point => "Point source".to_string(),
            SourceType::Extended => "Extended source".to_string(),
        }
    }
}
impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceType::Point => write!(f, "point"),
            SourceType::Extended => write!(f, "extended"),
        }
    }
}
impl FromStr for SourceType {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "point" => Ok(SourceType::Point),
            "extended" => Ok(SourceType::Extended),
            _ => Err(ModeError::SourceType(s.to_string())),
        }
    }
}

/// MRS sub-band
///
/// The 12 MRS configurations are ordered channel by channel,
/// each channel holding its short, medium and long sub-bands in that order.
#[derive(EnumIter, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MrsBand {
    Short,
    Medium,
    Long,
}
impl MrsBand {
    /// Number of MRS configurations
    pub const N_CONFIG: usize = 12;
    /// Configuration indices belonging to the band
    pub fn indices(&self) -> [usize; 4] {
        let offset = *self as usize;
        [offset, offset + 3, offset + 6, offset + 9]
    }
    /// Band of the MRS configuration `index`
    pub fn of_config(index: usize) -> Self {
        match index % 3 {
            0 => MrsBand::Short,
            1 => MrsBand::Medium,
            _ => MrsBand::Long,
        }
    }
    /// Channel (1 to 4) of the MRS configuration `index`
    pub fn channel(index: usize) -> usize {
        index / 3 + 1
    }
    /// Label of the MRS configuration `index`, e.g. `2MEDIUM`
    pub fn config_label(index: usize) -> String {
        format!(
            "{}{}",
            Self::channel(index),
            Self::of_config(index).to_string().to_uppercase()
        )
    }
}
impl fmt::Display for MrsBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MrsBand::Short => write!(f, "short"),
            MrsBand::Medium => write!(f, "medium"),
            MrsBand::Long => write!(f, "long"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn mode_round_trip() {
        for mode in Mode::iter() {
            assert_eq!(mode.to_string().parse::<Mode>().unwrap(), mode);
        }
        assert_eq!(
            "imager".parse::<Mode>(),
            Err(ModeError::Mode("imager".to_string()))
        );
    }

    #[test]
    fn source_type_parsing() {
        assert_eq!("point".parse::<SourceType>(), Ok(SourceType::Point));
        assert_eq!("extended".parse::<SourceType>(), Ok(SourceType::Extended));
        assert!(matches!(
            "Point".parse::<SourceType>(),
            Err(ModeError::SourceType(_))
        ));
    }

    #[test]
    fn mrs_band_indices() {
        assert_eq!(MrsBand::Short.indices(), [0, 3, 6, 9]);
        assert_eq!(MrsBand::Medium.indices(), [1, 4, 7, 10]);
        assert_eq!(MrsBand::Long.indices(), [2, 5, 8, 11]);
        for band in MrsBand::iter() {
            for idx in band.indices() {
                assert_eq!(MrsBand::of_config(idx), band);
            }
        }
    }

    #[test]
    fn mrs_config_labels() {
        assert_eq!(MrsBand::config_label(0), "1SHORT");
        assert_eq!(MrsBand::config_label(4), "2MEDIUM");
        assert_eq!(MrsBand::config_label(11), "4LONG");
    }
}
