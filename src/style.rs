use std::{fmt, str::FromStr};
use strum_macros::EnumIter;

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("Style not recognized: {0:?} (expected default, paper or talk)")]
pub struct StyleError(String);

/// Named plotting styles
#[derive(EnumIter, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    #[default]
    Default,
    Paper,
    Talk,
}
impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Style::Default => write!(f, "default"),
            Style::Paper => write!(f, "paper"),
            Style::Talk => write!(f, "talk"),
        }
    }
}
impl FromStr for Style {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Style::Default),
            "paper" => Ok(Style::Paper),
            "talk" => Ok(Style::Talk),
            _ => Err(StyleError(s.to_string())),
        }
    }
}

/// Figure presentation settings
#[derive(Debug, Clone, PartialEq)]
pub struct PlotStyle {
    /// figure size in pixels
    pub size: (u32, u32),
    pub font_family: String,
    pub caption_font_size: u32,
    pub label_font_size: u32,
    pub line_width: u32,
    pub marker_size: u32,
    pub margin: u32,
    /// label area on the left and at the bottom
    pub label_area: (u32, u32),
}
impl Default for PlotStyle {
    fn default() -> Self {
        Style::Default.into()
    }
}
impl From<Style> for PlotStyle {
    fn from(style: Style) -> Self {
        match style {
            Style::Default => Self {
                size: (1024, 768),
                font_family: "sans-serif".to_string(),
                caption_font_size: 24,
                label_font_size: 16,
                line_width: 2,
                marker_size: 5,
                margin: 10,
                label_area: (80, 50),
            },
            Style::Paper => Self {
                size: (768, 576),
                font_family: "serif".to_string(),
                caption_font_size: 20,
                label_font_size: 14,
                line_width: 1,
                marker_size: 4,
                margin: 8,
                label_area: (70, 45),
            },
            Style::Talk => Self {
                size: (1600, 1200),
                font_family: "sans-serif".to_string(),
                caption_font_size: 40,
                label_font_size: 28,
                line_width: 4,
                marker_size: 8,
                margin: 20,
                label_area: (130, 80),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn style_names() {
        for style in Style::iter() {
            assert_eq!(style.to_string().parse::<Style>(), Ok(style));
        }
        assert!("seaborn".parse::<Style>().is_err());
    }

    #[test]
    fn talk_is_larger() {
        let talk = PlotStyle::from(Style::Talk);
        let default = PlotStyle::default();
        assert!(talk.size.0 > default.size.0);
        assert!(talk.label_font_size > default.label_font_size);
    }
}
