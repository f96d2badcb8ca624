use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::render::Color;

/// Palette selection affecting rendered appearance, independent of
/// geographic content. Changing it never changes the cache key; it forces
/// invalidation on its own when requested as immediate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ColorScheme {
    #[default]
    Day,
    Dusk,
    Night,
}

impl ColorScheme {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Dusk => "dusk",
            Self::Night => "night",
        }
    }

    const fn dim_factor(self) -> f64 {
        match self {
            Self::Day => 1.0,
            Self::Dusk => 0.5,
            Self::Night => 0.25,
        }
    }
}

pub mod token {
    pub const BACKGROUND: &str = "background";
    pub const WATER: &str = "water";
    pub const COVERAGE_OUTLINE: &str = "coverage-outline";
    pub const CONTOUR_SHALLOW: &str = "contour-shallow";
    pub const CONTOUR_SAFE: &str = "contour-safe";
    pub const CONTOUR_DEEP: &str = "contour-deep";
    pub const SOUNDING_LABEL: &str = "sounding-label";
}

/// Named color table for one scheme, in stable declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    scheme: ColorScheme,
    entries: IndexMap<String, Color>,
}

impl Palette {
    /// Builds the table for a scheme by dimming the day colors.
    #[must_use]
    pub fn for_scheme(scheme: ColorScheme) -> Self {
        let day: [(&str, Color); 7] = [
            (token::BACKGROUND, Color::rgb(0.93, 0.93, 0.88)),
            (token::WATER, Color::rgb(0.78, 0.87, 0.94)),
            (token::COVERAGE_OUTLINE, Color::rgb(0.55, 0.15, 0.45)),
            (token::CONTOUR_SHALLOW, Color::rgb(0.15, 0.35, 0.70)),
            (token::CONTOUR_SAFE, Color::rgb(0.25, 0.55, 0.75)),
            (token::CONTOUR_DEEP, Color::rgb(0.55, 0.70, 0.82)),
            (token::SOUNDING_LABEL, Color::rgb(0.20, 0.20, 0.25)),
        ];

        let factor = scheme.dim_factor();
        let entries = day
            .into_iter()
            .map(|(name, color)| (name.to_owned(), color.dimmed(factor)))
            .collect();
        Self { scheme, entries }
    }

    #[must_use]
    pub const fn scheme(&self) -> ColorScheme {
        self.scheme
    }

    /// Unknown tokens fall back to the background color so a draw pass can
    /// never fail on palette lookup.
    #[must_use]
    pub fn color(&self, token_name: &str) -> Color {
        self.entries
            .get(token_name)
            .or_else(|| self.entries.get(token::BACKGROUND))
            .copied()
            .unwrap_or(Color::rgb(0.0, 0.0, 0.0))
    }

    #[must_use]
    pub fn tokens(&self) -> impl Iterator<Item = (&str, Color)> {
        self.entries.iter().map(|(name, &color)| (name.as_str(), color))
    }
}
