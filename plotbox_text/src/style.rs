// Copyright 2025 the Plotbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font selection as far as measurement cares about it.

use alloc::sync::Arc;

/// Size, family, weight and slant of a run of text.
///
/// Colors and decorations belong to marks, not here: two runs that differ only in paint
/// measure the same.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Size in pixels.
    pub font_size: f64,
    /// Family to measure with.
    pub font_family: FontFamily,
    /// Weight.
    pub font_weight: FontWeight,
    /// Slant.
    pub font_style: FontStyle,
}

impl TextStyle {
    /// Regular sans-serif text of the given size.
    #[must_use]
    pub fn new(font_size: f64) -> Self {
        Self {
            font_size,
            font_family: FontFamily::SansSerif,
            font_weight: FontWeight::NORMAL,
            font_style: FontStyle::Normal,
        }
    }

    /// Replaces the size.
    #[must_use]
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Replaces the family.
    #[must_use]
    pub fn with_family(mut self, family: FontFamily) -> Self {
        self.font_family = family;
        self
    }

    /// Replaces the weight.
    #[must_use]
    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = weight;
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(12.0)
    }
}

/// A font family, either one of the CSS generic families or a name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// `serif`.
    Serif,
    /// `sans-serif`.
    SansSerif,
    /// `monospace`.
    Monospace,
    /// Any other family name.
    Named(Arc<str>),
}

impl FontFamily {
    /// The family as written in a CSS `font-family` declaration.
    #[must_use]
    pub fn css_name(&self) -> &str {
        match self {
            Self::Serif => "serif",
            Self::SansSerif => "sans-serif",
            Self::Monospace => "monospace",
            Self::Named(name) => name,
        }
    }

    /// The first usable entry of a CSS family list such as `Helvetica,"sans-serif"`.
    ///
    /// Quotes are stripped. An empty list gives [`FontFamily::SansSerif`].
    #[must_use]
    pub fn from_css_list(list: &str) -> Self {
        fn unquote(name: &str) -> &str {
            let name = name.trim();
            name.strip_prefix('"')
                .and_then(|n| n.strip_suffix('"'))
                .or_else(|| name.strip_prefix('\'').and_then(|n| n.strip_suffix('\'')))
                .unwrap_or(name)
                .trim()
        }
        match list.split(',').map(unquote).find(|name| !name.is_empty()) {
            None | Some("sans-serif") => Self::SansSerif,
            Some("serif") => Self::Serif,
            Some("monospace") => Self::Monospace,
            Some(name) => Self::Named(Arc::from(name)),
        }
    }
}

/// A numeric CSS font weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// `400`.
    pub const NORMAL: Self = Self(400);
    /// `700`.
    pub const BOLD: Self = Self(700);
}

/// Upright or slanted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Upright.
    Normal,
    /// Italic.
    Italic,
    /// Oblique.
    Oblique,
}
