// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use hashbrown::HashMap;
use peniko::Color;
use peniko::color::palette::css;

/// The ten-color categorical scheme (`category10`).
pub const CATEGORY10: [Color; 10] = [
    Color::from_rgb8(0x1f, 0x77, 0xb4),
    Color::from_rgb8(0xff, 0x7f, 0x0e),
    Color::from_rgb8(0x2c, 0xa0, 0x2c),
    Color::from_rgb8(0xd6, 0x27, 0x28),
    Color::from_rgb8(0x94, 0x67, 0xbd),
    Color::from_rgb8(0x8c, 0x56, 0x4b),
    Color::from_rgb8(0xe3, 0x77, 0xc2),
    Color::from_rgb8(0x7f, 0x7f, 0x7f),
    Color::from_rgb8(0xbc, 0xbd, 0x22),
    Color::from_rgb8(0x17, 0xbe, 0xcf),
];

/// Maps category names to colors by their position in a fixed, ordered name list.
///
/// A category at position `i` gets `colors[i % colors.len()]`, so colors are stable for
/// a given list and cycle once there are more categories than colors.
#[derive(Clone, Debug)]
pub struct CategoryPalette {
    names: Vec<String>,
    lookup: HashMap<String, usize>,
    colors: Vec<Color>,
    fallback: Color,
}

impl CategoryPalette {
    /// Color for points without a known category.
    pub const FALLBACK: Color = css::WHITE;

    /// Creates a palette over `names` using [`CATEGORY10`].
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut lookup = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            // First occurrence wins, like a linear `indexOf`.
            lookup.entry(name.clone()).or_insert(i);
        }
        Self {
            names,
            lookup,
            colors: CATEGORY10.to_vec(),
            fallback: Self::FALLBACK,
        }
    }

    /// Replaces the color cycle. An empty list makes every category use the fallback.
    pub fn with_colors(mut self, colors: impl Into<Vec<Color>>) -> Self {
        self.colors = colors.into();
        self
    }

    /// Sets the color for unknown or missing categories.
    pub fn with_fallback(mut self, fallback: Color) -> Self {
        self.fallback = fallback;
        self
    }

    /// The ordered category names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The color cycle.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Position of `category` in the name list.
    pub fn index_of(&self, category: &str) -> Option<usize> {
        self.lookup.get(category).copied()
    }

    /// Color for a point's main category.
    pub fn color_for(&self, category: Option<&str>) -> Color {
        let Some(i) = category.and_then(|c| self.index_of(c)) else {
            return self.fallback;
        };
        if self.colors.is_empty() {
            return self.fallback;
        }
        self.colors[i % self.colors.len()]
    }
}

impl Default for CategoryPalette {
    fn default() -> Self {
        Self::new(core::iter::empty::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_cycle_past_palette_size() {
        let names: Vec<String> = (0..12).map(|i| format!("c{i}")).collect();
        let palette = CategoryPalette::new(names);
        assert_eq!(palette.color_for(Some("c0")), CATEGORY10[0]);
        assert_eq!(palette.color_for(Some("c9")), CATEGORY10[9]);
        assert_eq!(palette.color_for(Some("c10")), CATEGORY10[0]);
        assert_eq!(palette.color_for(Some("c11")), CATEGORY10[1]);
    }

    #[test]
    fn unknown_and_missing_categories_fall_back() {
        let palette = CategoryPalette::new(["a"]);
        assert_eq!(palette.color_for(Some("zzz")), CategoryPalette::FALLBACK);
        assert_eq!(palette.color_for(None), CategoryPalette::FALLBACK);
    }

    #[test]
    fn duplicate_names_keep_first_position() {
        let palette = CategoryPalette::new(["a", "b", "a"]);
        assert_eq!(palette.index_of("a"), Some(0));
    }

    #[test]
    fn empty_color_list_uses_fallback() {
        let palette = CategoryPalette::new(["a"]).with_colors(Vec::new());
        assert_eq!(palette.color_for(Some("a")), CategoryPalette::FALLBACK);
    }
}
