// Mapping category indices to colors, marker shapes, and legend entries.

use crate::categories::CategoryOrdering;

/// A plain RGB triple. The renderer converts this to its backend's color
/// type; the core never depends on a graphics library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// The discrete marker glyphs the renderer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Square,
    Triangle,
    Diamond,
    Cross,
}

/// The discrete visual vocabulary available to one analysis.
///
/// Palettes are explicit immutable configuration passed into the assigner,
/// never process-wide constants, so concurrent analyses in one process
/// cannot interfere with each other. Both lists must be non-empty. `neutral`
/// colors legend rows that only communicate a marker shape.
#[derive(Debug, Clone)]
pub struct Palette {
    pub colors: Vec<Rgb>,
    pub markers: Vec<MarkerShape>,
    pub neutral: Rgb,
}

impl Default for Palette {
    /// Ten colors (the matplotlib "tab10" cycle the reference plots used)
    /// and five marker shapes.
    fn default() -> Self {
        Self {
            colors: vec![
                Rgb(31, 119, 180),
                Rgb(255, 127, 14),
                Rgb(44, 160, 44),
                Rgb(214, 39, 40),
                Rgb(148, 103, 189),
                Rgb(140, 86, 75),
                Rgb(227, 119, 194),
                Rgb(127, 127, 127),
                Rgb(188, 189, 34),
                Rgb(23, 190, 207),
            ],
            markers: vec![
                MarkerShape::Circle,
                MarkerShape::Square,
                MarkerShape::Triangle,
                MarkerShape::Diamond,
                MarkerShape::Cross,
            ],
            neutral: Rgb(90, 90, 90),
        }
    }
}

/// What a legend row shows next to its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swatch {
    /// A filled color patch (color-category half of the legend).
    Color(Rgb),
    /// A marker glyph in the palette's neutral color (shape-category half).
    Marker(MarkerShape, Rgb),
}

#[derive(Debug, Clone)]
pub struct LegendEntry {
    pub label: String,
    pub swatch: Swatch,
}

#[derive(Debug, Clone)]
pub struct Legend {
    pub title: String,
    pub entries: Vec<LegendEntry>,
}

/// Resolved colors and markers for every category actually present.
///
/// `colors[i]` is the color of color-category `i`, `markers[j]` the marker of
/// shape-category `j`. When a dimension is unlabeled it holds a single
/// default entry, so `style` works uniformly whether or not metadata was
/// supplied.
#[derive(Debug, Clone)]
pub struct AestheticAssignment {
    colors: Vec<Rgb>,
    markers: Vec<MarkerShape>,
    legend: Option<Legend>,
}

impl AestheticAssignment {
    /// The (color, marker) pair for one `(color-index, shape-index)` cell.
    pub fn style(&self, color_index: usize, shape_index: usize) -> (Rgb, MarkerShape) {
        (
            self.colors[color_index % self.colors.len()],
            self.markers[shape_index % self.markers.len()],
        )
    }

    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    pub fn into_legend(self) -> Option<Legend> {
        self.legend
    }
}

/// Maps two category orderings onto a palette.
///
/// Color-category `i` receives `palette.colors[i % P]` and shape-category
/// `j` receives `palette.markers[j % M]`. When categories outnumber palette
/// entries the modulo deliberately aliases later categories onto earlier
/// symbols; this is the accepted degradation for large metadata, not an
/// error, and the repetition pattern is reproducible because the orderings
/// are deterministic.
///
/// The legend carries one entry per color category (a color patch) and,
/// independently, one per shape category (a neutral-colored marker glyph).
/// Unlabeled dimensions contribute no legend half; with both dimensions
/// unlabeled there is no legend and every sample draws with the default
/// color and marker (palette entry 0 of each list).
pub fn assign(
    color_ordering: &CategoryOrdering,
    shape_ordering: &CategoryOrdering,
    palette: &Palette,
) -> AestheticAssignment {
    let n_palette_colors = palette.colors.len();
    let n_palette_markers = palette.markers.len();

    // A labeled column whose values never joined any sample would leave an
    // empty list; fall back to the default entry so `style` stays total.
    let colors: Vec<Rgb> = if color_ordering.is_labeled() && !color_ordering.is_empty() {
        (0..color_ordering.len())
            .map(|i| palette.colors[i % n_palette_colors])
            .collect()
    } else {
        vec![palette.colors[0]]
    };
    let markers: Vec<MarkerShape> = if shape_ordering.is_labeled() && !shape_ordering.is_empty() {
        (0..shape_ordering.len())
            .map(|j| palette.markers[j % n_palette_markers])
            .collect()
    } else {
        vec![palette.markers[0]]
    };

    let title = match (color_ordering.label(), shape_ordering.label()) {
        (Some(group), Some(shape)) => Some(format!("{} (group) / {} (shape)", group, shape)),
        (Some(group), None) => Some(group.to_string()),
        (None, Some(shape)) => Some(shape.to_string()),
        (None, None) => None,
    };
    let legend = title.map(|title| {
        let mut entries = Vec::new();
        if color_ordering.is_labeled() {
            for (i, value) in color_ordering.values().iter().enumerate() {
                entries.push(LegendEntry {
                    label: value.clone(),
                    swatch: Swatch::Color(colors[i]),
                });
            }
        }
        if shape_ordering.is_labeled() {
            for (j, value) in shape_ordering.values().iter().enumerate() {
                entries.push(LegendEntry {
                    label: value.clone(),
                    swatch: Swatch::Marker(markers[j], palette.neutral),
                });
            }
        }
        Legend { title, entries }
    });

    AestheticAssignment {
        colors,
        markers,
        legend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::{CategoryColumn, CategoryOrdering};
    use std::collections::HashMap;

    fn ordering_of(name: &str, values: &[&str]) -> CategoryOrdering {
        // Build through the public path: one sample per distinct value.
        let labels: Vec<String> = (0..values.len()).map(|i| format!("s{}", i)).collect();
        let map: HashMap<String, String> = labels
            .iter()
            .cloned()
            .zip(values.iter().map(|v| v.to_string()))
            .collect();
        let column = CategoryColumn::new(name, map);
        CategoryOrdering::from_samples(&labels, Some(&column))
    }

    fn unlabeled() -> CategoryOrdering {
        CategoryOrdering::from_samples(&["s0".to_string()], None)
    }

    #[test]
    fn distinct_categories_get_distinct_symbols_within_palette() {
        let palette = Palette::default();
        let colors = ordering_of("group", &["B", "A", "C"]);
        let assignment = assign(&colors, &unlabeled(), &palette);

        // B -> palette[0], A -> palette[1], C -> palette[2].
        assert_eq!(assignment.style(0, 0).0, palette.colors[0]);
        assert_eq!(assignment.style(1, 0).0, palette.colors[1]);
        assert_eq!(assignment.style(2, 0).0, palette.colors[2]);
        assert_ne!(assignment.style(0, 0).0, assignment.style(1, 0).0);
    }

    #[test]
    fn categories_beyond_palette_alias_by_modulo() {
        // 20 shape categories against a 15-entry marker palette: indices 15
        // and 0 share a marker.
        let markers: Vec<MarkerShape> = [
            MarkerShape::Circle,
            MarkerShape::Square,
            MarkerShape::Triangle,
            MarkerShape::Diamond,
            MarkerShape::Cross,
        ]
        .into_iter()
        .cycle()
        .take(15)
        .collect();
        let palette = Palette {
            markers,
            ..Palette::default()
        };
        let values: Vec<String> = (0..20).map(|i| format!("v{}", i)).collect();
        let value_refs: Vec<&str> = values.iter().map(String::as_str).collect();
        let shapes = ordering_of("shape", &value_refs);
        let assignment = assign(&unlabeled(), &shapes, &palette);

        assert_eq!(assignment.style(0, 15).1, assignment.style(0, 0).1);
        assert_eq!(assignment.style(0, 16).1, assignment.style(0, 1).1);
        // Reproducible: a second assignment agrees everywhere.
        let again = assign(&unlabeled(), &shapes, &palette);
        for j in 0..20 {
            assert_eq!(assignment.style(0, j), again.style(0, j));
        }
    }

    #[test]
    fn color_aliasing_wraps_the_color_list() {
        let palette = Palette {
            colors: vec![Rgb(1, 0, 0), Rgb(0, 1, 0), Rgb(0, 0, 1)],
            markers: vec![MarkerShape::Circle],
            neutral: Rgb(90, 90, 90),
        };
        let values: Vec<String> = (0..7).map(|i| format!("g{}", i)).collect();
        let value_refs: Vec<&str> = values.iter().map(String::as_str).collect();
        let groups = ordering_of("group", &value_refs);
        let assignment = assign(&groups, &unlabeled(), &palette);
        assert_eq!(assignment.style(3, 0).0, assignment.style(0, 0).0);
        assert_eq!(assignment.style(5, 0).0, assignment.style(2, 0).0);
    }

    #[test]
    fn legend_halves_follow_supplied_columns() {
        let palette = Palette::default();
        let groups = ordering_of("tissue", &["B", "A"]);
        let shapes = ordering_of("batch", &["x", "y", "z"]);

        let both = assign(&groups, &shapes, &palette);
        let legend = both.legend().unwrap();
        assert_eq!(legend.title, "tissue (group) / batch (shape)");
        assert_eq!(legend.entries.len(), 5);
        assert!(matches!(legend.entries[0].swatch, Swatch::Color(_)));
        assert!(matches!(legend.entries[2].swatch, Swatch::Marker(..)));

        let color_only = assign(&groups, &unlabeled(), &palette);
        let legend = color_only.legend().unwrap();
        assert_eq!(legend.title, "tissue");
        assert_eq!(legend.entries.len(), 2);

        let neither = assign(&unlabeled(), &unlabeled(), &palette);
        assert!(neither.legend().is_none());
    }

    #[test]
    fn shape_swatches_carry_the_palette_neutral_color() {
        let palette = Palette {
            neutral: Rgb(10, 20, 30),
            ..Palette::default()
        };
        let shapes = ordering_of("batch", &["x", "y"]);
        let assignment = assign(&unlabeled(), &shapes, &palette);
        let legend = assignment.legend().unwrap();
        assert_eq!(
            legend.entries[0].swatch,
            Swatch::Marker(palette.markers[0], Rgb(10, 20, 30))
        );
        assert_eq!(
            legend.entries[1].swatch,
            Swatch::Marker(palette.markers[1], Rgb(10, 20, 30))
        );
    }

    #[test]
    fn unlabeled_dimensions_use_the_default_symbols() {
        let palette = Palette::default();
        let assignment = assign(&unlabeled(), &unlabeled(), &palette);
        let (color, marker) = assignment.style(0, 0);
        assert_eq!(color, palette.colors[0]);
        assert_eq!(marker, palette.markers[0]);
    }
}
