//! Terminal preview of a theme's color ramps.
//!
//! [`SwatchGrid`] snapshots the computed ramp values from a document and
//! renders them as a grid, one row per ramp. Colored output paints each cell
//! with the nearest ANSI-256 color; plain output prints the raw values.
//!
//! ```rust
//! use element_themes::document::{MemoryDocument, StaticFetcher, StylesheetLink};
//! use element_themes::preview::SwatchGrid;
//! use element_themes::{ColorLevel, StylesheetAttacher};
//! use futures::executor::block_on;
//!
//! let doc = MemoryDocument::new(
//!     StaticFetcher::new().with_sheet("bayer.theme.css", ":root { --primary-400: #10384f }"),
//! );
//! block_on(doc.attach(StylesheetLink {
//!     id: "theme-bayer".into(),
//!     href: "https://cdn/bayer.theme.css".into(),
//! }))
//! .unwrap();
//!
//! let grid = SwatchGrid::capture(&doc, &[ColorLevel::L400]);
//! let plain = grid.render(false);
//! assert!(plain.contains("#10384f"));
//! ```

use console::Style;

use crate::catalog::{ColorLevel, ColorRamp};
use crate::document::Document;
use crate::loader::computed_value;
use crate::util::{pad_to_width, parse_css_color, rgb_to_ansi256};

const SWATCH: &str = "███";
const MISSING: &str = "·";
const COLORED_CELL_WIDTH: usize = 5;
const PLAIN_CELL_WIDTH: usize = 10;

/// Computed ramp values captured from a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwatchGrid {
    levels: Vec<ColorLevel>,
    rows: Vec<(ColorRamp, Vec<Option<String>>)>,
}

impl SwatchGrid {
    /// Reads every ramp at `levels` from `document`.
    ///
    /// An empty `levels` slice captures all levels.
    pub fn capture<D: Document + ?Sized>(document: &D, levels: &[ColorLevel]) -> Self {
        let levels = if levels.is_empty() {
            ColorLevel::ALL.to_vec()
        } else {
            levels.to_vec()
        };
        let rows = ColorRamp::ALL
            .into_iter()
            .map(|ramp| {
                let values = levels
                    .iter()
                    .map(|level| computed_value(Some(document), ramp, *level))
                    .collect();
                (ramp, values)
            })
            .collect();
        Self { levels, rows }
    }

    pub fn levels(&self) -> &[ColorLevel] {
        &self.levels
    }

    /// The captured value for one cell.
    pub fn value(&self, ramp: ColorRamp, level: ColorLevel) -> Option<&str> {
        let column = self.levels.iter().position(|l| *l == level)?;
        self.rows
            .iter()
            .find(|(r, _)| *r == ramp)?
            .1
            .get(column)?
            .as_deref()
    }

    /// Number of cells with a captured value.
    pub fn resolved_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|(_, values)| values.iter())
            .filter(|value| value.is_some())
            .count()
    }

    /// Renders the grid, with a header row of level tokens.
    ///
    /// With `colored`, cells are painted swatches (forced, regardless of
    /// terminal detection) and values that are not plain RGB colors render
    /// as `?`. Without it, cells show the raw values.
    pub fn render(&self, colored: bool) -> String {
        let label_width = self
            .rows
            .iter()
            .map(|(ramp, _)| ramp.as_str().len())
            .max()
            .unwrap_or(0)
            + 2;
        let cell_width = if colored {
            COLORED_CELL_WIDTH
        } else {
            PLAIN_CELL_WIDTH
        };

        let mut out = pad_to_width("", label_width);
        for level in &self.levels {
            out.push_str(&pad_to_width(level.as_str(), cell_width));
        }
        let mut out = out.trim_end().to_string();
        out.push('\n');

        for (ramp, values) in &self.rows {
            let mut line = pad_to_width(ramp.as_str(), label_width);
            for value in values {
                let cell = match value.as_deref() {
                    None => pad_to_width(MISSING, cell_width),
                    Some(value) if colored => swatch(value, cell_width),
                    Some(value) => pad_to_width(value, cell_width),
                };
                line.push_str(&cell);
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

fn swatch(value: &str, cell_width: usize) -> String {
    match parse_css_color(value) {
        Some(rgb) => {
            let style = Style::new()
                .color256(rgb_to_ansi256(rgb))
                .force_styling(true);
            let padding = pad_to_width("", cell_width.saturating_sub(SWATCH.chars().count()));
            format!("{}{}", style.apply_to(SWATCH), padding)
        }
        None => pad_to_width("?", cell_width),
    }
}
