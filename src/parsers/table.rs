use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, ScrapeError};
use crate::parsers::clean_text;

/// An `<img>` found inside a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub src: String,
    /// Value of the element's key attribute (`data-image-key`), when present.
    pub key: Option<String>,
}

/// One `<td>`/`<th>` with everything the column rules need, detached from the DOM.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCell {
    pub is_header: bool,
    /// Descendant text nodes in document order, untrimmed.
    pub texts: Vec<String>,
    /// Last image in the cell.
    pub image: Option<ImageRef>,
}

impl RawCell {
    pub fn text(text: &str) -> Self {
        Self {
            texts: vec![text.to_string()],
            ..Default::default()
        }
    }

    pub fn header(text: &str) -> Self {
        Self {
            is_header: true,
            texts: vec![text.to_string()],
            image: None,
        }
    }

    pub fn with_image(mut self, src: &str, key: Option<&str>) -> Self {
        self.image = Some(ImageRef {
            src: src.to_string(),
            key: key.map(str::to_string),
        });
        self
    }

    /// Lexicographically greatest text node, trimmed. Captions and labels sort
    /// before the cell's own value on the wiki.
    pub fn max_text(&self) -> String {
        self.texts
            .iter()
            .max()
            .map(|t| t.trim().to_string())
            .unwrap_or_default()
    }

    pub fn full_text(&self) -> String {
        clean_text(&self.texts.concat())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub cells: Vec<RawCell>,
}

impl RawRow {
    pub fn new(cells: Vec<RawCell>) -> Self {
        Self { cells }
    }

    pub fn has_header_cell(&self) -> bool {
        self.cells.iter().any(|c| c.is_header)
    }
}

/// Collect the rows of every table matching `table_selector`, in document order.
///
/// Rows of nested tables are left out. The DOM is dropped before returning,
/// so the result can be held across `.await` points.
pub fn parse_rows(html: &str, table_selector: &str) -> Result<Vec<RawRow>> {
    let document = Html::parse_document(html);
    let table_sel = Selector::parse(table_selector)
        .map_err(|_| ScrapeError::Parse(format!("invalid table selector '{}'", table_selector)))?;
    let row_sel = selector("tr")?;
    let img_sel = selector("img")?;

    let tables: Vec<ElementRef> = document.select(&table_sel).collect();
    if tables.is_empty() {
        return Err(ScrapeError::Parse(format!(
            "selector '{}' matched no tables",
            table_selector
        )));
    }

    let mut rows = Vec::new();
    for table in tables {
        for row in table.select(&row_sel) {
            if nearest_table(row).map(|t| t.id()) != Some(table.id()) {
                continue;
            }
            let cells = row
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|el| matches!(el.value().name(), "td" | "th"))
                .map(|el| read_cell(el, &img_sel))
                .collect();
            rows.push(RawRow::new(cells));
        }
    }

    if rows.is_empty() {
        return Err(ScrapeError::Parse(format!(
            "tables matching '{}' have no rows",
            table_selector
        )));
    }

    Ok(rows)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|_| ScrapeError::Parse(format!("invalid selector '{}'", css)))
}

fn nearest_table(row: ElementRef<'_>) -> Option<ElementRef<'_>> {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "table")
}

fn read_cell(cell: ElementRef<'_>, img_sel: &Selector) -> RawCell {
    let image = cell.select(img_sel).last().and_then(|img| {
        let el = img.value();
        // Lazy-loaded images carry a data: placeholder in src.
        let src = match el.attr("src") {
            Some(src) if !src.starts_with("data:") => Some(src),
            _ => el.attr("data-src"),
        }?;
        Some(ImageRef {
            src: src.to_string(),
            key: el
                .attr("data-image-key")
                .or_else(|| el.attr("data-image-name"))
                .map(str::to_string),
        })
    });

    RawCell {
        is_header: cell.value().name() == "th",
        texts: cell.text().map(str::to_string).collect(),
        image,
    }
}
