//! Client-side table model: an immutable row snapshot with live search,
//! single-column sort and fixed-size pagination on top.
//!
//! The model never touches markup. The `ui` crate extracts rows from the
//! document, feeds them in through [`DataTable::new`] / [`DataTable::refresh`],
//! and renders whatever [`DataTable::visible_rows`] returns.

pub mod compare;
pub mod pagination;

pub use compare::{CompareMode, locale_compare, numeric_value};
pub use pagination::{PageControl, PageInfo};

use serde::{Deserialize, Serialize};

/// One table row: cell contents in column order.
pub type Row = Vec<String>;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Feature flags and page size of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOptions {
    pub sortable: bool,
    pub searchable: bool,
    pub pagination: bool,
    pub page_size: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            sortable: true,
            searchable: true,
            pagination: true,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl TableOptions {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// CSS class of a header sorted in this direction.
    pub fn css_class(self) -> &'static str {
        match self {
            SortDirection::Asc => "sort-asc",
            SortDirection::Desc => "sort-desc",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DataTable {
    options: TableOptions,
    rows: Vec<Row>,
    /// Indices into `rows`, in display order.
    filtered: Vec<usize>,
    query: String,
    current_page: usize,
    sort_column: Option<usize>,
    sort_direction: SortDirection,
}

impl DataTable {
    pub fn new(rows: Vec<Row>, options: TableOptions) -> Self {
        let options = TableOptions {
            page_size: options.page_size.max(1),
            ..options
        };
        let filtered = (0..rows.len()).collect();
        Self {
            options,
            rows,
            filtered,
            query: String::new(),
            current_page: 1,
            sort_column: None,
            sort_direction: SortDirection::Asc,
        }
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn sort_column(&self) -> Option<usize> {
        self.sort_column
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Rows matching the active search, in display order.
    pub fn filtered_rows(&self) -> Vec<&Row> {
        self.filtered.iter().map(|&i| &self.rows[i]).collect()
    }

    pub fn total_pages(&self) -> usize {
        pagination::total_pages(self.filtered.len(), self.options.page_size)
    }

    /// Live filter. Empty query restores the full snapshot; otherwise keeps
    /// rows where any cell contains the query, case-insensitively. The
    /// active sort, if any, is re-applied and the page resets to 1.
    pub fn search(&mut self, query: &str) {
        self.query = query.to_string();
        self.filtered = if query.is_empty() {
            (0..self.rows.len()).collect()
        } else {
            let needle = query.to_lowercase();
            self.rows
                .iter()
                .enumerate()
                .filter(|(_, row)| row.iter().any(|cell| cell.to_lowercase().contains(&needle)))
                .map(|(i, _)| i)
                .collect()
        };

        if let Some(column) = self.sort_column {
            self.apply_sort(column);
        }
        self.current_page = 1;
    }

    /// Sort by `column`. The same column toggles direction; a new column
    /// starts ascending. Missing cells compare as empty strings.
    pub fn sort(&mut self, column: usize) {
        if self.sort_column == Some(column) {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_column = Some(column);
            self.sort_direction = SortDirection::Asc;
        }
        self.apply_sort(column);
        self.clamp_page();
    }

    fn apply_sort(&mut self, column: usize) {
        let rows = &self.rows;
        let cell = |i: usize| rows[i].get(column).map(String::as_str).unwrap_or("");

        let mode = CompareMode::for_cells(self.filtered.iter().map(|&i| cell(i)));

        // Ties fall back to snapshot order, so descending is the exact
        // reverse of ascending.
        self.filtered
            .sort_by(|&a, &b| mode.compare(cell(a), cell(b)).then(a.cmp(&b)));
        if self.sort_direction == SortDirection::Desc {
            self.filtered.reverse();
        }
    }

    /// Jump to `page`, clamped into the valid range.
    pub fn go_to_page(&mut self, page: usize) {
        self.current_page = pagination::clamp_page(page, self.total_pages());
    }

    pub fn next_page(&mut self) -> bool {
        if self.current_page < self.total_pages() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    pub fn previous_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    fn clamp_page(&mut self) {
        self.current_page = pagination::clamp_page(self.current_page, self.total_pages());
    }

    /// Rows of `page` in display order.
    pub fn page_rows(&self, page: usize) -> Vec<&Row> {
        let (start, end) = pagination::page_bounds(page, self.options.page_size, self.filtered.len());
        self.filtered[start..end].iter().map(|&i| &self.rows[i]).collect()
    }

    /// Rows to render: the current page, or everything when pagination is off.
    pub fn visible_rows(&self) -> Vec<&Row> {
        if self.options.pagination {
            self.page_rows(self.current_page)
        } else {
            self.filtered_rows()
        }
    }

    pub fn page_controls(&self) -> Vec<PageControl> {
        pagination::page_controls(self.current_page, self.total_pages())
    }

    pub fn page_info(&self) -> PageInfo {
        PageInfo::new(self.current_page, self.options.page_size, self.filtered.len())
    }

    /// Replace the snapshot with freshly extracted rows and reset the view.
    pub fn refresh(&mut self, rows: Vec<Row>) {
        self.filtered = (0..rows.len()).collect();
        self.rows = rows;
        self.query.clear();
        self.current_page = 1;
        self.sort_column = None;
        self.sort_direction = SortDirection::Asc;
    }
}
