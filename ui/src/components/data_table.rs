use crate::components::common::{Capabilities, Component};
use crate::dom::{Document, Element, NodeId, Selector};
use engine::datatable::{DataTable, PageControl, Row, TableOptions};

/// Binds an engine [`DataTable`] to a `<table data-table>` element.
///
/// The table is moved into a `div.datatable-wrapper` holding the search box,
/// the info line and the pagination bar. Destroying the component puts the
/// table and its original rows back.
#[derive(Debug)]
pub struct DataTableComponent {
    document: Document,
    table: NodeId,
    tbody: Option<NodeId>,
    model: DataTable,
    original_rows: Vec<Element>,
    wrapper: Option<NodeId>,
    search_input: Option<NodeId>,
    info: Option<NodeId>,
    pagination: Option<NodeId>,
}

fn flag(document: &Document, node: NodeId, key: &str) -> bool {
    document.data(node, key).as_deref() != Some("false")
}

impl DataTableComponent {
    /// `default_page_size` applies unless the table carries `data-page-size`.
    pub fn new(document: Document, table: NodeId, default_page_size: usize) -> Self {
        let page_size = document
            .data(table, "page-size")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .unwrap_or(default_page_size);
        let options = TableOptions {
            sortable: flag(&document, table, "sortable"),
            searchable: flag(&document, table, "searchable"),
            pagination: flag(&document, table, "pagination"),
            ..TableOptions::default()
        }
        .with_page_size(page_size);

        let tbody = document.query_in(table, &Selector::tag("tbody"));
        let original_rows = tbody
            .and_then(|tbody| document.element(tbody))
            .map(|tbody| tbody.children)
            .unwrap_or_default();
        let rows = Self::extract_rows(&document, tbody);
        log::debug!(
            "Binding data table with {} row(s), page size {}",
            rows.len(),
            options.page_size
        );

        let mut component = Self {
            document,
            table,
            tbody,
            model: DataTable::new(rows, options),
            original_rows,
            wrapper: None,
            search_input: None,
            info: None,
            pagination: None,
        };
        component.create_wrapper();
        component.render();
        component
    }

    fn extract_rows(document: &Document, tbody: Option<NodeId>) -> Vec<Row> {
        let Some(tbody) = tbody else {
            return Vec::new();
        };
        document
            .query_all_in(tbody, &Selector::tag("tr"))
            .into_iter()
            .map(|tr| {
                document
                    .query_all_in(tr, &Selector::tag("td"))
                    .into_iter()
                    .map(|td| document.text(td))
                    .collect()
            })
            .collect()
    }

    fn create_wrapper(&mut self) {
        let options = *self.model.options();
        let Some(wrapper) = self
            .document
            .wrap(self.table, Element::new("div").with_class("datatable-wrapper"))
        else {
            return;
        };
        self.document
            .wrap(self.table, Element::new("div").with_class("datatable-container"));

        let mut top = Element::new("div").with_class("datatable-top");
        if options.searchable {
            top = top.with_child(
                Element::new("div").with_class("datatable-search").with_child(
                    Element::new("input")
                        .with_attr("type", "text")
                        .with_attr("placeholder", "Search...")
                        .with_class("form-control"),
                ),
            );
        }
        self.document.prepend_child(wrapper, top);

        if options.pagination {
            self.document.append_child(
                wrapper,
                Element::new("div")
                    .with_class("datatable-bottom")
                    .with_child(Element::new("div").with_class("datatable-info"))
                    .with_child(Element::new("div").with_class("datatable-pagination")),
            );
        }

        let find = |class: &str| self.document.query_in(wrapper, &Selector::class(class));
        self.search_input = find("datatable-search")
            .and_then(|search| self.document.query_in(search, &Selector::tag("input")));
        self.info = find("datatable-info");
        self.pagination = find("datatable-pagination");
        self.wrapper = Some(wrapper);
    }

    pub fn model(&self) -> &DataTable {
        &self.model
    }

    pub fn table(&self) -> NodeId {
        self.table
    }

    pub fn search_input(&self) -> Option<NodeId> {
        self.search_input
    }

    pub fn on_search_input(&mut self, query: &str) {
        if !self.model.options().searchable {
            return;
        }
        if let Some(input) = self.search_input {
            self.document.set_value(input, query);
        }
        self.model.search(query);
        self.render();
    }

    pub fn on_header_click(&mut self, column: usize) {
        if !self.model.options().sortable {
            return;
        }
        self.model.sort(column);
        self.update_sort_indicators();
        self.render();
    }

    /// `data-page` of a clicked pagination link: `prev`, `next` or a number.
    pub fn on_pagination_click(&mut self, page: &str) {
        match page {
            "prev" => {
                self.model.previous_page();
            }
            "next" => {
                self.model.next_page();
            }
            other => match other.parse::<usize>() {
                Ok(number) => self.model.go_to_page(number),
                Err(_) => return,
            },
        }
        self.render();
    }

    /// Replace the row snapshot and reset search, sort and page.
    /// Re-read the rows from the table body after the markup changed
    /// underneath the component; clears search and sort.
    pub fn refresh(&mut self) {
        self.original_rows = self
            .tbody
            .and_then(|tbody| self.document.element(tbody))
            .map(|tbody| tbody.children)
            .unwrap_or_default();
        let rows = Self::extract_rows(&self.document, self.tbody);
        log::debug!("Refreshing data table with {} row(s)", rows.len());
        self.model.refresh(rows);
        if let Some(input) = self.search_input {
            self.document.set_value(input, "");
        }
        self.update_sort_indicators();
        self.render();
    }

    fn headers(&self) -> Vec<NodeId> {
        self.document
            .query_in(self.table, &Selector::tag("thead"))
            .map(|thead| self.document.query_all_in(thead, &Selector::tag("th")))
            .unwrap_or_default()
    }

    fn update_sort_indicators(&self) {
        let active = self.model.sort_column();
        let class = self.model.sort_direction().css_class();
        for (index, header) in self.headers().into_iter().enumerate() {
            self.document.remove_class(header, "sort-asc");
            self.document.remove_class(header, "sort-desc");
            if active == Some(index) {
                self.document.add_class(header, class);
            }
        }
    }

    fn render(&self) {
        self.render_rows();
        if self.model.options().pagination {
            self.render_pagination();
            self.render_info();
        }
    }

    fn render_rows(&self) {
        let Some(tbody) = self.tbody else {
            return;
        };
        let rows = self.model.visible_rows().into_iter().map(|row| {
            Element::new("tr")
                .with_children(row.iter().map(|cell| Element::new("td").with_text(cell)))
        });
        self.document.replace_children(tbody, rows.collect());
    }

    fn render_pagination(&self) {
        let Some(pagination) = self.pagination else {
            return;
        };
        let controls = self.model.page_controls();
        if controls.is_empty() {
            self.document.replace_children(pagination, Vec::new());
            return;
        }

        let items = controls.into_iter().map(|control| {
            let (label, page, state) = match control {
                PageControl::Previous { disabled } => {
                    ("Previous".to_string(), "prev".to_string(), disabled.then_some("disabled"))
                }
                PageControl::Page { number, active } => {
                    (number.to_string(), number.to_string(), active.then_some("active"))
                }
                PageControl::Next { disabled } => {
                    ("Next".to_string(), "next".to_string(), disabled.then_some("disabled"))
                }
            };
            let mut item = Element::new("li").with_class("page-item");
            if let Some(state) = state {
                item = item.with_class(state);
            }
            item.with_child(
                Element::new("a")
                    .with_class("page-link")
                    .with_attr("href", "#")
                    .with_attr("data-page", &page)
                    .with_text(&label),
            )
        });
        let nav = Element::new("nav")
            .with_child(Element::new("ul").with_class("pagination").with_children(items));
        self.document.replace_children(pagination, vec![nav]);
    }

    fn render_info(&self) {
        if let Some(info) = self.info {
            self.document
                .set_text(info, &self.model.page_info().to_string());
        }
    }
}

impl Component for DataTableComponent {
    fn capabilities(&self) -> Capabilities {
        Capabilities::DESTROY
    }

    fn destroy(&mut self) {
        if let Some(tbody) = self.tbody {
            self.document
                .replace_children(tbody, std::mem::take(&mut self.original_rows));
        }
        for header in self.headers() {
            self.document.remove_class(header, "sort-asc");
            self.document.remove_class(header, "sort-desc");
        }
        if let Some(wrapper) = self.wrapper.take() {
            self.document.unwrap(wrapper, self.table);
        }
        self.search_input = None;
        self.info = None;
        self.pagination = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::*;

    fn table(rows: &[(&str, &str)]) -> Element {
        Element::new("table")
            .with_attr("data-table", "")
            .with_child(Element::new("thead").with_child(
                Element::new("tr")
                    .with_child(Element::new("th").with_text("Name"))
                    .with_child(Element::new("th").with_text("Salary")),
            ))
            .with_child(Element::new("tbody").with_children(rows.iter().map(|(name, salary)| {
                Element::new("tr")
                    .with_child(Element::new("td").with_text(name))
                    .with_child(Element::new("td").with_text(salary))
            })))
    }

    fn bind(element: Element, page_size: usize) -> (Document, DataTableComponent) {
        let doc = Document::from_body(Element::new("body").with_child(element));
        let node = assert_some!(doc.query(&Selector::attr("data-table")));
        let component = DataTableComponent::new(doc.clone(), node, page_size);
        (doc, component)
    }

    fn body_names(doc: &Document) -> Vec<String> {
        let tbody = assert_some!(doc.query(&Selector::tag("tbody")));
        doc.query_all_in(tbody, &Selector::tag("tr"))
            .into_iter()
            .filter_map(|tr| doc.query_in(tr, &Selector::tag("td")))
            .map(|td| doc.text(td))
            .collect()
    }

    #[test]
    fn test_wraps_table_and_renders_first_page() {
        let (doc, component) = bind(
            table(&[("Carol", "300"), ("Alice", "100"), ("Bob", "200")]),
            2,
        );
        let wrapper = assert_some!(doc.query(&Selector::class("datatable-wrapper")));
        let container = assert_some!(doc.query_in(wrapper, &Selector::class("datatable-container")));
        assert!(doc.contains(container, component.table()));
        assert_some!(component.search_input());

        assert_eq!(body_names(&doc), vec!["Carol", "Alice"]);
        let info = assert_some!(doc.query(&Selector::class("datatable-info")));
        assert_eq!(doc.text(info), "Showing 1 to 2 of 3 entries");
        let links = doc.query_all(&Selector::class("page-link"));
        let pages: Vec<String> = links.iter().filter_map(|l| doc.data(*l, "page")).collect();
        assert_eq!(pages, vec!["prev", "1", "2", "next"]);
    }

    #[test]
    fn test_header_click_sorts_and_marks_header() {
        let (doc, mut component) = bind(
            table(&[("Carol", "1,000"), ("Alice", "900"), ("Bob", "50")]),
            10,
        );
        component.on_header_click(1);
        assert_eq!(body_names(&doc), vec!["Bob", "Alice", "Carol"]);

        component.on_header_click(1);
        assert_eq!(body_names(&doc), vec!["Carol", "Alice", "Bob"]);
        let headers = doc.query_all(&Selector::tag("th"));
        assert!(doc.has_class(headers[1], "sort-desc"));
        assert!(!doc.has_class(headers[0], "sort-asc"));
    }

    #[test]
    fn test_search_and_pagination_clicks() {
        let rows: Vec<(String, String)> = (1..=25)
            .map(|i| (format!("Person {i:02}"), (i * 10).to_string()))
            .collect();
        let refs: Vec<(&str, &str)> = rows.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
        let (doc, mut component) = bind(table(&refs), 10);

        component.on_pagination_click("next");
        assert_eq!(component.model().current_page(), 2);
        component.on_pagination_click("3");
        assert_eq!(body_names(&doc).len(), 5);
        component.on_pagination_click("bogus");
        assert_eq!(component.model().current_page(), 3);

        component.on_search_input("person 1");
        assert_eq!(component.model().current_page(), 1);
        assert_eq!(component.model().filtered_len(), 10);
        let info = assert_some!(doc.query(&Selector::class("datatable-info")));
        assert_eq!(doc.text(info), "Showing 1 to 10 of 10 entries");
        assert!(doc.query_all(&Selector::class("page-link")).is_empty());
    }

    #[test]
    fn test_page_size_attribute_wins() {
        let element = table(&[("a", "1"), ("b", "2"), ("c", "3")]).with_attr("data-page-size", "1");
        let (doc, component) = bind(element, 10);
        assert_eq!(component.model().options().page_size, 1);
        assert_eq!(body_names(&doc), vec!["a"]);
    }

    #[test]
    fn test_refresh_picks_up_external_rows() {
        let (doc, mut component) = bind(table(&[("b", "2"), ("a", "1"), ("c", "3")]), 10);
        component.on_header_click(0);

        let tbody = assert_some!(doc.query(&Selector::tag("tbody")));
        doc.append_child(
            tbody,
            Element::new("tr")
                .with_child(Element::new("td").with_text("d"))
                .with_child(Element::new("td").with_text("4")),
        );
        component.refresh();

        assert_eq!(component.model().filtered_len(), 4);
        assert_eq!(component.model().current_page(), 1);
        assert_none!(component.model().sort_column());
        assert_eq!(body_names(&doc), vec!["a", "b", "c", "d"]);

        component.destroy();
        assert_eq!(body_names(&doc), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_destroy_restores_table() {
        let (doc, mut component) = bind(table(&[("b", "2"), ("a", "1")]), 1);
        component.on_header_click(0);
        component.destroy();

        assert_none!(doc.query(&Selector::class("datatable-wrapper")));
        let table = assert_some!(doc.query(&Selector::attr("data-table")));
        assert_eq!(doc.parent(table), Some(doc.body()));
        assert_eq!(body_names(&doc), vec!["b", "a"]);
    }
}
