//! Page fixtures: a serialized `<body>` the runtime can be pointed at.

use crate::app::page_loader::PageType;
use crate::dom::{Document, Element};
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageFixture {
    /// Written to `data-page` on the body when set.
    #[serde(default)]
    pub page: Option<String>,
    pub body: Element,
}

impl PageFixture {
    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Cannot read page file '{}': {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    pub fn into_document(self) -> Document {
        let mut body = self.body;
        body.tag = "body".to_string();
        if let Some(page) = self.page {
            body.attributes.insert("data-page".to_string(), page);
        }
        Document::from_body(body)
    }

    /// A complete dashboard shell with content for `page`.
    pub fn sample(page: PageType) -> Self {
        let content = match page {
            PageType::Dashboard => sample_dashboard(),
            PageType::Charts => sample_charts(),
            PageType::Tables => sample_tables(),
            PageType::Forms => sample_forms(),
            PageType::Default => Element::new("div").with_class("content"),
        };
        Self {
            page: Some(page.as_str().to_string()),
            body: Element::new("body")
                .with_child(sample_sidebar())
                .with_child(sample_header())
                .with_child(Element::new("main").with_class("main-content").with_child(content)),
        }
    }
}

fn sample_sidebar() -> Element {
    let link = |page: &str, label: &str| {
        Element::new("li").with_child(
            Element::new("a")
                .with_class("nav-link")
                .with_attr("href", &format!("{page}.html"))
                .with_attr("data-page", page)
                .with_text(label),
        )
    };
    Element::new("aside").with_id("sidebar").with_class("sidebar").with_child(
        Element::new("ul")
            .with_class("sidebar-nav")
            .with_child(link("dashboard", "Dashboard"))
            .with_child(link("charts", "Charts"))
            .with_child(link("tables", "Tables"))
            .with_child(link("forms", "Forms")),
    )
}

fn sample_header() -> Element {
    Element::new("header")
        .with_child(Element::new("button").with_id("sidebarToggleDesktop"))
        .with_child(
            Element::new("button")
                .with_id("sidebarToggle")
                .with_child(Element::new("i").with_class("fa fa-bars")),
        )
        .with_child(Element::new("button").with_id("searchToggle"))
        .with_child(
            Element::new("form")
                .with_class("search-form d-none")
                .with_child(Element::new("input").with_attr("type", "search"))
                .with_child(Element::new("button").with_id("searchClose")),
        )
        .with_child(
            Element::new("button")
                .with_attr("data-theme-toggle", "")
                .with_child(Element::new("i").with_class("fa fa-moon")),
        )
        .with_child(
            Element::new("div")
                .with_class("user-area dropdown")
                .with_child(Element::new("a").with_class("dropdown-toggle")),
        )
        .with_child(
            Element::new("div")
                .with_class("user-menu")
                .with_child(Element::new("a").with_class("nav-link").with_attr("data-action", "profile"))
                .with_child(Element::new("a").with_class("nav-link").with_attr("data-action", "logout")),
        )
}

fn sample_dashboard() -> Element {
    let stat = |value: &str, label: &str| {
        Element::new("div")
            .with_class("stat-widget")
            .with_child(Element::new("span").with_class("count").with_text(value))
            .with_child(Element::new("div").with_class("stat-text").with_text(label))
    };
    Element::new("div")
        .with_class("content")
        .with_child(stat("23569", "Revenue"))
        .with_child(stat("3435", "Sales"))
        .with_child(Element::new("canvas").with_id("widgetChart1"))
        .with_child(Element::new("canvas").with_id("widgetChart2"))
        .with_child(Element::new("canvas").with_id("widgetChart3"))
        .with_child(Element::new("canvas").with_id("widgetChart4"))
}

fn sample_charts() -> Element {
    Element::new("div")
        .with_class("content")
        .with_child(Element::new("canvas").with_id("lineChart").with_attr("data-chart", "line"))
        .with_child(Element::new("canvas").with_id("barChart").with_attr("data-chart", "bar"))
        .with_child(Element::new("canvas").with_id("pieChart").with_attr("data-chart", "pie"))
}

fn sample_tables() -> Element {
    const PEOPLE: [(&str, &str, &str, &str); 12] = [
        ("Tiger Nixon", "System Architect", "Edinburgh", "$320,800"),
        ("Garrett Winters", "Accountant", "Tokyo", "$170,750"),
        ("Ashton Cox", "Junior Technical Author", "San Francisco", "$86,000"),
        ("Cedric Kelly", "Senior Javascript Developer", "Edinburgh", "$433,060"),
        ("Airi Satou", "Accountant", "Tokyo", "$162,700"),
        ("Brielle Williamson", "Integration Specialist", "New York", "$372,000"),
        ("Herrod Chandler", "Sales Assistant", "San Francisco", "$137,500"),
        ("Rhona Davidson", "Integration Specialist", "Tokyo", "$327,900"),
        ("Colleen Hurst", "Javascript Developer", "San Francisco", "$205,500"),
        ("Sonya Frost", "Software Engineer", "Edinburgh", "$103,600"),
        ("Jena Gaines", "Office Manager", "London", "$90,560"),
        ("Quinn Flynn", "Support Lead", "Edinburgh", "$342,000"),
    ];
    let header = Element::new("tr").with_children(
        ["Name", "Position", "Office", "Salary"]
            .iter()
            .map(|title| Element::new("th").with_text(title)),
    );
    let rows = PEOPLE.iter().map(|(name, position, office, salary)| {
        Element::new("tr").with_children(
            [name, position, office, salary]
                .iter()
                .map(|cell| Element::new("td").with_text(cell)),
        )
    });
    Element::new("div").with_class("content").with_child(
        Element::new("table")
            .with_class("table")
            .with_attr("data-table", "")
            .with_child(Element::new("thead").with_child(header))
            .with_child(Element::new("tbody").with_children(rows)),
    )
}

fn sample_forms() -> Element {
    let group = |id: &str, label: &str, rules: &str| {
        Element::new("div")
            .with_class("mb-3")
            .with_child(Element::new("label").with_attr("for", id).with_text(label))
            .with_child(
                Element::new("input")
                    .with_id(id)
                    .with_attr("name", id)
                    .with_class("form-control")
                    .with_attr("data-validate", rules),
            )
    };
    Element::new("div").with_class("content").with_child(
        Element::new("form")
            .with_attr("data-validate", "")
            .with_child(group("name", "Full name *", "required|min:2"))
            .with_child(group("email", "Email *", "required|email"))
            .with_child(group("password", "Password *", "required|min:8"))
            .with_child(group("password_confirmation", "Confirm password", "confirmed:password")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Selector;
    use claims::*;

    #[test]
    fn test_from_json_sets_page() {
        let fixture = assert_ok!(PageFixture::from_json(
            r#"{"page":"tables","body":{"tag":"body","children":[{"tag":"table","attributes":{"data-table":""}}]}}"#
        ));
        let doc = fixture.into_document();
        assert_eq!(PageType::from_document(&doc), PageType::Tables);
        assert_some!(doc.query(&Selector::attr("data-table")));
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert_err!(PageFixture::from_json("{"));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = assert_ok!(tempfile::tempdir());
        let result = PageFixture::load(&dir.path().join("absent.json"));
        assert_matches!(result, Err(AppError::Config(_)));
    }

    #[test]
    fn test_sample_pages_carry_their_type() {
        for page in [PageType::Dashboard, PageType::Charts, PageType::Tables, PageType::Forms] {
            let doc = PageFixture::sample(page).into_document();
            assert_eq!(PageType::from_document(&doc), page);
            assert_some!(doc.get_element_by_id("sidebar"));
        }
    }
}
