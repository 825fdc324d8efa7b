use claims::*;
use engine::settings::SettingsStore;
use sufee::app::application::{App, AppOptions};
use sufee::app::page_loader::PageType;
use sufee::components::data_table::DataTableComponent;
use sufee::components::form_validator::{ERROR_SUMMARY_TITLE, FormValidatorComponent};
use sufee::components::widgets::WidgetManager;
use sufee::dom::{Document, Selector};
use sufee::fixture::PageFixture;

async fn loaded(page: PageType) -> (Document, App) {
    let document = PageFixture::sample(page).into_document();
    let mut app = App::new(document.clone(), SettingsStore::in_memory(), AppOptions::default());
    app.init();
    app.wait_for_page_components().await;
    (document, app)
}

fn body_rows(doc: &Document, table: &DataTableComponent) -> Vec<String> {
    let tbody = doc
        .query_in(table.table(), &Selector::tag("tbody"))
        .expect("table has a body");
    doc.children(tbody)
        .into_iter()
        .map(|row| {
            let cells = doc.children(row);
            doc.text(cells[0])
        })
        .collect()
}

#[tokio::test]
async fn test_people_table_search_sort_and_paging() {
    let (doc, mut app) = loaded(PageType::Tables).await;

    let table = assert_some!(app.get::<DataTableComponent>("table-0"));
    assert_eq!(table.model().page_info().to_string(), "Showing 1 to 10 of 12 entries");
    assert_eq!(body_rows(&doc, table).len(), 10);
    assert_some!(doc.query(&Selector::class("datatable-container")));
    let info = assert_some!(doc.query(&Selector::class("datatable-info")));
    assert_eq!(doc.text(info), "Showing 1 to 10 of 12 entries");

    let table = assert_some!(app.get_mut::<DataTableComponent>("table-0"));
    table.on_pagination_click("2");
    assert_eq!(body_rows(&doc, table), vec!["Jena Gaines", "Quinn Flynn"]);
    assert_eq!(doc.text(info), "Showing 11 to 12 of 12 entries");

    table.on_search_input("tokyo");
    assert_eq!(table.model().current_page(), 1);
    assert_eq!(
        body_rows(&doc, table),
        vec!["Garrett Winters", "Airi Satou", "Rhona Davidson"]
    );

    // salary twice: numeric, descending
    table.on_header_click(3);
    table.on_header_click(3);
    assert_eq!(
        body_rows(&doc, table),
        vec!["Rhona Davidson", "Garrett Winters", "Airi Satou"]
    );

    table.on_search_input("nobody works here");
    assert_eq!(doc.text(info), "Showing 0 to 0 of 0 entries");
    assert!(body_rows(&doc, table).is_empty());
}

#[tokio::test]
async fn test_destroy_restores_people_table() {
    let (doc, mut app) = loaded(PageType::Tables).await;
    let table = assert_some!(app.get_mut::<DataTableComponent>("table-0"));
    table.on_header_click(0);
    let node = table.table();

    app.destroy();
    assert_none!(doc.query(&Selector::class("datatable-container")));
    assert_none!(doc.query(&Selector::class("sort-asc")));
    let tbody = assert_some!(doc.query_in(node, &Selector::tag("tbody")));
    assert_eq!(doc.children(tbody).len(), 12);
}

#[tokio::test]
async fn test_signup_form_blocks_until_valid() {
    let (doc, mut app) = loaded(PageType::Forms).await;
    let form = assert_some!(app.get_mut::<FormValidatorComponent>("form-0"));

    assert!(form.submit());
    assert_eq!(form.errors().len(), 3);
    let summary = assert_some!(doc.query(&Selector::class("alert-danger")));
    assert!(doc.text(summary).starts_with(ERROR_SUMMARY_TITLE));
    assert_eq!(doc.query_all(&Selector::class("is-invalid")).len(), 3);

    form.on_input("name", "Jo");
    form.on_input("email", "jo@example.com");
    form.on_input("password", "correct-horse");
    form.on_input("password_confirmation", "correct-horse-battery");
    assert!(!form.on_blur("password_confirmation"));

    form.on_input("password_confirmation", "correct-horse");
    assert!(!form.submit());
    assert!(form.errors().is_valid());
    assert_none!(doc.query(&Selector::class("alert-danger")));
    assert!(doc.query_all(&Selector::class("invalid-feedback")).is_empty());
}

#[tokio::test]
async fn test_dashboard_counters_are_formatted() {
    let (doc, app) = loaded(PageType::Dashboard).await;
    let widgets = assert_some!(app.get::<WidgetManager>("widgets"));
    assert_eq!(widgets.charts().len(), 4);

    let counters: Vec<String> = doc
        .query_all(&Selector::class("count"))
        .into_iter()
        .map(|node| doc.text(node))
        .collect();
    assert_eq!(counters, vec!["23,569", "3,435"]);
}
