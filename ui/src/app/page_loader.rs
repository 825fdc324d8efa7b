//! Page-type dispatch: which components a page needs beyond the shell.

use crate::app::event_bus::EventBus;
use crate::components::chart_manager::ChartManager;
use crate::components::common::Component;
use crate::components::data_table::DataTableComponent;
use crate::components::form_validator::FormValidatorComponent;
use crate::components::widgets::WidgetManager;
use crate::dom::{Document, Selector};
use crate::error::AppResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageType {
    Dashboard,
    Charts,
    Tables,
    Forms,
    #[default]
    Default,
}

impl PageType {
    pub fn as_str(self) -> &'static str {
        match self {
            PageType::Dashboard => "dashboard",
            PageType::Charts => "charts",
            PageType::Tables => "tables",
            PageType::Forms => "forms",
            PageType::Default => "default",
        }
    }

    /// From `data-page` on the body; absent or unknown means [`PageType::Default`].
    pub fn from_document(document: &Document) -> Self {
        document
            .data(document.body(), "page")
            .map(|raw| raw.parse().unwrap_or_default())
            .unwrap_or_default()
    }
}

impl FromStr for PageType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "dashboard" => PageType::Dashboard,
            "charts" => PageType::Charts,
            "tables" => PageType::Tables,
            "forms" => PageType::Forms,
            _ => PageType::Default,
        })
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a page module gets to build its components with.
#[derive(Clone, Debug)]
pub struct LoadContext {
    pub document: Document,
    pub bus: EventBus,
    pub page_size: usize,
}

pub type LoadedComponents = Vec<(String, Box<dyn Component>)>;

/// A unit of page-specific components, loaded off the shell's critical path.
#[async_trait]
pub trait PageModule: Send + Sync {
    fn name(&self) -> &str;

    async fn load(&self, ctx: LoadContext) -> AppResult<LoadedComponents>;
}

pub struct WidgetsModule;

#[async_trait]
impl PageModule for WidgetsModule {
    fn name(&self) -> &str {
        "widgets"
    }

    async fn load(&self, ctx: LoadContext) -> AppResult<LoadedComponents> {
        Ok(vec![(
            "widgets".to_string(),
            Box::new(WidgetManager::new(ctx.document)) as Box<dyn Component>,
        )])
    }
}

pub struct ChartsModule;

#[async_trait]
impl PageModule for ChartsModule {
    fn name(&self) -> &str {
        "charts"
    }

    async fn load(&self, ctx: LoadContext) -> AppResult<LoadedComponents> {
        let charts = ChartManager::new(ctx.document)?;
        Ok(vec![("charts".to_string(), Box::new(charts) as Box<dyn Component>)])
    }
}

/// One `table-N` per `[data-table]`.
pub struct TablesModule;

#[async_trait]
impl PageModule for TablesModule {
    fn name(&self) -> &str {
        "tables"
    }

    async fn load(&self, ctx: LoadContext) -> AppResult<LoadedComponents> {
        let tables = ctx.document.query_all(&Selector::attr("data-table"));
        Ok(tables
            .into_iter()
            .enumerate()
            .map(|(index, table)| {
                let component = DataTableComponent::new(ctx.document.clone(), table, ctx.page_size);
                (format!("table-{index}"), Box::new(component) as Box<dyn Component>)
            })
            .collect())
    }
}

/// One `form-N` per `form[data-validate]`.
pub struct FormsModule;

#[async_trait]
impl PageModule for FormsModule {
    fn name(&self) -> &str {
        "forms"
    }

    async fn load(&self, ctx: LoadContext) -> AppResult<LoadedComponents> {
        let forms = ctx
            .document
            .query_all(&Selector::tag("form").and(Selector::attr("data-validate")));
        Ok(forms
            .into_iter()
            .enumerate()
            .map(|(index, form)| {
                let component = FormValidatorComponent::new(ctx.document.clone(), form);
                (format!("form-{index}"), Box::new(component) as Box<dyn Component>)
            })
            .collect())
    }
}

/// Page type to the modules it loads.
#[derive(Clone)]
pub struct ModuleCatalog {
    modules: HashMap<PageType, Vec<Arc<dyn PageModule>>>,
}

impl Default for ModuleCatalog {
    fn default() -> Self {
        let mut catalog = Self::empty();
        catalog.register(PageType::Dashboard, Arc::new(WidgetsModule));
        catalog.register(PageType::Charts, Arc::new(ChartsModule));
        catalog.register(PageType::Tables, Arc::new(TablesModule));
        catalog.register(PageType::Forms, Arc::new(FormsModule));
        catalog
    }
}

impl ModuleCatalog {
    pub fn empty() -> Self {
        Self {
            modules: HashMap::new(),
        }
    }

    pub fn register(&mut self, page: PageType, module: Arc<dyn PageModule>) {
        self.modules.entry(page).or_default().push(module);
    }

    pub fn modules_for(&self, page: PageType) -> Vec<Arc<dyn PageModule>> {
        self.modules.get(&page).cloned().unwrap_or_default()
    }
}
