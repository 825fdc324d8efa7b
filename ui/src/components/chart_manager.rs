use crate::components::common::{Capabilities, Component, Viewport};
use crate::dom::{Document, NodeId, Selector};
use crate::error::{AppError, AppResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
}

impl FromStr for ChartKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "line" => Ok(ChartKind::Line),
            "bar" => Ok(ChartKind::Bar),
            "pie" => Ok(ChartKind::Pie),
            other => Err(AppError::Component(format!("Unknown chart type '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub label: String,
    pub data: Vec<f64>,
}

/// Labels and series of one chart, as read from `data-chart-config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    pub fn default_for(kind: ChartKind) -> Self {
        let (labels, label, data): (&[&str], &str, &[f64]) = match kind {
            ChartKind::Line => (
                &["January", "February", "March", "April", "May", "June", "July"],
                "Dataset 1",
                &[65.0, 59.0, 80.0, 81.0, 56.0, 55.0, 40.0],
            ),
            ChartKind::Bar => (
                &["Red", "Blue", "Yellow", "Green", "Purple", "Orange"],
                "# of Votes",
                &[12.0, 19.0, 3.0, 5.0, 2.0, 3.0],
            ),
            ChartKind::Pie => (&["Red", "Blue", "Yellow"], "", &[300.0, 50.0, 100.0]),
        };
        Self {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            datasets: vec![Dataset {
                label: label.to_string(),
                data: data.to_vec(),
            }],
        }
    }
}

/// A chart bound to its canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub id: String,
    pub kind: ChartKind,
    pub data: ChartData,
    pub canvas: NodeId,
    /// Width of the last layout pass, `None` before the first resize.
    pub width: Option<f64>,
}

impl Chart {
    pub fn new(id: String, kind: ChartKind, data: ChartData, canvas: NodeId) -> Self {
        Self {
            id,
            kind,
            data,
            canvas,
            width: None,
        }
    }

    pub(crate) fn mount(&self, document: &Document) {
        document.set_attribute(self.canvas, "data-chart-rendered", "true");
    }

    pub(crate) fn resize(&mut self, document: &Document, viewport: Viewport) {
        self.width = Some(viewport.width);
        document.set_attribute(self.canvas, "data-rendered-width", &viewport.width.to_string());
    }

    pub(crate) fn unmount(&self, document: &Document) {
        document.remove_attribute(self.canvas, "data-chart-rendered");
        document.remove_attribute(self.canvas, "data-rendered-width");
    }
}

/// Charts of the charts page, one per `[data-chart]` canvas.
#[derive(Debug)]
pub struct ChartManager {
    document: Document,
    charts: IndexMap<String, Chart>,
}

impl ChartManager {
    /// Fails on an unknown chart type or a malformed `data-chart-config`.
    pub fn new(document: Document) -> AppResult<Self> {
        let mut charts = IndexMap::new();
        for (index, canvas) in document
            .query_all(&Selector::attr("data-chart"))
            .into_iter()
            .enumerate()
        {
            let chart = Self::build_chart(&document, canvas, index)?;
            charts.insert(chart.id.clone(), chart);
        }
        for chart in charts.values() {
            chart.mount(&document);
        }
        log::info!("Initialized {} chart(s)", charts.len());
        Ok(Self { document, charts })
    }

    fn build_chart(document: &Document, canvas: NodeId, index: usize) -> AppResult<Chart> {
        let id = document
            .id_of(canvas)
            .unwrap_or_else(|| format!("chart-{index}"));
        let kind: ChartKind = document.data(canvas, "chart").unwrap_or_default().parse()?;
        let data = match document.data(canvas, "chart-config") {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                AppError::Component(format!("Invalid data-chart-config on '{id}': {e}"))
            })?,
            None => ChartData::default_for(kind),
        };
        Ok(Chart::new(id, kind, data, canvas))
    }

    pub fn get_chart(&self, id: &str) -> Option<&Chart> {
        self.charts.get(id)
    }

    pub fn chart_ids(&self) -> Vec<&str> {
        self.charts.keys().map(String::as_str).collect()
    }

    pub fn destroy_chart(&mut self, id: &str) -> bool {
        match self.charts.shift_remove(id) {
            Some(chart) => {
                chart.unmount(&self.document);
                true
            }
            None => false,
        }
    }
}

impl Component for ChartManager {
    fn capabilities(&self) -> Capabilities {
        Capabilities::DESTROY | Capabilities::RESIZE
    }

    fn destroy(&mut self) {
        for (_, chart) in self.charts.drain(..) {
            chart.unmount(&self.document);
        }
    }

    fn handle_resize(&mut self, viewport: Viewport) {
        for chart in self.charts.values_mut() {
            chart.resize(&self.document, viewport);
        }
    }
}
