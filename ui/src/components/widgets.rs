use crate::components::chart_manager::{Chart, ChartData, ChartKind, Dataset};
use crate::components::common::{Capabilities, Component, Viewport};
use crate::dom::{Document, NodeId, Selector};

const WIDGET_SERIES: [[f64; 10]; 4] = [
    [65.0, 59.0, 84.0, 84.0, 51.0, 55.0, 40.0, 65.0, 59.0, 84.0],
    [28.0, 48.0, 40.0, 59.0, 86.0, 27.0, 90.0, 28.0, 48.0, 40.0],
    [45.0, 25.0, 16.0, 36.0, 67.0, 18.0, 76.0, 45.0, 25.0, 16.0],
    [12.0, 19.0, 27.0, 43.0, 52.0, 31.0, 48.0, 12.0, 19.0, 27.0],
];

/// Leading integer of a counter text, ignoring thousands separators.
pub fn parse_counter(text: &str) -> Option<u64> {
    let digits: String = text
        .trim()
        .chars()
        .filter(|c| *c != ',')
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// `1234567` -> `"1,234,567"`.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter {
    pub node: NodeId,
    pub target: u64,
}

/// Dashboard widgets: stat counters and the sparkline charts.
#[derive(Debug)]
pub struct WidgetManager {
    document: Document,
    counters: Vec<Counter>,
    charts: Vec<Chart>,
}

impl WidgetManager {
    pub fn new(document: Document) -> Self {
        let counters = Self::collect_counters(&document);
        let charts = Self::collect_widget_charts(&document);
        for chart in &charts {
            chart.mount(&document);
        }
        log::info!(
            "Initialized {} counter(s) and {} widget chart(s)",
            counters.len(),
            charts.len()
        );
        Self {
            document,
            counters,
            charts,
        }
    }

    fn collect_counters(document: &Document) -> Vec<Counter> {
        let mut nodes = document.query_all(&Selector::class("count"));
        nodes.extend(document.query_all(&Selector::class("card-title")));

        let mut counters = Vec::new();
        for node in nodes {
            let text = document.text(node);
            if !text.starts_with(|c: char| c.is_ascii_digit()) {
                continue;
            }
            if let Some(target) = parse_counter(&text) {
                document.set_text(node, &format_thousands(target));
                counters.push(Counter { node, target });
            }
        }
        counters
    }

    fn collect_widget_charts(document: &Document) -> Vec<Chart> {
        document
            .query_all(&Selector::id_prefix("widgetChart"))
            .into_iter()
            .enumerate()
            .map(|(index, canvas)| {
                let series = WIDGET_SERIES.get(index).unwrap_or(&WIDGET_SERIES[0]);
                let data = ChartData {
                    labels: vec![String::new(); series.len()],
                    datasets: vec![Dataset {
                        label: String::new(),
                        data: series.to_vec(),
                    }],
                };
                let id = document
                    .id_of(canvas)
                    .unwrap_or_else(|| format!("widgetChart{}", index + 1));
                Chart::new(id, ChartKind::Line, data, canvas)
            })
            .collect()
    }

    pub fn counters(&self) -> &[Counter] {
        &self.counters
    }

    pub fn charts(&self) -> &[Chart] {
        &self.charts
    }
}

impl Component for WidgetManager {
    fn capabilities(&self) -> Capabilities {
        Capabilities::DESTROY | Capabilities::RESIZE
    }

    fn destroy(&mut self) {
        for chart in self.charts.drain(..) {
            chart.unmount(&self.document);
        }
        self.counters.clear();
    }

    fn handle_resize(&mut self, viewport: Viewport) {
        for chart in &mut self.charts {
            chart.resize(&self.document, viewport);
        }
    }
}
