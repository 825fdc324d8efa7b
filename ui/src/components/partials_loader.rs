use crate::app::event_bus::EventBus;
use crate::components::common::{Msg, PartialActivityMsg};
use crate::dom::{Document, InsertPosition, NodeId, Selector};
use engine::partials::PartialsClient;
use futures::future::join_all;

/// Insertion mode from `data-partial-replace|prepend|append="true"`.
pub fn insert_position(document: &Document, node: NodeId) -> InsertPosition {
    let enabled = |key: &str| document.data(node, key).as_deref() == Some("true");
    if enabled("partial-replace") {
        InsertPosition::Replace
    } else if enabled("partial-prepend") {
        InsertPosition::Prepend
    } else if enabled("partial-append") {
        InsertPosition::Append
    } else {
        InsertPosition::Inner
    }
}

/// Fills every `[data-partial]` placeholder with its fragment.
#[derive(Clone)]
pub struct PartialsLoader {
    client: PartialsClient,
    document: Document,
    bus: EventBus,
}

impl PartialsLoader {
    pub fn new(client: PartialsClient, document: Document, bus: EventBus) -> Self {
        Self {
            client,
            document,
            bus,
        }
    }

    pub fn client(&self) -> &PartialsClient {
        &self.client
    }

    /// Loads all placeholders concurrently. Each insertion is followed by a
    /// `partialLoaded` event; returns how many placeholders were handled.
    pub async fn load_all_partials(&self) -> usize {
        let placeholders: Vec<(usize, NodeId, String)> = self
            .document
            .query_all(&Selector::attr("data-partial"))
            .into_iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let name = self.document.data(node, "partial")?;
                self.document
                    .set_attribute(node, "data-partial-id", &index.to_string());
                Some((index, node, name))
            })
            .collect();

        log::info!("Loading {} partial(s)", placeholders.len());
        let count = placeholders.len();
        join_all(
            placeholders
                .into_iter()
                .map(|(index, node, name)| self.insert_partial(index, node, name)),
        )
        .await;
        count
    }

    async fn insert_partial(&self, partial_id: usize, node: NodeId, name: String) {
        let position = insert_position(&self.document, node);
        let html = self.client.load_partial(&name).await;
        if self.document.insert_html(node, position, &html).is_none() {
            log::debug!("Placeholder for partial '{name}' is gone, skipping insert");
        }
        self.bus
            .publish(Msg::PartialActivity(PartialActivityMsg::Loaded { name, partial_id }));
    }
}
