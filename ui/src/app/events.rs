use crate::app::page_loader::LoadedComponents;
use crate::error::AppError;

/// Results flowing back from background work to the [`App`](crate::app::application::App).
///
/// Unlike bus messages these carry owned components, so they have exactly
/// one consumer.
pub enum AppEvent {
    /// The resize debouncer went quiet at this width.
    ResizeSettled(f64),
    ModuleLoaded {
        module: String,
        components: LoadedComponents,
    },
    ModuleFailed {
        module: String,
        error: AppError,
    },
}

impl std::fmt::Debug for AppEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppEvent::ResizeSettled(width) => f.debug_tuple("ResizeSettled").field(width).finish(),
            AppEvent::ModuleLoaded { module, components } => f
                .debug_struct("ModuleLoaded")
                .field("module", module)
                .field(
                    "components",
                    &components.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>(),
                )
                .finish(),
            AppEvent::ModuleFailed { module, error } => f
                .debug_struct("ModuleFailed")
                .field("module", module)
                .field("error", error)
                .finish(),
        }
    }
}
