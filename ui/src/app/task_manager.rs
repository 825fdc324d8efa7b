use crate::app::events::AppEvent;
use crate::app::page_loader::{LoadContext, PageModule};
use crate::error::{AppError, ErrorReporter};
use engine::taskpool::TaskPool;
use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs page-module loads on the task pool and sends their results back to
/// the app. Every load is tied to a lifecycle token; once that token is
/// cancelled the load is abandoned and nothing is sent.
#[derive(Clone)]
pub struct TaskManager {
    taskpool: TaskPool,
    tx_to_app: Sender<AppEvent>,
    error_reporter: ErrorReporter,
    /// Cancellation tokens of loads still running, by module name
    active_operations: Arc<Mutex<HashMap<String, CancellationToken>>>,
    timeout: Duration,
}

impl TaskManager {
    pub fn new(taskpool: TaskPool, tx_to_app: Sender<AppEvent>, error_reporter: ErrorReporter) -> Self {
        Self {
            taskpool,
            tx_to_app,
            error_reporter,
            active_operations: Arc::new(Mutex::new(HashMap::new())),
            timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn operations(&self) -> std::sync::MutexGuard<'_, HashMap<String, CancellationToken>> {
        self.active_operations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Load `module` in the background. Failures and timeouts are reported
    /// as warnings and sent as [`AppEvent::ModuleFailed`].
    pub fn load_module(
        &self,
        module: Arc<dyn PageModule>,
        ctx: LoadContext,
        lifecycle: &CancellationToken,
    ) -> JoinHandle<Option<()>> {
        let name = module.name().to_string();
        let cancel_token = lifecycle.child_token();
        self.operations().insert(name.clone(), cancel_token.clone());
        log::debug!("Loading page module '{name}'");

        let tx_to_app = self.tx_to_app.clone();
        let error_reporter = self.error_reporter.clone();
        let active_operations = self.active_operations.clone();
        let timeout = self.timeout;

        self.taskpool.execute(async move {
            let result = tokio::select! {
                result = tokio::time::timeout(timeout, module.load(ctx)) => Some(match result {
                    Ok(loaded) => loaded,
                    Err(_) => {
                        log::warn!("Loading '{name}' timed out after {timeout:?}");
                        Err(AppError::Component(format!(
                            "Loading {name} timed out after {} seconds",
                            timeout.as_secs()
                        )))
                    }
                }),
                () = cancel_token.cancelled() => None,
            };

            active_operations
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&name);

            let event = match result {
                None => {
                    log::debug!("Load of '{name}' cancelled, discarding");
                    return;
                }
                Some(Ok(components)) => AppEvent::ModuleLoaded {
                    module: name,
                    components,
                },
                Some(Err(error)) => {
                    error_reporter.report_load_error(&name, error.clone());
                    AppEvent::ModuleFailed {
                        module: name,
                        error,
                    }
                }
            };
            Self::send_event_or_report_error(&tx_to_app, event, "module load result", &error_reporter);
        })
    }

    /// Send to the app or report the closed channel.
    pub fn send_event_or_report_error(
        tx: &Sender<AppEvent>,
        event: AppEvent,
        context: &str,
        error_reporter: &ErrorReporter,
    ) {
        if let Err(e) = tx.send(event) {
            error_reporter.report_send_error(context, e);
        }
    }

    pub fn cancel_operation(&self, operation_id: &str) -> bool {
        match self.operations().remove(operation_id) {
            Some(token) => {
                token.cancel();
                log::info!("Cancelled operation: {operation_id}");
                true
            }
            None => false,
        }
    }

    pub fn get_active_operations(&self) -> Vec<String> {
        self.operations().keys().cloned().collect()
    }

    /// Abandon everything queued or running on the pool.
    pub fn shutdown(&self) {
        self.taskpool.shutdown();
    }
}
