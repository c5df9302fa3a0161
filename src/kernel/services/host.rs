use std::future::Future;
use std::path::PathBuf;
use std::sync::mpsc::{RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::kernel::{Action, Effect};

use super::adapters::settings::save_preferences;
use super::bus::{kernel_bus, KernelBusReceiver, KernelBusSender, KernelMessage};
use super::ports::{AssistantBridge, AssistantError, AsyncExecutor, Preferences};

/// Owns the bus and executes effects; results come back as actions.
pub struct KernelServiceHost {
    bus: KernelBusSender,
    rx: KernelBusReceiver,
    executor: Arc<dyn AsyncExecutor>,
    assistant: Arc<dyn AssistantBridge>,
    preferences: Option<mpsc::UnboundedSender<Preferences>>,
}

#[derive(Clone)]
pub struct KernelServiceContext {
    bus: KernelBusSender,
    executor: Arc<dyn AsyncExecutor>,
}

impl KernelServiceHost {
    pub fn new(executor: Arc<dyn AsyncExecutor>, assistant: Arc<dyn AssistantBridge>) -> Self {
        let (bus, rx) = kernel_bus();
        Self {
            bus,
            rx,
            executor,
            assistant,
            preferences: None,
        }
    }

    /// Where preference changes are written; unset means not persisted.
    pub fn with_settings_path(mut self, path: Option<PathBuf>) -> Self {
        self.preferences = path.map(|path| self.spawn_preference_writer(path));
        self
    }

    /// Single writer for settings.json: writes happen one at a time in
    /// submission order, and a backlog collapses to its newest value.
    fn spawn_preference_writer(&self, path: PathBuf) -> mpsc::UnboundedSender<Preferences> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Preferences>();
        self.context().spawn_future(async move {
            while let Some(mut preferences) = rx.recv().await {
                while let Ok(newer) = rx.try_recv() {
                    preferences = newer;
                }
                let path = path.clone();
                let result =
                    tokio::task::spawn_blocking(move || save_preferences(&path, &preferences))
                        .await;
                match result {
                    Ok(Ok(())) => tracing::debug!("preferences saved"),
                    Ok(Err(e)) => tracing::warn!(error = %e, "failed to save preferences"),
                    Err(e) => tracing::warn!(error = %e, "preference writer panicked"),
                }
            }
        });
        tx
    }

    pub fn context(&self) -> KernelServiceContext {
        KernelServiceContext {
            bus: self.bus.clone(),
            executor: Arc::clone(&self.executor),
        }
    }

    pub fn run_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.run_effect(effect);
        }
    }

    pub fn run_effect(&self, effect: Effect) {
        let ctx = self.context();
        match effect {
            Effect::AssistantGenerate {
                request_id,
                request,
            } => {
                let assistant = Arc::clone(&self.assistant);
                let spawner = ctx.clone();
                spawner.spawn_future(async move {
                    let result =
                        tokio::task::spawn_blocking(move || assistant.generate(&request))
                            .await
                            .unwrap_or_else(|e| Err(AssistantError::Network(e.to_string())));
                    ctx.dispatch(Action::AssistantResponded { request_id, result });
                });
            }
            Effect::CheckAssistantHealth => {
                let assistant = Arc::clone(&self.assistant);
                let spawner = ctx.clone();
                spawner.spawn_future(async move {
                    let available = tokio::task::spawn_blocking(move || assistant.health())
                        .await
                        .unwrap_or(false);
                    ctx.dispatch(Action::AssistantHealthChecked { available });
                });
            }
            Effect::PersistPreferences(preferences) => {
                let Some(writer) = &self.preferences else {
                    return;
                };
                if writer.send(preferences).is_err() {
                    tracing::warn!("preference writer stopped, change not saved");
                }
            }
        }
    }

    pub fn try_recv(&mut self) -> Result<KernelMessage, TryRecvError> {
        self.rx.try_recv()
    }

    pub fn recv_timeout(&mut self, timeout: Duration) -> Result<KernelMessage, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

impl KernelServiceContext {
    pub fn dispatch(&self, action: Action) -> bool {
        self.bus.send_action(action)
    }

    pub fn spawn_future<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.executor.spawn(Box::pin(task));
    }
}
