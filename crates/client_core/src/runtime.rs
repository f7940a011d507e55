//! Event loop that owns a [`UiOrchestrator`].
//!
//! Front ends post [`UiEvent`]s through an [`OrchestratorHandle`]; the loop
//! applies them in arrival order, runs the resulting commands as spawned
//! tasks whose outcomes are posted back to the same loop, and publishes a
//! fresh [`ViewState`] after every event.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use shared::domain::FormField;
use tokio::{
    sync::{broadcast, mpsc, oneshot, watch},
    task::JoinHandle,
};
use tracing::{debug, info};

use crate::{
    form::{PassengerForm, Preset},
    orchestrator::{Command, Notice, UiEvent, UiOrchestrator, ViewState},
    probe::ConnectivityProbe,
    PredictionService,
};

const NOTICE_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub initial_form: PassengerForm,
    pub probe_on_startup: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            initial_form: PassengerForm::default(),
            probe_on_startup: true,
        }
    }
}

enum Envelope {
    Event(UiEvent),
    /// Answered once every earlier envelope has been applied and published.
    Barrier(oneshot::Sender<()>),
}

pub struct OrchestratorHandle {
    events: mpsc::UnboundedSender<Envelope>,
    view: watch::Receiver<ViewState>,
    notices: broadcast::Sender<Notice>,
    task: JoinHandle<()>,
}

/// Starts the orchestrator loop on the current tokio runtime.
pub fn launch(service: Arc<dyn PredictionService>, options: LaunchOptions) -> OrchestratorHandle {
    let orchestrator = UiOrchestrator::new(options.initial_form);
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (completions_tx, completions_rx) = mpsc::unbounded_channel();
    let (view_tx, view_rx) = watch::channel(orchestrator.view());
    let (notices_tx, _) = broadcast::channel(NOTICE_CAPACITY);

    if options.probe_on_startup {
        let probe = ConnectivityProbe::spawn(Arc::clone(&service));
        let completions = completions_tx.clone();
        tokio::spawn(async move {
            let status = probe.resolved().await;
            let _ = completions.send(UiEvent::ProbeFinished(status));
        });
    }

    let task = tokio::spawn(run(
        orchestrator,
        service,
        events_rx,
        completions_tx,
        completions_rx,
        view_tx,
        notices_tx.clone(),
    ));

    OrchestratorHandle {
        events: events_tx,
        view: view_rx,
        notices: notices_tx,
        task,
    }
}

async fn run(
    mut orchestrator: UiOrchestrator,
    service: Arc<dyn PredictionService>,
    mut events: mpsc::UnboundedReceiver<Envelope>,
    completions_tx: mpsc::UnboundedSender<UiEvent>,
    mut completions: mpsc::UnboundedReceiver<UiEvent>,
    view: watch::Sender<ViewState>,
    notices: broadcast::Sender<Notice>,
) {
    loop {
        let event = tokio::select! {
            Some(event) = completions.recv() => event,
            envelope = events.recv() => match envelope {
                Some(Envelope::Event(event)) => event,
                Some(Envelope::Barrier(reply)) => {
                    let _ = reply.send(());
                    continue;
                }
                None => break,
            },
        };

        if let Some(command) = orchestrator.apply(event) {
            execute(command, Arc::clone(&service), completions_tx.clone());
        }
        for notice in orchestrator.take_notices() {
            let _ = notices.send(notice);
        }
        view.send_replace(orchestrator.view());
    }
    info!("orchestrator loop stopped");
}

fn execute(
    command: Command,
    service: Arc<dyn PredictionService>,
    completions: mpsc::UnboundedSender<UiEvent>,
) {
    match command {
        Command::Predict { ticket, input } => {
            debug!(seq = ticket.seq, "dispatching prediction request");
            tokio::spawn(async move {
                let outcome = service.predict(&input).await;
                let _ = completions.send(UiEvent::PredictionFinished { ticket, outcome });
            });
        }
    }
}

impl OrchestratorHandle {
    pub fn edit_field(&self, field: FormField, value: impl Into<String>) -> Result<()> {
        self.send(UiEvent::FieldEdited {
            field,
            value: value.into(),
        })
    }

    pub fn select_preset(&self, preset: &'static Preset) -> Result<()> {
        self.send(UiEvent::PresetSelected(preset))
    }

    pub fn submit(&self) -> Result<()> {
        self.send(UiEvent::Submit)
    }

    fn send(&self, event: UiEvent) -> Result<()> {
        self.send_envelope(Envelope::Event(event))
    }

    fn send_envelope(&self, envelope: Envelope) -> Result<()> {
        self.events
            .send(envelope)
            .map_err(|_| anyhow!("orchestrator loop is not running"))
    }

    pub fn view(&self) -> ViewState {
        self.view.borrow().clone()
    }

    pub fn watch_view(&self) -> watch::Receiver<ViewState> {
        self.view.clone()
    }

    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    /// Waits until the view reflects every event sent so far.
    pub async fn sync(&self) -> Result<ViewState> {
        let (tx, rx) = oneshot::channel();
        self.send_envelope(Envelope::Barrier(tx))?;
        rx.await
            .map_err(|_| anyhow!("orchestrator loop stopped before syncing"))?;
        Ok(self.view())
    }

    /// Like [`Self::sync`], then also waits for any outstanding prediction.
    pub async fn settled(&self) -> Result<ViewState> {
        self.sync().await?;
        let mut view = self.view.clone();
        let settled = view
            .wait_for(|state| !state.in_flight)
            .await
            .map_err(|_| anyhow!("orchestrator loop stopped before settling"))?;
        Ok(settled.clone())
    }

    pub async fn shutdown(self) {
        drop(self.events);
        let _ = self.task.await;
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
