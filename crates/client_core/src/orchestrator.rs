//! Form/submit/result state machine.
//!
//! The orchestrator owns the form, the current result and the connectivity
//! status. All mutations go through [`UiOrchestrator::apply`] (or the named
//! transition methods it dispatches to); I/O is requested by returning a
//! [`Command`] for the caller to execute.

use chrono::{DateTime, Utc};
use shared::{
    domain::{ConnectivityStatus, FormField},
    protocol::{PassengerInput, PredictionResult},
};
use tracing::{debug, info, warn};

use crate::{
    error::{ClientError, InvalidInput},
    form::{FormState, PassengerForm, Preset},
    presenter::{present, ResultView},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    ShowingResult,
}

/// Identifies one accepted submit. `generation` is the form generation at the
/// time of the submit; preset selection starts a new generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub seq: u64,
    generation: u64,
}

#[derive(Debug)]
pub enum UiEvent {
    FieldEdited { field: FormField, value: String },
    PresetSelected(&'static Preset),
    Submit,
    ProbeFinished(ConnectivityStatus),
    PredictionFinished {
        ticket: RequestTicket,
        outcome: Result<PredictionResult, ClientError>,
    },
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FieldEdited { .. } => "field_edited",
            Self::PresetSelected(_) => "preset_selected",
            Self::Submit => "submit",
            Self::ProbeFinished(_) => "probe_finished",
            Self::PredictionFinished { .. } => "prediction_finished",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Predict {
        ticket: RequestTicket,
        input: PassengerInput,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejected {
    AlreadySubmitting,
    InvalidInput(InvalidInput),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    BackendUnavailable,
    InvalidInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    fn from_error(err: &ClientError) -> Self {
        let kind = if err.affects_connectivity() {
            NoticeKind::BackendUnavailable
        } else {
            NoticeKind::InvalidInput
        };
        Self {
            kind,
            message: err.user_notice(),
            raised_at: Utc::now(),
        }
    }
}

/// Snapshot handed to the rendering layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub phase: Phase,
    pub connectivity: ConnectivityStatus,
    pub form: PassengerForm,
    pub result: Option<ResultView>,
    pub in_flight: bool,
}

impl ViewState {
    pub fn submit_enabled(&self) -> bool {
        !self.in_flight
    }

    pub fn submit_label(&self) -> &'static str {
        if self.in_flight {
            "Predicting..."
        } else {
            "Predict Survival"
        }
    }
}

#[derive(Debug, Default)]
pub struct UiOrchestrator {
    form: FormState,
    phase: Phase,
    connectivity: ConnectivityStatus,
    result: Option<PredictionResult>,
    in_flight: Option<RequestTicket>,
    next_seq: u64,
    generation: u64,
    notices: Vec<Notice>,
}

impl UiOrchestrator {
    pub fn new(initial: PassengerForm) -> Self {
        Self {
            form: FormState::new(initial),
            ..Self::default()
        }
    }

    pub fn apply(&mut self, event: UiEvent) -> Option<Command> {
        debug!(event = event.name(), phase = ?self.phase, "applying ui event");
        match event {
            UiEvent::FieldEdited { field, value } => {
                self.edit_field(field, value);
                None
            }
            UiEvent::PresetSelected(preset) => {
                self.select_preset(preset);
                None
            }
            UiEvent::Submit => self.begin_submit().ok(),
            UiEvent::ProbeFinished(status) => {
                self.probe_finished(status);
                None
            }
            UiEvent::PredictionFinished { ticket, outcome } => {
                self.finish_prediction(ticket, outcome);
                None
            }
        }
    }

    pub fn edit_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    pub fn select_preset(&mut self, preset: &Preset) {
        info!(preset = preset.name, "preset selected");
        self.form.reset(preset);
        self.result = None;
        self.phase = Phase::Idle;
        self.generation += 1;
    }

    /// Accepts a submit unless one is already outstanding or the form does not
    /// convert. Rejected submits send nothing.
    pub fn begin_submit(&mut self) -> Result<Command, SubmitRejected> {
        if let Some(ticket) = self.in_flight {
            debug!(seq = ticket.seq, "submit ignored while a prediction is outstanding");
            return Err(SubmitRejected::AlreadySubmitting);
        }

        let input = match self.form.snapshot().to_input() {
            Ok(input) => input,
            Err(invalid) => {
                warn!(field = %invalid.field, value = %invalid.value, "submit rejected");
                self.notices
                    .push(Notice::from_error(&ClientError::InvalidInput(invalid.clone())));
                return Err(SubmitRejected::InvalidInput(invalid));
            }
        };

        self.next_seq += 1;
        let ticket = RequestTicket {
            seq: self.next_seq,
            generation: self.generation,
        };
        self.in_flight = Some(ticket);
        self.phase = Phase::Submitting;
        info!(seq = ticket.seq, "prediction submitted");
        Ok(Command::Predict { ticket, input })
    }

    pub fn finish_prediction(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<PredictionResult, ClientError>,
    ) {
        if self.in_flight != Some(ticket) {
            warn!(seq = ticket.seq, "ignoring completion for unknown request");
            return;
        }
        self.in_flight = None;
        let current = ticket.generation == self.generation;

        match outcome {
            Ok(result) => {
                self.connectivity = ConnectivityStatus::Connected;
                if current {
                    info!(seq = ticket.seq, survived = result.survived, "prediction received");
                    self.result = Some(result);
                    self.phase = Phase::ShowingResult;
                } else {
                    warn!(seq = ticket.seq, "discarding prediction for a replaced form");
                }
            }
            Err(err) => {
                warn!(seq = ticket.seq, kind = ?err.kind(), error = %err, "prediction failed");
                if err.affects_connectivity() {
                    self.connectivity = ConnectivityStatus::Disconnected;
                }
                self.notices.push(Notice::from_error(&err));
                if current {
                    self.phase = Phase::Idle;
                }
            }
        }
    }

    pub fn probe_finished(&mut self, status: ConnectivityStatus) {
        self.connectivity = status;
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn connectivity(&self) -> ConnectivityStatus {
        self.connectivity
    }

    pub fn form(&self) -> &PassengerForm {
        self.form.snapshot()
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn view(&self) -> ViewState {
        ViewState {
            phase: self.phase,
            connectivity: self.connectivity,
            form: self.form.snapshot().clone(),
            result: self.result.as_ref().map(present),
            in_flight: self.in_flight.is_some(),
        }
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
