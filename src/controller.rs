use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::debounce::TimerToken;
use crate::session::{Effect, Event, Outcome, SessionState, TranslationRequest};
use crate::translate::Translator;

pub const QUIET_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Error, Debug)]
#[error("Translation controller has stopped")]
pub struct ControllerStopped;

/// Owns the session state. All user input, timer expiries and request results are
/// funneled through its task, so it is the only writer.
pub struct Controller {
    state: SessionState,
    translator: Arc<dyn Translator>,
    inputs: mpsc::UnboundedReceiver<Event>,
    internal_tx: mpsc::UnboundedSender<Event>,
    internal_rx: mpsc::UnboundedReceiver<Event>,
    snapshots: watch::Sender<SessionState>,
    timers: HashMap<TimerToken, JoinHandle<()>>,
}

#[derive(Clone)]
pub struct ControllerHandle {
    inputs: mpsc::UnboundedSender<Event>,
    snapshots: watch::Receiver<SessionState>,
}

impl Controller {
    pub fn new(translator: Arc<dyn Translator>, initial: SessionState) -> (Self, ControllerHandle) {
        let (inputs_tx, inputs) = mpsc::unbounded_channel();
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();
        let (snapshots, snapshots_rx) = watch::channel(initial.clone());
        let controller = Self {
            state: initial,
            translator,
            inputs,
            internal_tx,
            internal_rx,
            snapshots,
            timers: HashMap::new(),
        };
        let handle = ControllerHandle {
            inputs: inputs_tx,
            snapshots: snapshots_rx,
        };
        (controller, handle)
    }

    /// Runs until every `ControllerHandle` has been dropped.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                event = self.inputs.recv() => match event {
                    Some(event) => self.apply(event),
                    None => break,
                },
                Some(event) = self.internal_rx.recv() => self.apply(event),
            }
        }

        for (_, timer) in self.timers.drain() {
            timer.abort();
        }
        info!("Controller stopped");
    }

    fn apply(&mut self, event: Event) {
        debug!("Applying {:?}", event);
        if let Event::TimerFired(token) = &event {
            self.timers.remove(token);
        }
        let (state, effects) = self.state.reduce(event);
        self.state = state;
        debug!(
            "Revision {}, loading {}, pending timer {:?}",
            self.state.revision(),
            self.state.is_loading,
            self.state.pending_timer()
        );
        for effect in effects {
            self.execute(effect);
        }
        self.snapshots.send_replace(self.state.clone());
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::CancelTimer(token) => {
                if let Some(timer) = self.timers.remove(&token) {
                    timer.abort();
                }
            }
            Effect::StartTimer(token) => {
                let tx = self.internal_tx.clone();
                let timer = tokio::spawn(async move {
                    tokio::time::sleep(QUIET_INTERVAL).await;
                    let _ = tx.send(Event::TimerFired(token));
                });
                self.timers.insert(token, timer);
            }
            Effect::Dispatch(request) => self.dispatch(request),
        }
    }

    fn dispatch(&self, request: TranslationRequest) {
        let tx = self.internal_tx.clone();
        let translator = self.translator.clone();
        tokio::spawn(async move {
            let outcome = match translator
                .translate(&request.text, &request.source, &request.target)
                .await
            {
                Ok(text) => Outcome::Translated(text),
                Err(e) => {
                    error!(
                        "Failed to translate {}|{}: {:?}",
                        request.source, request.target, e
                    );
                    Outcome::Failed
                }
            };
            let _ = tx.send(Event::Resolved {
                revision: request.revision,
                outcome,
            });
        });
    }
}

impl ControllerHandle {
    pub fn set_source_text(&self, text: &str) -> Result<(), ControllerStopped> {
        self.send(Event::SourceTextChanged(text.to_string()))
    }

    pub fn set_source_lang(&self, code: &str) -> Result<(), ControllerStopped> {
        self.send(Event::SourceLangChanged(code.to_string()))
    }

    pub fn set_target_lang(&self, code: &str) -> Result<(), ControllerStopped> {
        self.send(Event::TargetLangChanged(code.to_string()))
    }

    pub fn swap(&self) -> Result<(), ControllerStopped> {
        self.send(Event::Swap)
    }

    pub fn state(&self) -> SessionState {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.snapshots.clone()
    }

    fn send(&self, event: Event) -> Result<(), ControllerStopped> {
        self.inputs.send(event).map_err(|_| ControllerStopped)
    }
}
