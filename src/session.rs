//! Translation session state and the pure transition function that drives it.
//!
//! `SessionState::reduce` never touches timers or the network. It returns the next
//! state plus the effects the controller has to carry out, so every transition can
//! be checked without a runtime.

use crate::debounce::{Debouncer, TimerToken};

/// Shown in place of a translation when the request fails.
pub const ERROR_MARKER: &str = "Translation error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub source_lang: String,
    pub target_lang: String,
    pub source_text: String,
    pub translated_text: String,
    pub is_loading: bool,
    revision: u64,
    in_flight: Option<u64>,
    debouncer: Debouncer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub revision: u64,
    pub text: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Translated(String),
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SourceTextChanged(String),
    SourceLangChanged(String),
    TargetLangChanged(String),
    Swap,
    TimerFired(TimerToken),
    Resolved { revision: u64, outcome: Outcome },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CancelTimer(TimerToken),
    StartTimer(TimerToken),
    Dispatch(TranslationRequest),
}

impl SessionState {
    pub fn new(source_lang: &str, target_lang: &str) -> Self {
        Self {
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            source_text: String::new(),
            translated_text: String::new(),
            is_loading: false,
            revision: 0,
            in_flight: None,
            debouncer: Debouncer::new(),
        }
    }

    pub fn reduce(&self, event: Event) -> (Self, Vec<Effect>) {
        let mut next = self.clone();
        let mut effects = Vec::new();

        match event {
            Event::SourceTextChanged(text) => {
                next.source_text = text;
            }
            Event::SourceLangChanged(code) => {
                next.source_lang = code;
            }
            Event::TargetLangChanged(code) => {
                next.target_lang = code;
            }
            Event::Swap => {
                std::mem::swap(&mut next.source_lang, &mut next.target_lang);
                next.source_text = std::mem::take(&mut next.translated_text);
            }
            Event::TimerFired(token) => {
                if next.debouncer.fire(token) && !next.source_text.trim().is_empty() {
                    next.is_loading = true;
                    next.in_flight = Some(next.revision);
                    effects.push(Effect::Dispatch(TranslationRequest {
                        revision: next.revision,
                        text: next.source_text.clone(),
                        source: next.source_lang.clone(),
                        target: next.target_lang.clone(),
                    }));
                }
                return (next, effects);
            }
            Event::Resolved { revision, outcome } => {
                // Anything but the latest dispatched request is dropped, and even that one
                // is only shown if the inputs still match what was sent.
                if next.in_flight == Some(revision) {
                    next.in_flight = None;
                    next.is_loading = false;
                    if revision == next.revision {
                        next.translated_text = match outcome {
                            Outcome::Translated(text) => text,
                            Outcome::Failed => ERROR_MARKER.to_string(),
                        };
                    }
                }
                return (next, effects);
            }
        }

        if next.inputs() != self.inputs() {
            next.inputs_changed(&mut effects);
        }
        (next, effects)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn pending_timer(&self) -> Option<TimerToken> {
        self.debouncer.pending()
    }

    fn inputs(&self) -> (&str, &str, &str) {
        (&self.source_lang, &self.target_lang, &self.source_text)
    }

    fn inputs_changed(&mut self, effects: &mut Vec<Effect>) {
        self.revision += 1;
        if self.source_text.trim().is_empty() {
            if let Some(token) = self.debouncer.cancel() {
                effects.push(Effect::CancelTimer(token));
            }
            self.in_flight = None;
            self.is_loading = false;
        } else {
            let (cancelled, token) = self.debouncer.schedule();
            if let Some(cancelled) = cancelled {
                effects.push(Effect::CancelTimer(cancelled));
            }
            effects.push(Effect::StartTimer(token));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started_timer(effects: &[Effect]) -> TimerToken {
        effects
            .iter()
            .find_map(|effect| match effect {
                Effect::StartTimer(token) => Some(*token),
                _ => None,
            })
            .expect("no timer started")
    }

    fn dispatched(effects: &[Effect]) -> TranslationRequest {
        effects
            .iter()
            .find_map(|effect| match effect {
                Effect::Dispatch(request) => Some(request.clone()),
                _ => None,
            })
            .expect("no request dispatched")
    }

    /// Types `text` and lets the quiet interval pass, returning the request that went out.
    fn type_and_fire(state: SessionState, text: &str) -> (SessionState, TranslationRequest) {
        let (state, effects) = state.reduce(Event::SourceTextChanged(text.to_string()));
        let token = started_timer(&effects);
        let (state, effects) = state.reduce(Event::TimerFired(token));
        (state, dispatched(&effects))
    }

    #[test]
    fn success_sets_translation() {
        let state = SessionState::new("pt", "en");
        let (state, request) = type_and_fire(state, "bom dia");
        assert!(state.is_loading);
        assert_eq!(
            request,
            TranslationRequest {
                revision: state.revision(),
                text: "bom dia".to_string(),
                source: "pt".to_string(),
                target: "en".to_string(),
            }
        );

        let (state, effects) = state.reduce(Event::Resolved {
            revision: request.revision,
            outcome: Outcome::Translated("good morning".to_string()),
        });
        assert!(effects.is_empty());
        assert_eq!(state.translated_text, "good morning");
        assert!(!state.is_loading);
    }

    #[test]
    fn failure_sets_error_marker() {
        let state = SessionState::new("pt", "en");
        let (state, request) = type_and_fire(state, "olá");

        let (state, _) = state.reduce(Event::Resolved {
            revision: request.revision,
            outcome: Outcome::Failed,
        });
        assert_eq!(state.translated_text, ERROR_MARKER);
        assert!(!state.is_loading);
    }

    #[test]
    fn burst_of_edits_keeps_only_last_timer() {
        let state = SessionState::new("pt", "en");
        let (state, effects) = state.reduce(Event::SourceTextChanged("b".to_string()));
        let first = started_timer(&effects);

        let (state, effects) = state.reduce(Event::SourceTextChanged("bo".to_string()));
        let second = started_timer(&effects);
        assert_eq!(effects[0], Effect::CancelTimer(first));

        let (state, effects) = state.reduce(Event::TargetLangChanged("es".to_string()));
        let third = started_timer(&effects);
        assert_eq!(effects[0], Effect::CancelTimer(second));

        // The cancelled timers are inert even if they report in.
        let (state, effects) = state.reduce(Event::TimerFired(first));
        assert!(effects.is_empty());
        let (state, effects) = state.reduce(Event::TimerFired(second));
        assert!(effects.is_empty());
        assert!(!state.is_loading);

        let (_, effects) = state.reduce(Event::TimerFired(third));
        let request = dispatched(&effects);
        assert_eq!(request.text, "bo");
        assert_eq!(request.target, "es");
    }

    #[test]
    fn swap_exchanges_languages_and_seeds_text() {
        let state = SessionState::new("pt", "en");
        let (state, request) = type_and_fire(state, "olá");
        let (state, _) = state.reduce(Event::Resolved {
            revision: request.revision,
            outcome: Outcome::Translated("hello".to_string()),
        });

        let (state, effects) = state.reduce(Event::Swap);
        assert_eq!(state.source_lang, "en");
        assert_eq!(state.target_lang, "pt");
        assert_eq!(state.source_text, "hello");
        assert_eq!(state.translated_text, "");
        started_timer(&effects);
    }

    #[test]
    fn swap_with_empty_translation_schedules_nothing() {
        let state = SessionState::new("pt", "en");
        let (state, effects) = state.reduce(Event::Swap);
        assert_eq!(state.source_lang, "en");
        assert_eq!(state.target_lang, "pt");
        assert!(effects.is_empty());
        assert_eq!(state.pending_timer(), None);
    }

    #[test]
    fn empty_text_schedules_nothing_and_keeps_translation() {
        let state = SessionState::new("pt", "en");
        let (state, request) = type_and_fire(state, "bom dia");
        let (state, _) = state.reduce(Event::Resolved {
            revision: request.revision,
            outcome: Outcome::Translated("good morning".to_string()),
        });

        let (state, effects) = state.reduce(Event::SourceTextChanged("   ".to_string()));
        assert!(effects.is_empty());
        let (state, effects) = state.reduce(Event::SourceTextChanged(String::new()));
        assert!(effects.is_empty());
        assert_eq!(state.translated_text, "good morning");
        assert_eq!(state.pending_timer(), None);
    }

    #[test]
    fn clearing_text_cancels_pending_timer() {
        let state = SessionState::new("pt", "en");
        let (state, effects) = state.reduce(Event::SourceTextChanged("bom".to_string()));
        let token = started_timer(&effects);

        let (state, effects) = state.reduce(Event::SourceTextChanged(String::new()));
        assert_eq!(effects, vec![Effect::CancelTimer(token)]);

        let (_, effects) = state.reduce(Event::TimerFired(token));
        assert!(effects.is_empty());
    }

    #[test]
    fn clearing_text_discards_in_flight_result() {
        let state = SessionState::new("pt", "en");
        let (state, request) = type_and_fire(state, "bom dia");

        let (state, _) = state.reduce(Event::SourceTextChanged(String::new()));
        assert!(!state.is_loading);

        let (state, _) = state.reduce(Event::Resolved {
            revision: request.revision,
            outcome: Outcome::Translated("good morning".to_string()),
        });
        assert_eq!(state.translated_text, "");
        assert!(!state.is_loading);
    }

    #[test]
    fn older_response_never_overwrites_newer() {
        let state = SessionState::new("pt", "en");
        let (state, first) = type_and_fire(state, "um");
        let (state, second) = type_and_fire(state, "dois");
        assert!(second.revision > first.revision);

        let (state, _) = state.reduce(Event::Resolved {
            revision: second.revision,
            outcome: Outcome::Translated("two".to_string()),
        });
        let (state, _) = state.reduce(Event::Resolved {
            revision: first.revision,
            outcome: Outcome::Translated("one".to_string()),
        });
        assert_eq!(state.translated_text, "two");
        assert!(!state.is_loading);
    }

    #[test]
    fn response_for_edited_input_ends_loading_without_applying() {
        let state = SessionState::new("pt", "en");
        let (state, request) = type_and_fire(state, "bom");
        let (state, effects) = state.reduce(Event::SourceTextChanged("bom dia".to_string()));
        let token = started_timer(&effects);
        assert!(state.is_loading);

        let (state, _) = state.reduce(Event::Resolved {
            revision: request.revision,
            outcome: Outcome::Translated("good".to_string()),
        });
        assert_eq!(state.translated_text, "");
        assert!(!state.is_loading);
        assert_eq!(state.pending_timer(), Some(token));
    }

    #[test]
    fn unchanged_value_is_not_an_input_change() {
        let state = SessionState::new("pt", "en");
        let (state, _) = state.reduce(Event::SourceTextChanged("bom".to_string()));
        let revision = state.revision();
        let pending = state.pending_timer();

        let (state, effects) = state.reduce(Event::SourceLangChanged("pt".to_string()));
        assert!(effects.is_empty());
        assert_eq!(state.revision(), revision);
        assert_eq!(state.pending_timer(), pending);
    }

    #[test]
    fn same_source_and_target_is_allowed() {
        let state = SessionState::new("pt", "en");
        let (state, _) = state.reduce(Event::TargetLangChanged("pt".to_string()));
        let (_, request) = type_and_fire(state, "oi");
        assert_eq!(request.source, "pt");
        assert_eq!(request.target, "pt");
    }
}
