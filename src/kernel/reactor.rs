use std::time::Duration;

use chrono::Local;
use tracing::{debug, info, warn};

use super::cancel::CancellationRegistry;
use super::event::{
    ExchangeId, InterruptionSource, Language, MessageId, PresenterEvent, Sender, Utterance,
};
use super::intent::types::ResolvedReply;
use super::paragraph::segment;
use super::reveal::{RevealSession, RevealStep, RevealTiming};
use super::scheduler::{FiredTimer, TimerKey, TimerScheduler};
use super::telemetry::event::{RevealEventKind, TelemetryEvent};
use super::telemetry::recorder::TelemetryRecorder;
use crate::error::ChatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactorConfig {
    pub timing: RevealTiming,
    /// Pause between a reply arriving and the host scrolling to its section.
    pub navigation_delay: Duration,
    pub language: Language,
}

impl Default for ReactorConfig {
    fn default() -> Self {
        Self {
            timing: RevealTiming::default(),
            navigation_delay: Duration::from_millis(1_000),
            language: Language::En,
        }
    }
}

/// Result of a user submission: the events to render now, and the utterance the host
/// must resolve (locally or over HTTP) and hand back through `deliver_reply`.
#[derive(Debug, Clone)]
pub struct Submission {
    pub exchange: ExchangeId,
    pub utterance: Utterance,
    pub events: Vec<PresenterEvent>,
}

/// Owns the single active reveal session and every timer scheduled for it.
///
/// All mutation happens on the caller's thread, in response to host calls or timer
/// firings handed back through [`ChatReactor::on_timer`]. Each call returns the
/// presenter events to execute, in order.
pub struct ChatReactor<S: TimerScheduler> {
    scheduler: S,
    config: ReactorConfig,
    language: Language,
    cancel_registry: CancellationRegistry,
    active: Option<RevealSession>,
    awaiting: Option<ExchangeId>,
    telemetry: TelemetryRecorder,
}

impl<S: TimerScheduler> ChatReactor<S> {
    pub fn new(scheduler: S, config: ReactorConfig) -> Self {
        Self {
            scheduler,
            language: config.language,
            config,
            cancel_registry: CancellationRegistry::new(),
            active: None,
            awaiting: None,
            telemetry: TelemetryRecorder::new(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn active_session(&self) -> Option<&RevealSession> {
        self.active.as_ref()
    }

    pub fn awaiting(&self) -> Option<ExchangeId> {
        self.awaiting
    }

    pub fn telemetry(&self) -> &TelemetryRecorder {
        &self.telemetry
    }

    /// Shows a user message at once and opens a new exchange for its reply.
    /// Any reveal still in progress is abandoned, not awaited.
    pub fn submit_user(&mut self, text: &str) -> Submission {
        let mut events = self.abandon_active(InterruptionSource::NewMessage);

        let message_id = MessageId::new();
        let mut session = RevealSession::new(message_id, segment(text), self.config.timing);
        let paragraphs = session.reveal_all();
        let last = paragraphs.len().saturating_sub(1);

        events.push(PresenterEvent::MessageStarted {
            message_id,
            sender: Sender::User,
            paragraphs: paragraphs.len(),
        });
        for paragraph in paragraphs {
            let index = paragraph.index;
            events.push(PresenterEvent::ParagraphRevealed {
                message_id,
                index,
                html: paragraph.html,
                timestamp: (index == last).then(Local::now),
            });
        }
        events.push(PresenterEvent::ScrollToLatest);
        events.push(PresenterEvent::TypingIndicator { visible: true });

        let exchange = ExchangeId::new();
        if let Some(previous) = self.awaiting.replace(exchange) {
            debug!(?previous, "superseded pending exchange");
        }

        Submission {
            exchange,
            utterance: Utterance::new(text, self.language),
            events,
        }
    }

    /// Stages a reply for the current exchange. Replies for superseded exchanges are dropped.
    pub fn deliver_reply(&mut self, exchange: ExchangeId, reply: ResolvedReply) -> Vec<PresenterEvent> {
        if !self.accept_exchange(exchange) {
            return Vec::new();
        }
        self.present(reply)
    }

    /// Renders the fixed fallback message for a failed exchange. Never retried.
    pub fn deliver_failure(&mut self, exchange: ExchangeId, error: &ChatError) -> Vec<PresenterEvent> {
        if !self.accept_exchange(exchange) {
            return Vec::new();
        }
        warn!(%error, "chat request failed");
        self.telemetry.record(TelemetryEvent::TransportFailure);
        self.present(ResolvedReply::transport_fallback(self.language))
    }

    /// Starts a staged bot message, replacing whatever session was active.
    pub fn present(&mut self, reply: ResolvedReply) -> Vec<PresenterEvent> {
        let mut events = self.abandon_active(InterruptionSource::NewMessage);

        let message_id = MessageId::new();
        let mut session = RevealSession::new(message_id, segment(&reply.body), self.config.timing);
        let total = session.len();

        events.push(PresenterEvent::MessageStarted {
            message_id,
            sender: Sender::Bot,
            paragraphs: total,
        });
        self.telemetry.record(TelemetryEvent::RevealLifecycle {
            message_id,
            event: RevealEventKind::Started { paragraphs: total },
        });

        match session.begin() {
            Some(delay) => {
                let id = self.scheduler.schedule(delay, TimerKey::Reveal { message_id });
                self.cancel_registry.track(id, message_id);
                events.push(PresenterEvent::TypingIndicator { visible: true });
            }
            None => {
                events.push(PresenterEvent::TypingIndicator { visible: false });
                events.push(PresenterEvent::SessionCompleted { message_id });
                self.telemetry.record(TelemetryEvent::RevealLifecycle {
                    message_id,
                    event: RevealEventKind::Completed,
                });
            }
        }

        if let Some(section) = reply.navigation_target {
            let id = self.scheduler.schedule(
                self.config.navigation_delay,
                TimerKey::Navigate { message_id, section },
            );
            self.cancel_registry.track(id, message_id);
        }

        debug!(?message_id, paragraphs = total, "reveal session started");
        self.active = Some(session);
        events
    }

    /// Handles a timer firing. Firings whose session is gone are ignored.
    pub fn on_timer(&mut self, fired: FiredTimer) -> Vec<PresenterEvent> {
        let owner = self.cancel_registry.settle(fired.id);
        let active_id = self.active.as_ref().map(RevealSession::message_id);

        if owner.is_none() || owner != active_id {
            debug!(timer = ?fired.id, "ignoring stale timer");
            self.telemetry.record(TelemetryEvent::StaleTimer);
            return Vec::new();
        }

        match fired.key {
            TimerKey::Navigate { section, .. } => vec![PresenterEvent::NavigateTo(section)],
            TimerKey::Reveal { .. } => self.reveal_step(),
        }
    }

    /// Switching language drops the active session and any pending exchange.
    pub fn switch_language(&mut self, language: Language) -> Vec<PresenterEvent> {
        let mut events = self.abandon_active(InterruptionSource::LanguageSwitch);
        self.drop_pending_exchange(&mut events);
        self.language = language;
        info!(%language, "chat language switched");
        events
    }

    pub fn close(&mut self) -> Vec<PresenterEvent> {
        let mut events = self.abandon_active(InterruptionSource::ChatClosed);
        self.drop_pending_exchange(&mut events);
        events
    }

    /// Cancels every outstanding timer. Also runs on drop.
    pub fn teardown(&mut self) -> Vec<PresenterEvent> {
        let mut events = self.abandon_active(InterruptionSource::Teardown);
        self.drop_pending_exchange(&mut events);
        self.cancel_registry.release_all();
        self.scheduler.cancel_all();
        events
    }

    /// Forgets the pending exchange. The indicator shown by `submit_user` is hidden
    /// unless abandoning the active session already did so.
    fn drop_pending_exchange(&mut self, events: &mut Vec<PresenterEvent>) {
        if self.awaiting.take().is_none() {
            return;
        }
        let hidden = events
            .iter()
            .any(|e| matches!(e, PresenterEvent::TypingIndicator { visible: false }));
        if !hidden {
            events.push(PresenterEvent::TypingIndicator { visible: false });
        }
    }

    fn accept_exchange(&mut self, exchange: ExchangeId) -> bool {
        if self.awaiting == Some(exchange) {
            self.awaiting = None;
            true
        } else {
            warn!(?exchange, "discarding reply for superseded exchange");
            self.telemetry.record(TelemetryEvent::StaleReply);
            false
        }
    }

    fn reveal_step(&mut self) -> Vec<PresenterEvent> {
        let Some(session) = self.active.as_mut() else {
            return Vec::new();
        };
        let message_id = session.message_id();
        let Some(RevealStep {
            paragraph,
            is_final,
            next_delay,
        }) = session.reveal_next()
        else {
            return Vec::new();
        };

        self.telemetry.record(TelemetryEvent::RevealLifecycle {
            message_id,
            event: RevealEventKind::ParagraphRevealed {
                index: paragraph.index,
            },
        });

        let mut events = vec![
            PresenterEvent::ParagraphRevealed {
                message_id,
                index: paragraph.index,
                html: paragraph.html,
                timestamp: is_final.then(Local::now),
            },
            PresenterEvent::ScrollToLatest,
        ];

        match next_delay {
            Some(delay) => {
                let id = self.scheduler.schedule(delay, TimerKey::Reveal { message_id });
                self.cancel_registry.track(id, message_id);
            }
            None => {
                events.push(PresenterEvent::TypingIndicator { visible: false });
                events.push(PresenterEvent::SessionCompleted { message_id });
                self.telemetry.record(TelemetryEvent::RevealLifecycle {
                    message_id,
                    event: RevealEventKind::Completed,
                });
                debug!(?message_id, "reveal session completed");
            }
        }

        events
    }

    fn abandon_active(&mut self, source: InterruptionSource) -> Vec<PresenterEvent> {
        let Some(session) = self.active.take() else {
            return Vec::new();
        };

        let message_id = session.message_id();
        for id in self.cancel_registry.release(message_id) {
            self.scheduler.cancel(id);
        }

        if !session.is_revealing() {
            return Vec::new();
        }

        let (revealed, total) = (session.revealed_count(), session.len());
        info!(?message_id, ?source, revealed, total, "abandoning reveal session");
        self.telemetry.record(TelemetryEvent::Interruption {
            source,
            revealed,
            total,
        });

        vec![
            PresenterEvent::SessionAbandoned {
                message_id,
                revealed,
                total,
                source,
            },
            PresenterEvent::TypingIndicator { visible: false },
        ]
    }
}

impl<S: TimerScheduler> Drop for ChatReactor<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
