use std::collections::VecDeque;

use serde::Serialize;

use super::event::{ResolutionKind, RevealEventKind, TelemetryEvent};
use crate::kernel::event::InterruptionSource;

#[derive(Debug, Clone, Default, Serialize)]
pub struct TelemetrySnapshot {
    pub resolution_stats: ResolutionStats,
    pub reveal_stats: RevealStats,
    pub interruption_stats: InterruptionStats,
    pub transport_failures: u64,
    pub stale_replies: u64,
    pub stale_timers: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolutionStats {
    pub total: u64,
    pub exact: u64,
    pub keyword: u64,
    pub fallback: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RevealStats {
    pub sessions_started: u64,
    pub sessions_completed: u64,
    pub paragraphs_revealed: u64,
    pub avg_paragraphs_per_session: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InterruptionStats {
    pub count: u64,
    pub new_message: u64,
    pub language_switch: u64,
    pub chat_closed: u64,
    pub teardown: u64,
    /// Paragraphs that were scheduled but never shown.
    pub paragraphs_dropped: u64,
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();
    let mut staged_paragraphs: u64 = 0;

    for event in events {
        match event {
            TelemetryEvent::Resolution { kind, .. } => {
                snap.resolution_stats.total += 1;
                match kind {
                    ResolutionKind::Exact => snap.resolution_stats.exact += 1,
                    ResolutionKind::Keyword => snap.resolution_stats.keyword += 1,
                    ResolutionKind::Fallback => snap.resolution_stats.fallback += 1,
                }
            }
            TelemetryEvent::RevealLifecycle { event, .. } => match event {
                RevealEventKind::Started { paragraphs } => {
                    snap.reveal_stats.sessions_started += 1;
                    staged_paragraphs += *paragraphs as u64;
                }
                RevealEventKind::ParagraphRevealed { .. } => snap.reveal_stats.paragraphs_revealed += 1,
                RevealEventKind::Completed => snap.reveal_stats.sessions_completed += 1,
            },
            TelemetryEvent::Interruption { source, revealed, total } => {
                snap.interruption_stats.count += 1;
                snap.interruption_stats.paragraphs_dropped += total.saturating_sub(*revealed) as u64;
                match source {
                    InterruptionSource::NewMessage => snap.interruption_stats.new_message += 1,
                    InterruptionSource::LanguageSwitch => snap.interruption_stats.language_switch += 1,
                    InterruptionSource::ChatClosed => snap.interruption_stats.chat_closed += 1,
                    InterruptionSource::Teardown => snap.interruption_stats.teardown += 1,
                }
            }
            TelemetryEvent::StaleReply => snap.stale_replies += 1,
            TelemetryEvent::StaleTimer => snap.stale_timers += 1,
            TelemetryEvent::TransportFailure => snap.transport_failures += 1,
        }
    }

    if snap.reveal_stats.sessions_started > 0 {
        snap.reveal_stats.avg_paragraphs_per_session =
            staged_paragraphs as f64 / snap.reveal_stats.sessions_started as f64;
    }

    snap
}
