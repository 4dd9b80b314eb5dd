use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::event::MessageId;
use super::paragraph::Paragraph;

/// Explicit lifecycle of one staged message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RevealState {
    /// Created, nothing scheduled yet.
    #[default]
    Idle,
    /// Waiting to show paragraph `i`. Paragraphs `0..i` are visible.
    Revealing(usize),
    /// Every paragraph is visible. Nothing left to schedule.
    Done,
}

/// Requests that move a session through its states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealSignal {
    /// Bot reply received: start staging.
    Begin,
    /// The pending timer fired: show the next paragraph.
    TimerFired,
    /// User message: show everything at once.
    ShowAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealTiming {
    /// Pause before the first paragraph, while the bubble pops in.
    pub display_delay: Duration,
    /// Pause between consecutive paragraphs.
    pub paragraph_delay: Duration,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            display_delay: Duration::from_millis(300),
            paragraph_delay: Duration::from_millis(2_000),
        }
    }
}

pub struct RevealGraph;

impl RevealGraph {
    /// Pure function: (current state, signal, paragraph count) -> next state.
    /// Returns None when the signal is not valid in the current state.
    pub fn transition(current: RevealState, signal: RevealSignal, total: usize) -> Option<RevealState> {
        use RevealSignal::*;
        use RevealState::*;

        match (current, signal) {
            (Idle, Begin) if total == 0 => Some(Done),
            (Idle, Begin) => Some(Revealing(0)),
            (Idle, ShowAll) => Some(Done),
            (Revealing(i), TimerFired) if i + 1 < total => Some(Revealing(i + 1)),
            (Revealing(i), TimerFired) if i < total => Some(Done),
            _ => None,
        }
    }
}

/// One paragraph shown by a timer firing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealStep {
    pub paragraph: Paragraph,
    pub is_final: bool,
    /// Delay before the following paragraph, absent once the session is done.
    pub next_delay: Option<Duration>,
}

/// Per-message staged reveal state.
///
/// Invariant: `revealed_count <= paragraphs.len()`, and the session is revealing
/// exactly when `revealed_count < paragraphs.len()`.
#[derive(Debug, Clone)]
pub struct RevealSession {
    message_id: MessageId,
    paragraphs: Vec<Paragraph>,
    revealed: usize,
    state: RevealState,
    timing: RevealTiming,
}

impl RevealSession {
    pub fn new(message_id: MessageId, paragraphs: Vec<Paragraph>, timing: RevealTiming) -> Self {
        Self {
            message_id,
            paragraphs,
            revealed: 0,
            state: RevealState::Idle,
            timing,
        }
    }

    pub fn message_id(&self) -> MessageId {
        self.message_id
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    pub fn is_revealing(&self) -> bool {
        self.revealed < self.paragraphs.len()
    }

    pub fn visible(&self) -> &[Paragraph] {
        &self.paragraphs[..self.revealed]
    }

    /// Starts staging. Returns the delay until the first paragraph, or None when
    /// there is nothing to show.
    pub fn begin(&mut self) -> Option<Duration> {
        let next = RevealGraph::transition(self.state, RevealSignal::Begin, self.len())?;
        self.state = next;
        match next {
            RevealState::Revealing(_) => Some(self.timing.display_delay),
            _ => None,
        }
    }

    /// Shows the pending paragraph. Returns None if no paragraph is pending.
    pub fn reveal_next(&mut self) -> Option<RevealStep> {
        let RevealState::Revealing(index) = self.state else {
            return None;
        };
        let next = RevealGraph::transition(self.state, RevealSignal::TimerFired, self.len())?;
        let paragraph = self.paragraphs.get(index)?.clone();

        self.state = next;
        self.revealed = index + 1;

        let is_final = next == RevealState::Done;
        Some(RevealStep {
            paragraph,
            is_final,
            next_delay: (!is_final).then_some(self.timing.paragraph_delay),
        })
    }

    /// Skips staging entirely. Only valid before anything was scheduled.
    pub fn reveal_all(&mut self) -> Vec<Paragraph> {
        match RevealGraph::transition(self.state, RevealSignal::ShowAll, self.len()) {
            Some(next) => {
                self.state = next;
                self.revealed = self.paragraphs.len();
                self.paragraphs.clone()
            }
            None => Vec::new(),
        }
    }
}
