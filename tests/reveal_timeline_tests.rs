use std::time::Duration;

use folio_chat::kernel::event::{InterruptionSource, Language, PresenterEvent, Sender};
use folio_chat::kernel::intent::rules::QUICK_ABOUT_EN;
use folio_chat::kernel::intent::types::{ResolvedReply, Section, TRANSPORT_FALLBACK_EN};
use folio_chat::kernel::intent::IntentResolver;
use folio_chat::kernel::reactor::{ChatReactor, ReactorConfig};
use folio_chat::kernel::reveal::{RevealState, RevealTiming};
use folio_chat::kernel::scheduler::{ManualScheduler, TimerScheduler};
use folio_chat::kernel::time::Tick;
use folio_chat::ChatError;

const DISPLAY_MS: u64 = 300;
const PARAGRAPH_MS: u64 = 2_000;
const NAVIGATION_MS: u64 = 1_000;

fn reactor() -> ChatReactor<ManualScheduler> {
    let config = ReactorConfig {
        timing: RevealTiming {
            display_delay: Duration::from_millis(DISPLAY_MS),
            paragraph_delay: Duration::from_millis(PARAGRAPH_MS),
        },
        navigation_delay: Duration::from_millis(NAVIGATION_MS),
        language: Language::En,
    };
    ChatReactor::new(ManualScheduler::new(), config)
}

fn three_paragraphs() -> ResolvedReply {
    ResolvedReply {
        body: "<p>one</p><p>two</p><p>three</p>".to_string(),
        navigation_target: None,
    }
}

/// Fires every timer due up to `until_ms`, returning events stamped with their firing time.
fn run_until(reactor: &mut ChatReactor<ManualScheduler>, until_ms: u64) -> Vec<(u64, PresenterEvent)> {
    let until = Tick { ms: until_ms };
    let mut out = Vec::new();
    while let Some(fired) = reactor.scheduler_mut().pop_due(until) {
        let at = fired.at.ms;
        out.extend(reactor.on_timer(fired).into_iter().map(|e| (at, e)));
    }
    reactor.scheduler_mut().advance_to(until);
    out
}

fn reveals(events: &[(u64, PresenterEvent)]) -> Vec<(u64, usize)> {
    events
        .iter()
        .filter_map(|(at, e)| match e {
            PresenterEvent::ParagraphRevealed { index, .. } => Some((*at, *index)),
            _ => None,
        })
        .collect()
}

#[test]
fn three_paragraphs_reveal_on_cadence() {
    let mut reactor = reactor();
    let started = reactor.present(three_paragraphs());

    assert!(matches!(
        started[0],
        PresenterEvent::MessageStarted { sender: Sender::Bot, paragraphs: 3, .. }
    ));
    assert!(started.contains(&PresenterEvent::TypingIndicator { visible: true }));
    assert!(!started.iter().any(PresenterEvent::is_reveal));

    let events = run_until(&mut reactor, 60_000);
    assert_eq!(
        reveals(&events),
        vec![
            (DISPLAY_MS, 0),
            (DISPLAY_MS + PARAGRAPH_MS, 1),
            (DISPLAY_MS + 2 * PARAGRAPH_MS, 2)
        ]
    );

    // Typing indicator stays up between paragraphs and drops right after the last one.
    let hide_at: Vec<u64> = events
        .iter()
        .filter(|(_, e)| *e == PresenterEvent::TypingIndicator { visible: false })
        .map(|(at, _)| *at)
        .collect();
    assert_eq!(hide_at, vec![DISPLAY_MS + 2 * PARAGRAPH_MS]);

    let completed = events
        .iter()
        .position(|(_, e)| matches!(e, PresenterEvent::SessionCompleted { .. }))
        .unwrap();
    let last_reveal = events.iter().rposition(|(_, e)| e.is_reveal()).unwrap();
    assert!(completed > last_reveal);

    let session = reactor.active_session().unwrap();
    assert_eq!(session.state(), RevealState::Done);
    assert_eq!(session.revealed_count(), 3);
    assert_eq!(reactor.scheduler().pending(), 0);
}

#[test]
fn only_the_final_paragraph_is_timestamped() {
    let mut reactor = reactor();
    reactor.present(three_paragraphs());
    let events = run_until(&mut reactor, 60_000);

    let stamps: Vec<bool> = events
        .iter()
        .filter_map(|(_, e)| match e {
            PresenterEvent::ParagraphRevealed { timestamp, .. } => Some(timestamp.is_some()),
            _ => None,
        })
        .collect();
    assert_eq!(stamps, vec![false, false, true]);
}

#[test]
fn teardown_mid_reveal_stops_everything() {
    let mut reactor = reactor();
    reactor.present(three_paragraphs());

    let before = run_until(&mut reactor, DISPLAY_MS + PARAGRAPH_MS + 10);
    assert_eq!(reveals(&before).len(), 2);

    let torn = reactor.teardown();
    assert!(torn.contains(&PresenterEvent::TypingIndicator { visible: false }));
    assert!(torn.iter().any(|e| matches!(
        e,
        PresenterEvent::SessionAbandoned {
            revealed: 2,
            total: 3,
            source: InterruptionSource::Teardown,
            ..
        }
    )));

    assert_eq!(reactor.scheduler().pending(), 0);
    assert!(run_until(&mut reactor, 600_000).is_empty());
}

#[test]
fn new_user_message_abandons_the_reveal_immediately() {
    let mut reactor = reactor();
    reactor.present(three_paragraphs());
    run_until(&mut reactor, DISPLAY_MS);

    let submission = reactor.submit_user("wait, one more thing");
    assert!(matches!(
        submission.events[0],
        PresenterEvent::SessionAbandoned {
            revealed: 1,
            total: 3,
            source: InterruptionSource::NewMessage,
            ..
        }
    ));
    assert_eq!(reactor.scheduler().pending(), 0);
    assert!(run_until(&mut reactor, 600_000).is_empty());
}

#[test]
fn user_messages_skip_staging() {
    let mut reactor = reactor();
    let submission = reactor.submit_user("first\n\nsecond");

    let revealed: Vec<(usize, bool)> = submission
        .events
        .iter()
        .filter_map(|e| match e {
            PresenterEvent::ParagraphRevealed { index, timestamp, .. } => Some((*index, timestamp.is_some())),
            _ => None,
        })
        .collect();
    assert_eq!(revealed, vec![(0, false), (1, true)]);
    assert!(matches!(
        submission.events[0],
        PresenterEvent::MessageStarted { sender: Sender::User, paragraphs: 2, .. }
    ));
    assert_eq!(submission.utterance.text, "first\n\nsecond");
    assert_eq!(reactor.scheduler().pending(), 0);
    assert_eq!(reactor.awaiting(), Some(submission.exchange));
}

#[test]
fn late_timer_after_replacement_is_ignored() {
    let mut reactor = reactor();
    reactor.present(three_paragraphs());

    // The firing is already in hand when the session gets replaced.
    let fired = reactor.scheduler_mut().pop_due(Tick { ms: DISPLAY_MS }).unwrap();
    reactor.submit_user("hello");

    assert!(reactor.on_timer(fired).is_empty());
    assert_eq!(reactor.telemetry().snapshot().stale_timers, 1);
}

#[test]
fn replies_for_superseded_exchanges_are_dropped() {
    let mut reactor = reactor();
    let resolver = IntentResolver::new();

    let first = reactor.submit_user("hello");
    let second = reactor.submit_user("bye");

    let stale = reactor.deliver_reply(first.exchange, resolver.resolve_utterance(&first.utterance));
    assert!(stale.is_empty());

    let fresh = reactor.deliver_reply(second.exchange, resolver.resolve_utterance(&second.utterance));
    assert!(matches!(fresh[0], PresenterEvent::MessageStarted { sender: Sender::Bot, .. }));

    // Delivering twice for the same exchange is also stale.
    assert!(reactor
        .deliver_reply(second.exchange, resolver.resolve_utterance(&second.utterance))
        .is_empty());
    assert_eq!(reactor.telemetry().snapshot().stale_replies, 2);
}

#[test]
fn navigation_fires_after_its_own_delay() {
    let mut reactor = reactor();
    let resolver = IntentResolver::new();
    let submission = reactor.submit_user(QUICK_ABOUT_EN);
    reactor.deliver_reply(submission.exchange, resolver.resolve_utterance(&submission.utterance));

    let events = run_until(&mut reactor, 60_000);
    let navigations: Vec<(u64, Section)> = events
        .iter()
        .filter_map(|(at, e)| match e {
            PresenterEvent::NavigateTo(section) => Some((*at, *section)),
            _ => None,
        })
        .collect();
    assert_eq!(navigations, vec![(NAVIGATION_MS, Section::About)]);

    let times: Vec<u64> = reveals(&events).into_iter().map(|(at, _)| at).collect();
    let expected: Vec<u64> = (0..5).map(|i| DISPLAY_MS + i * PARAGRAPH_MS).collect();
    assert_eq!(times, expected);
}

#[test]
fn navigation_is_cancelled_with_its_session() {
    let mut reactor = reactor();
    reactor.present(ResolvedReply {
        body: "<p>Have a look.</p>".to_string(),
        navigation_target: Some(Section::Work),
    });
    run_until(&mut reactor, DISPLAY_MS);

    // Reveal already finished; only the pending scroll is left and must still be dropped.
    assert_eq!(reactor.scheduler().pending(), 1);
    let closed = reactor.close();
    assert!(closed.is_empty());
    assert_eq!(reactor.scheduler().pending(), 0);
    assert!(run_until(&mut reactor, 60_000).is_empty());
}

#[test]
fn language_switch_cancels_and_drops_pending_exchange() {
    let mut reactor = reactor();
    let submission = reactor.submit_user("hello");

    let events = reactor.switch_language(Language::Cn);
    assert_eq!(events, vec![PresenterEvent::TypingIndicator { visible: false }]);
    assert_eq!(reactor.language(), Language::Cn);
    assert_eq!(reactor.awaiting(), None);

    let late = reactor.deliver_reply(submission.exchange, IntentResolver::new().resolve("hello", Language::En));
    assert!(late.is_empty());

    let next = reactor.submit_user("你好");
    assert_eq!(next.utterance.language, Language::Cn);

    reactor.present(three_paragraphs());
    let switched = reactor.switch_language(Language::En);
    assert!(switched.iter().any(|e| matches!(
        e,
        PresenterEvent::SessionAbandoned {
            revealed: 0,
            source: InterruptionSource::LanguageSwitch,
            ..
        }
    )));
}

fn last_typing(events: &[PresenterEvent]) -> Option<bool> {
    events.iter().rev().find_map(|e| match e {
        PresenterEvent::TypingIndicator { visible } => Some(*visible),
        _ => None,
    })
}

#[test]
fn closing_while_awaiting_reply_hides_typing() {
    let mut reactor = reactor();
    let submission = reactor.submit_user("hello");
    assert_eq!(last_typing(&submission.events), Some(true));

    let closed = reactor.close();
    assert_eq!(last_typing(&closed), Some(false));
    assert_eq!(reactor.awaiting(), None);

    // Nothing left to hide on a second close.
    assert!(reactor.close().is_empty());
}

#[test]
fn teardown_while_awaiting_reply_hides_typing() {
    let mut reactor = reactor();
    reactor.submit_user("hello");
    assert_eq!(last_typing(&reactor.teardown()), Some(false));
}

#[test]
fn abandoned_reveal_hides_typing_only_once() {
    let mut reactor = reactor();
    reactor.present(three_paragraphs());
    reactor.submit_user("hello");

    // The user message abandoned the reveal; the close only has the pending exchange left.
    let closed = reactor.close();
    let hides = closed
        .iter()
        .filter(|e| matches!(e, PresenterEvent::TypingIndicator { visible: false }))
        .count();
    assert_eq!(hides, 1);
}

#[test]
fn transport_failure_renders_fallback_message() {
    let mut reactor = reactor();
    let submission = reactor.submit_user("hello");

    let events = reactor.deliver_failure(submission.exchange, &ChatError::Status(502));
    assert!(matches!(events[0], PresenterEvent::MessageStarted { sender: Sender::Bot, paragraphs: 1, .. }));

    let revealed = run_until(&mut reactor, 60_000);
    let html: Vec<&str> = revealed
        .iter()
        .filter_map(|(_, e)| match e {
            PresenterEvent::ParagraphRevealed { html, .. } => Some(html.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(html, vec![TRANSPORT_FALLBACK_EN]);
    assert_eq!(reactor.telemetry().snapshot().transport_failures, 1);
}
