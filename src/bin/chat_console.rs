use std::collections::HashMap;
use std::sync::Arc;

use folio_chat::config::ChatConfig;
use folio_chat::kernel::event::{ExchangeId, Language, MessageId, PresenterEvent, Sender};
use folio_chat::kernel::intent::types::ResolvedReply;
use folio_chat::kernel::scheduler::{FiredTimer, TokioScheduler};
use folio_chat::services::client::ChatClient;
use folio_chat::{ChatError, ChatReactor, IntentResolver};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

// Internal driver events (never touch the reactor directly)
enum DriverEvent {
    Replied { exchange: ExchangeId, reply: ResolvedReply },
    Failed { exchange: ExchangeId, error: ChatError },
}

enum Step {
    Line(Option<String>),
    Timer(FiredTimer),
    Driver(DriverEvent),
}

/// Where replies come from: the local rule table or a remote endpoint.
#[derive(Clone)]
enum Backend {
    Local(Arc<IntentResolver>, std::time::Duration),
    Remote(ChatClient),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Setup Logging (stderr, so transcript output stays clean)
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ChatConfig::from_env()?;
    let backend = match &config.endpoint {
        Some(endpoint) => {
            tracing::info!(%endpoint, "using remote chat endpoint");
            Backend::Remote(ChatClient::new(endpoint.clone(), config.request_timeout())?)
        }
        None => Backend::Local(Arc::new(IntentResolver::new()), config.processing_delay()),
    };

    // 2. Setup Reactor + Channels
    let (scheduler, mut fired_rx) = TokioScheduler::new();
    let mut reactor = ChatReactor::new(scheduler, config.reactor_config());
    let (driver_tx, mut driver_rx) = mpsc::channel::<DriverEvent>(16);
    let mut in_flight: Option<JoinHandle<()>> = None;
    let mut transcript = Transcript::default();

    println!("Say hello, or try 'I have a question'. Commands: /lang en|cn, /close, /quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let step = tokio::select! {
            line = lines.next_line() => Step::Line(line?),
            Some(fired) = fired_rx.recv() => Step::Timer(fired),
            Some(event) = driver_rx.recv() => Step::Driver(event),
        };

        let events = match step {
            Step::Line(None) => break,
            Step::Line(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "/quit" {
                    break;
                }
                if line == "/close" {
                    abort(&mut in_flight);
                    reactor.close()
                } else if let Some(tag) = line.strip_prefix("/lang") {
                    match tag.parse::<Language>() {
                        Ok(language) => {
                            abort(&mut in_flight);
                            reactor.switch_language(language)
                        }
                        Err(error) => {
                            println!("  ({error})");
                            continue;
                        }
                    }
                } else {
                    // A new message supersedes whatever request was still running.
                    abort(&mut in_flight);
                    let submission = reactor.submit_user(line);
                    in_flight = Some(spawn_request(
                        backend.clone(),
                        submission.exchange,
                        submission.utterance,
                        driver_tx.clone(),
                    ));
                    submission.events
                }
            }
            Step::Timer(fired) => reactor.on_timer(fired),
            Step::Driver(DriverEvent::Replied { exchange, reply }) => reactor.deliver_reply(exchange, reply),
            Step::Driver(DriverEvent::Failed { exchange, error }) => reactor.deliver_failure(exchange, &error),
        };

        transcript.render(&events);
    }

    abort(&mut in_flight);
    let events = reactor.teardown();
    transcript.render(&events);
    tracing::info!(snapshot = ?reactor.telemetry().snapshot(), "console session ended");
    Ok(())
}

fn abort(task: &mut Option<JoinHandle<()>>) {
    if let Some(task) = task.take() {
        task.abort();
    }
}

fn spawn_request(
    backend: Backend,
    exchange: ExchangeId,
    utterance: folio_chat::Utterance,
    tx: mpsc::Sender<DriverEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let event = match backend {
            Backend::Local(resolver, delay) => {
                tokio::time::sleep(delay).await;
                DriverEvent::Replied {
                    exchange,
                    reply: resolver.resolve_utterance(&utterance),
                }
            }
            Backend::Remote(client) => match client.send(&utterance).await {
                Ok(reply) => DriverEvent::Replied { exchange, reply },
                Err(error) => DriverEvent::Failed { exchange, error },
            },
        };
        let _ = tx.send(event).await;
    })
}

/// Plain-text sink for presenter events.
#[derive(Default)]
struct Transcript {
    senders: HashMap<MessageId, Sender>,
    typing: bool,
}

impl Transcript {
    fn render(&mut self, events: &[PresenterEvent]) {
        for event in events {
            match event {
                PresenterEvent::MessageStarted { message_id, sender, .. } => {
                    self.senders.insert(*message_id, *sender);
                }
                PresenterEvent::ParagraphRevealed {
                    message_id,
                    html,
                    timestamp,
                    ..
                } => {
                    let who = match self.senders.get(message_id) {
                        Some(Sender::User) => "you",
                        _ => "bot",
                    };
                    match timestamp {
                        Some(at) => {
                            println!("{who}> {}  [{}]", strip_tags(html), at.format("%H:%M"));
                            self.senders.remove(message_id);
                        }
                        None => println!("{who}> {}", strip_tags(html)),
                    }
                }
                PresenterEvent::TypingIndicator { visible } => {
                    if *visible && !self.typing {
                        println!("  (typing…)");
                    }
                    self.typing = *visible;
                }
                PresenterEvent::ScrollToLatest => {}
                PresenterEvent::NavigateTo(section) => println!("  -> scrolling to #{section}"),
                PresenterEvent::SessionCompleted { .. } => {}
                PresenterEvent::SessionAbandoned {
                    message_id,
                    revealed,
                    total,
                    ..
                } => {
                    self.senders.remove(message_id);
                    println!("  (reply cut short after {revealed}/{total} paragraphs)");
                }
            }
        }
    }
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}
