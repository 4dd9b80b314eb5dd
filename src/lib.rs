pub mod config;
pub mod error;
pub mod kernel;
pub mod services;

pub use error::{ChatError, Result};
pub use kernel::event::{Language, PresenterEvent, Utterance};
pub use kernel::intent::{IntentResolver, ResolvedReply, Section};
pub use kernel::reactor::{ChatReactor, ReactorConfig};
