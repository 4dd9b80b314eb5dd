pub mod cancel;
pub mod event;
pub mod intent;
pub mod paragraph;
pub mod reactor;
pub mod reveal;
pub mod scheduler;
pub mod telemetry;
pub mod time;
