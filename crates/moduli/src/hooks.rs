//! Ready-made change hooks: structured `tracing` events and plain text.
//!
//! Both hooks are configured with options applied to their own config type.
//! The tracing hook layers the caller's options over its defaults with
//! [`with_defaults`]; the console hook starts from stdout.

use std::fmt::Debug;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use moduli_track::Change;
use tracing::{Dispatch, Level};

use crate::apply::new;
use crate::combinators::with_defaults;
use crate::option::Opt;
use crate::trackable::Target;

/// Message used by [`tracing_hook`] unless overridden.
pub const DEFAULT_TRACING_MESSAGE: &str = "moduli option applied";

/// Configuration for [`tracing_hook`].
#[derive(Clone)]
pub struct TracingHookConfig {
    level: Level,
    message: String,
    dispatch: Option<Dispatch>,
}

impl Default for TracingHookConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            message: String::new(),
            dispatch: None,
        }
    }
}

impl Target for TracingHookConfig {}

/// Sets the level events are emitted at.
pub fn with_tracing_level(level: Level) -> Opt<TracingHookConfig> {
    Opt::new(move |cfg: &mut TracingHookConfig| cfg.level = level)
}

/// Sets the event message.
pub fn with_tracing_message(message: impl Into<String>) -> Opt<TracingHookConfig> {
    let message = message.into();
    Opt::new(move |cfg: &mut TracingHookConfig| cfg.message = message.clone())
}

/// Sends events to `dispatch` instead of the default dispatcher active where
/// the hook runs.
pub fn with_tracing_dispatch(dispatch: Dispatch) -> Opt<TracingHookConfig> {
    Opt::new(move |cfg: &mut TracingHookConfig| cfg.dispatch = Some(dispatch.clone()))
}

macro_rules! emit_change {
    ($level:expr, $cfg:ident, $change:ident) => {
        tracing::event!(
            $level,
            name = %$change.name(),
            before = ?$change.before(),
            after = ?$change.after(),
            "{}",
            $cfg.message
        )
    };
}

fn emit<T: Debug>(cfg: &TracingHookConfig, change: &Change<T>) {
    if cfg.level == Level::ERROR {
        emit_change!(Level::ERROR, cfg, change)
    } else if cfg.level == Level::WARN {
        emit_change!(Level::WARN, cfg, change)
    } else if cfg.level == Level::INFO {
        emit_change!(Level::INFO, cfg, change)
    } else if cfg.level == Level::DEBUG {
        emit_change!(Level::DEBUG, cfg, change)
    } else {
        emit_change!(Level::TRACE, cfg, change)
    }
}

/// Returns a change hook that emits one `tracing` event per change, with
/// `name`, `before` and `after` fields.
///
/// ```ignore
/// rocket.tracking.tracker().register_hook(tracing_hook::<Rocket, _>([
///     with_tracing_level(Level::DEBUG),
/// ]));
/// ```
pub fn tracing_hook<T, I>(opts: I) -> impl Fn(&Change<T>) + Send + Sync + 'static
where
    T: Debug + 'static,
    I: IntoIterator<Item = Opt<TracingHookConfig>>,
{
    let cfg: TracingHookConfig = new([with_defaults(
        opts,
        [
            with_tracing_level(Level::INFO),
            with_tracing_message(DEFAULT_TRACING_MESSAGE),
        ],
    )]);

    move |change: &Change<T>| match &cfg.dispatch {
        Some(dispatch) => tracing::dispatcher::with_default(dispatch, || emit(&cfg, change)),
        None => emit(&cfg, change),
    }
}

/// Writer shared between a [`ConsoleHookConfig`] and the hook built from it.
pub type SharedWriter = Arc<Mutex<dyn Write + Send>>;

/// Configuration for [`console_hook`]. Writes to stdout by default.
#[derive(Clone)]
pub struct ConsoleHookConfig {
    writer: SharedWriter,
}

impl Default for ConsoleHookConfig {
    fn default() -> Self {
        Self {
            writer: Arc::new(Mutex::new(io::stdout())),
        }
    }
}

impl Target for ConsoleHookConfig {}

/// Sets the output to the given writer.
pub fn with_console_writer<W>(writer: W) -> Opt<ConsoleHookConfig>
where
    W: Write + Send + 'static,
{
    let writer: SharedWriter = Arc::new(Mutex::new(writer));
    with_shared_console_writer(writer)
}

/// Sets the output to an already shared writer.
pub fn with_shared_console_writer(writer: SharedWriter) -> Opt<ConsoleHookConfig> {
    Opt::new(move |cfg: &mut ConsoleHookConfig| cfg.writer = Arc::clone(&writer))
}

/// Returns a change hook that writes each change as text to stdout or the
/// configured writer:
///
/// ```text
/// name:
///     before: ..
///     after:  ..
/// ```
///
/// Write failures are logged and otherwise ignored.
pub fn console_hook<T, I>(opts: I) -> impl Fn(&Change<T>) + Send + Sync + 'static
where
    T: Debug + 'static,
    I: IntoIterator<Item = Opt<ConsoleHookConfig>>,
{
    let ConsoleHookConfig { writer } = new(opts);

    move |change: &Change<T>| {
        let mut out = writer.lock().unwrap_or_else(PoisonError::into_inner);
        let written = write!(
            out,
            "{}:\n\tbefore: {:?}\n\tafter:  {:?}\n\n",
            change.name(),
            change.before(),
            change.after()
        )
        .and_then(|()| out.flush());
        if let Err(err) = written {
            tracing::warn!(error = %err, change = %change.name(), "console hook write failed");
        }
    }
}
