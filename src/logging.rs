//! Tracing subscriber setup.

use std::io::IsTerminal;

use tracing::Subscriber;
use tracing_subscriber::{
    filter::ParseError,
    fmt::MakeWriter,
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::config::{LogFormat, DEFAULT_LOG_FILTER, STARTUP_LOG_DIRECTIVE};

/// Resolve the log filter with priority: RUST_LOG > default.
pub fn log_filter() -> String {
    std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string())
}

/// Build the filter from `directives`, always keeping the startup line.
pub fn build_filter(directives: &str) -> Result<EnvFilter, ParseError> {
    Ok(EnvFilter::new(directives).add_directive(STARTUP_LOG_DIRECTIVE.parse()?))
}

/// Formatting layer for `format`, writing through `writer`.
pub fn fmt_layer<S, W>(format: LogFormat, writer: W, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(ansi)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .boxed(),
    }
}

/// Install the global tracing subscriber, writing to stdout.
///
/// Colours are only used when stdout is a terminal.
pub fn init(format: LogFormat) -> Result<(), ParseError> {
    let ansi = std::io::stdout().is_terminal();

    tracing_subscriber::registry()
        .with(build_filter(&log_filter())?)
        .with(fmt_layer(format, std::io::stdout, ansi))
        .init();

    Ok(())
}

/// In-memory log sink for asserting on emitted lines.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

#[cfg(test)]
impl CapturedLogs {
    /// Route this thread's events through `directives` into the buffer.
    pub(crate) fn install(&self, directives: &str) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::registry()
            .with(build_filter(directives).unwrap())
            .with(fmt_layer(LogFormat::Text, self.clone(), false));
        tracing::subscriber::set_default(subscriber)
    }

    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

#[cfg(test)]
impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
