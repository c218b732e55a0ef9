//! Logging sink for a check invocation.
//!
//! Stdout carries the plugin output only, so log records go to stderr. ERROR
//! records are also forwarded to the system log. The sink is returned as a
//! [`Dispatch`] and handed to the invocation instead of being installed
//! process-wide.

use std::ffi::CString;
use std::fmt::{self, Write};
use tracing::field::{Field, Visit};
use tracing::{Dispatch, Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{fmt as tracing_fmt, Layer, Registry};

const SYSLOG_FORMAT: &[u8] = b"%s\0";

/// Builds the logging sink: stderr filtered at `level`, plus syslog at ERROR
/// when `syslog_ident` is given.
pub fn build_dispatch(level: LevelFilter, syslog_ident: Option<&str>) -> Dispatch {
    let stderr = tracing_fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(level);

    let syslog = syslog_ident.map(SyslogLayer::new);

    Dispatch::new(Registry::default().with(stderr).with(syslog))
}

/// Stderr level: the configured level, raised to DEBUG by `-vvv`.
pub fn effective_level(configured: LevelFilter, verbose: u8) -> LevelFilter {
    if verbose >= 3 {
        configured.max(LevelFilter::DEBUG)
    } else {
        configured
    }
}

/// Forwards ERROR events to syslog(3) with facility `LOG_USER`.
pub struct SyslogLayer {
    // openlog keeps the pointer, so the string must outlive the connection.
    _ident: CString,
}

impl SyslogLayer {
    pub fn new(ident: &str) -> Self {
        let ident = CString::new(ident).unwrap_or_default();
        // SAFETY: `ident` is NUL-terminated and stays alive as long as the layer.
        unsafe { libc::openlog(ident.as_ptr(), libc::LOG_PID, libc::LOG_USER) };
        Self { _ident: ident }
    }
}

impl Drop for SyslogLayer {
    fn drop(&mut self) {
        // SAFETY: closelog has no preconditions.
        unsafe { libc::closelog() };
    }
}

impl<S: Subscriber> Layer<S> for SyslogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if *metadata.level() != Level::ERROR {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let line = format_syslog_line(metadata.target(), &visitor.finish());

        if let Ok(line) = CString::new(line) {
            // SAFETY: both the format and the argument are NUL-terminated C strings.
            unsafe {
                libc::syslog(
                    libc::LOG_ERR,
                    SYSLOG_FORMAT.as_ptr() as *const libc::c_char,
                    line.as_ptr(),
                )
            };
        }
    }
}

/// `<target> - ERROR - <message>`
pub fn format_syslog_line(target: &str, message: &str) -> String {
    format!("{target} - ERROR - {message}")
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        format!("{}{}", self.message, self.fields)
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}
