// src/utils/common.rs

use indicatif::{ProgressBar, ProgressStyle};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogFormat;

/// Installs the global tracing subscriber writing to stderr.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Keep the returned
/// guard alive until exit or buffered log lines are lost.
pub fn init_tracing(format: LogFormat) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(writer);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    guard
}

/// Spinner for inputs of unknown length, or a bar when `total_items` is known.
pub fn create_progress_bar(total_items: u64, message: &str, template: &str) -> ProgressBar {
    let pb = if total_items == 0 {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::new(total_items)
    };
    pb.set_message(message.to_string());
    pb.set_style(
        ProgressStyle::default_bar()
            .template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_progress_bar() {
        let spinner = create_progress_bar(0, "Reading", "{spinner} {msg} {pos}");
        assert_eq!(spinner.length(), None);
        let bar = create_progress_bar(10, "Reading", "{bar} {pos}/{len}");
        assert_eq!(bar.length(), Some(10));
        bar.inc(3);
        assert_eq!(bar.position(), 3);
    }
}
