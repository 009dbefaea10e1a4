use std::io;
use std::path::Path;

use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, MakeWriter, format::FmtSpan},
    layer::Layered,
    prelude::*,
    registry::LookupSpan,
};

use crate::cli::Cli;

type Filtered = Layered<EnvFilter, Registry>;

/// Installs the global subscriber. The returned guard must outlive the
/// command so buffered file logs are flushed.
pub fn init_logging(cli: &Cli) -> Option<WorkerGuard> {
    let level = cli.log_level.as_tracing_level();
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let (layer, guard): (Box<dyn Layer<Filtered> + Send + Sync>, _) = match cli.log_file {
        Some(ref log_file) => {
            let (parent, filename) = log_file_parts(log_file);
            let file_appender = tracing_appender::rolling::never(parent, filename);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            (output_layer(non_blocking, cli.log_json, false), Some(guard))
        }
        None => (output_layer(io::stderr, cli.log_json, true), None),
    };

    tracing_subscriber::registry().with(filter).with(layer).init();
    guard
}

/// Formatting layer writing to `writer`. Span close events carry the busy
/// and idle time of `run_scan` and of each processed file.
fn output_layer<S, W>(writer: W, json: bool, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_span_events(FmtSpan::CLOSE);

    if json {
        layer.json().boxed()
    } else {
        layer.with_ansi(ansi).with_target(false).boxed()
    }
}

fn log_file_parts(path: &Path) -> (&Path, &str) {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("autopilot.log");

    (parent, filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::LogLevel;
    use std::sync::{Arc, Mutex};
    use tracing::Level;

    fn parse_cli(args: &[&str]) -> Cli {
        use clap::Parser;
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn warn_level_filters_info_messages() {
        let warn_level = LogLevel::Warn.as_tracing_level();
        let info_level = LogLevel::Info.as_tracing_level();
        assert_eq!(warn_level, Level::WARN);
        assert!(warn_level < info_level);
    }

    #[test]
    fn debug_level_includes_info_messages() {
        let debug_level = LogLevel::Debug.as_tracing_level();
        assert!(debug_level > LogLevel::Info.as_tracing_level());
    }

    #[test]
    fn default_log_level_is_warn() {
        let cli = parse_cli(&["autopilot", "scan", "."]);
        assert_eq!(cli.log_level, LogLevel::Warn);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn json_layer_reports_scan_spans() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.css"), "a:focus-visible { b: c; }").unwrap();
        let captured = Captured::default();
        let subscriber =
            tracing_subscriber::registry().with(output_layer(captured.clone(), true, false));

        tracing::subscriber::with_default(subscriber, || {
            autopilot_core::run_scan(dir.path());
        });

        let output = captured.text();
        assert!(output.contains("scan finished"));
        assert!(output.contains("run_scan"));
        assert!(output.contains("\"message\":\"close\""));
    }

    #[test]
    fn bare_file_name_logs_to_current_directory() {
        let (parent, filename) = log_file_parts(Path::new("autopilot-run.log"));
        assert_eq!(parent, Path::new("."));
        assert_eq!(filename, "autopilot-run.log");
    }

    #[test]
    fn nested_log_path_is_split() {
        let (parent, filename) = log_file_parts(Path::new("/var/log/autopilot/scan.log"));
        assert_eq!(parent, Path::new("/var/log/autopilot"));
        assert_eq!(filename, "scan.log");
    }

    #[test]
    fn directory_like_path_falls_back_to_default_name() {
        let (_, filename) = log_file_parts(Path::new("/"));
        assert_eq!(filename, "autopilot.log");
    }
}
