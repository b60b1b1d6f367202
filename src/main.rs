//! kubewatch webhook notifier.
//!
//! Reads watch events as JSON lines on stdin and forwards each one to the
//! configured webhook. Configuration comes from the file named by
//! `KW_CONFIG` (default `.kubewatch.yaml`) with `KW_WEBHOOK_*` environment
//! variables as fallbacks.

use std::path::PathBuf;

use anyhow::{Context, Result};
use kubewatch_core::{Event, Handler};
use kubewatch_webhook::{env::ProcessEnv, Config, Webhook};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

const CONFIG_PATH_ENV: &str = "KW_CONFIG";
const DEFAULT_CONFIG_FILE: &str = ".kubewatch.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let config_path = config_path();
    let config = Config::load(&config_path)?;
    info!(path = %config_path.display(), "Configuration loaded");

    let webhook =
        Webhook::from_config(&config, &ProcessEnv).context("failed to initialize webhook sink")?;
    info!(
        url = %webhook.sink().url(),
        signed = webhook.sink().signing_key().is_some(),
        "Webhook sink ready"
    );

    let handled = forward_events(BufReader::new(tokio::io::stdin()), &webhook).await?;
    info!(events = handled, "Event stream closed, shutting down");

    Ok(())
}

/// Initializes tracing with environment-based configuration.
fn init_tracing() -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("invalid RUST_LOG filter")?;

    tracing_subscriber::registry().with(filter).with(fmt::layer().with_target(true)).init();

    Ok(())
}

fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV).map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from)
}

/// Dispatches every JSON event line from `reader` to `handler`.
///
/// Blank lines are ignored and malformed lines, including ones that are not
/// UTF-8, are logged and skipped. Only read failures end the stream early.
/// Returns the number of events handed to the handler.
async fn forward_events<R>(mut reader: R, handler: &dyn Handler) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = Vec::new();
    let mut handled = 0;

    loop {
        line.clear();
        let read =
            reader.read_until(b'\n', &mut line).await.context("failed to read event stream")?;
        if read == 0 {
            break;
        }

        let trimmed = line.trim_ascii();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_slice::<Event>(trimmed) {
            Ok(event) => {
                handler.handle(&event).await;
                handled += 1;
            },
            Err(e) => warn!(error = %e, "Skipping malformed event"),
        }
    }

    Ok(handled)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Default)]
    struct CollectingHandler {
        events: Mutex<Vec<Event>>,
    }

    #[async_trait::async_trait]
    impl Handler for CollectingHandler {
        async fn handle(&self, event: &Event) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    #[tokio::test]
    async fn forwards_each_event_line() {
        let input = concat!(
            r#"{"kind":"Pod","name":"nginx-1","namespace":"default","reason":"Created"}"#,
            "\n\n",
            r#"{"kind":"node","name":"worker-1","reason":"Deleted"}"#,
            "\n",
        );
        let handler = CollectingHandler::default();

        let handled = forward_events(input.as_bytes(), &handler).await.unwrap();

        assert_eq!(handled, 2);
        let events = handler.events.lock().unwrap();
        assert_eq!(events[0], Event::new("Pod", "nginx-1", "default", "Created"));
        assert_eq!(events[1], Event::new("node", "worker-1", "", "Deleted"));
    }

    #[tokio::test]
    async fn malformed_lines_are_skipped() {
        let input = "not json\n{\"kind\":\"Service\",\"name\":\"api\"}\n[1,2]\n";
        let handler = CollectingHandler::default();

        let handled = forward_events(input.as_bytes(), &handler).await.unwrap();

        assert_eq!(handled, 1);
        assert_eq!(handler.events.lock().unwrap()[0].kind, "Service");
    }

    #[tokio::test]
    async fn invalid_utf8_line_does_not_end_stream() {
        let input = b"\xff\xfe garbage\n{\"kind\":\"Pod\",\"name\":\"a\"}\n";
        let handler = CollectingHandler::default();

        let handled = forward_events(&input[..], &handler).await.unwrap();

        assert_eq!(handled, 1);
        assert_eq!(handler.events.lock().unwrap()[0].name, "a");
    }

    #[tokio::test]
    async fn last_line_without_newline_is_forwarded() {
        let input = b"{\"kind\":\"Pod\",\"name\":\"tail\"}";
        let handler = CollectingHandler::default();

        assert_eq!(forward_events(&input[..], &handler).await.unwrap(), 1);
        assert_eq!(handler.events.lock().unwrap()[0].name, "tail");
    }

    #[tokio::test]
    async fn empty_input_handles_nothing() {
        let handler = CollectingHandler::default();
        assert_eq!(forward_events(&b""[..], &handler).await.unwrap(), 0);
    }
}
