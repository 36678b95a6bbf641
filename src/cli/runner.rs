//! CLI runner - executes commands

use crate::cli::commands::{CallArgs, Cli, Commands, OutputFormat};
use crate::client::Client;
use crate::config::{load_config, ClientConfig};
use crate::error::{Error, Result};
use crate::page::Envelope;
use crate::pagination::PageStream;
use crate::types::{CallMode, ErrorPolicy, Method, QueryParams};
use futures::StreamExt;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{error, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch {
                call,
                no_auto,
                halt_on_error,
                max_pages,
            } => {
                let mut config = self.build_config(call)?;
                config.auto = !*no_auto;
                if *halt_on_error {
                    config.error_policy = ErrorPolicy::Halt;
                }
                self.call(&config, call, CallMode::Paginated, *max_pages)
                    .await
            }
            Commands::Get { call } => {
                let config = self.build_config(call)?;
                self.call(&config, call, CallMode::Single, None).await
            }
            Commands::Validate => self.validate(),
        }
    }

    /// Config file if given, defaults otherwise
    fn load_config(&self) -> Result<ClientConfig> {
        match &self.cli.config {
            Some(path) => load_config(path),
            None => Ok(ClientConfig::default()),
        }
    }

    /// Apply command-line overrides on top of the loaded config
    fn build_config(&self, call: &CallArgs) -> Result<ClientConfig> {
        let mut config = self.load_config()?;

        if let Some(requests) = call.requests {
            config.rate_limit.requests = requests;
        }
        if let Some(window_secs) = call.window_secs {
            config.rate_limit.window_secs = window_secs;
        }
        if call.interval_ms.is_some() {
            config.rate_limit.interval_ms = call.interval_ms;
        }
        config.headers.extend(parse_headers(&call.header)?);

        config.validate()?;
        Ok(config)
    }

    /// Run one session and print every page
    async fn call(
        &self,
        config: &ClientConfig,
        call: &CallArgs,
        mode: CallMode,
        max_pages: Option<usize>,
    ) -> Result<()> {
        let client = Client::new(config)?;
        let request = client
            .request(Method::GET, &call.url)?
            .with_query(parse_query(&call.query)?);

        info!(
            url = %request.url(),
            interval_ms = client.queue_config().interval.as_millis() as u64,
            ?mode,
            "Starting call"
        );

        let started = Instant::now();
        let stream: PageStream<Envelope> = client.send(request, mode);
        let cancel = stream.cancellation_token();
        let mut results = stream.into_stream();

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        let mut pages = 0usize;
        let mut failures = 0usize;
        let mut first_error: Option<Error> = None;

        loop {
            let item = tokio::select! {
                item = results.next() => item,
                _ = &mut ctrl_c => {
                    info!("Interrupted, cancelling session");
                    cancel.cancel();
                    break;
                }
            };

            match item {
                None => break,
                Some(Ok(page)) => {
                    pages += 1;
                    self.emit_page(pages, &page)?;
                    if max_pages.is_some_and(|max| pages >= max) {
                        info!(pages, "Reached --max-pages, cancelling session");
                        cancel.cancel();
                        break;
                    }
                }
                Some(Err(e)) => {
                    failures += 1;
                    error!(error = %e, kind = ?e.kind(), "Call returned an error");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        info!(
            pages,
            errors = failures,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Call finished"
        );

        match first_error {
            Some(e) if pages == 0 => Err(e),
            _ => Ok(()),
        }
    }

    /// Validate the configuration file
    fn validate(&self) -> Result<()> {
        let path = self
            .cli
            .config
            .as_ref()
            .ok_or_else(|| Error::config("Config file not specified (use -C flag)"))?;
        let config = load_config(path)?;

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!(
                    "Config '{}' is valid: one request every {}ms, auto={}",
                    path.display(),
                    config.rate_limit.interval().as_millis(),
                    config.auto
                )
            }
        }));

        Ok(())
    }

    fn emit_page(&self, number: usize, page: &Envelope) -> Result<()> {
        let message = json!({
            "type": "PAGE",
            "page": number,
            "body": serde_json::to_value(page)?,
        });
        self.output_message(&message);
        Ok(())
    }

    /// Output a message in the selected format
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

// ============================================================================
// Argument parsing
// ============================================================================

/// Parse repeated `key=value` arguments; repeated keys accumulate values
pub(crate) fn parse_query(pairs: &[String]) -> Result<QueryParams> {
    let mut query = QueryParams::new();
    for pair in pairs {
        let (key, value) = split_pair(pair, '=', "query")?;
        query.entry(key).or_default().push(value);
    }
    Ok(query)
}

/// Parse repeated `key:value` arguments; later keys win
pub(crate) fn parse_headers(pairs: &[String]) -> Result<Vec<(String, String)>> {
    pairs
        .iter()
        .map(|pair| split_pair(pair, ':', "header"))
        .collect()
}

fn split_pair(pair: &str, separator: char, field: &str) -> Result<(String, String)> {
    match pair.split_once(separator) {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(Error::invalid_value(
            field,
            format!("expected KEY{separator}VALUE, got '{pair}'"),
        )),
    }
}
