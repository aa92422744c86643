//! Terminal client for FreelanceHub realtime notifications and order chat.
//!
//! Connects to the backend WebSocket, joins the viewer's user room (and the
//! order chat room when a thread is given), and polls notifications every 30
//! seconds. Type text to chat, or use `/search <q>`, `/join <room>`,
//! `/dismiss <n>` and `/quit`.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hubsync-client -- --user-id 7
//! cargo run --bin hubsync-client -- -u 7 -t 42 --optimistic-echo
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use hubsync_client::{
    ClientConfig, ClientError, RealtimeSyncClient, SyncHandle,
    api::HttpHubApi,
    config::{DEFAULT_BASE_URL, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_WS_URL},
    render::ViewSink,
    terminal::{LineCommand, Presenter, parse_line, redisplay_prompt},
    transport::{ReconnectPolicy, spawn_websocket_transport},
};
use hubsync_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "hubsync-client")]
#[command(about = "Realtime notification and order chat client for FreelanceHub", long_about = None)]
struct Args {
    /// Base URL of the HTTP API
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// WebSocket endpoint URL
    #[arg(long, default_value = DEFAULT_WS_URL)]
    ws_url: String,

    /// Current user ID (enables the user room and stats)
    #[arg(short = 'u', long)]
    user_id: Option<String>,

    /// Order ID of the chat thread to open
    #[arg(short = 't', long)]
    thread_id: Option<String>,

    /// Notification polling interval in seconds
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    poll_interval_secs: u64,

    /// Show own messages before the server echoes them
    #[arg(long)]
    optimistic_echo: bool,

    /// Give up after this many failed connection attempts (default: retry forever)
    #[arg(long)]
    max_reconnect_attempts: Option<u32>,
}

impl Args {
    fn into_config(self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url,
            ws_url: self.ws_url,
            user_id: self.user_id,
            thread_id: self.thread_id,
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            optimistic_echo: self.optimistic_echo,
            reconnect: ReconnectPolicy {
                max_attempts: self.max_reconnect_attempts,
                ..ReconnectPolicy::default()
            },
            ..ClientConfig::default()
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let config = Args::parse().into_config();

    if let Err(e) = run(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: ClientConfig) -> Result<(), ClientError> {
    config.validate()?;

    let (link, transport_task) =
        spawn_websocket_transport(config.ws_url.clone(), config.reconnect);
    let (view, mut updates) = ViewSink::channel();
    let client = RealtimeSyncClient::new(
        &config,
        Arc::new(HttpHubApi::new(config.base_url.clone())),
        link.outbound,
        Arc::new(SystemClock),
        view,
    );
    let (handle, commands) = SyncHandle::channel();
    let client_task = tokio::spawn(client.run(link.signals, commands));

    let prompt = match &config.user_id {
        Some(user_id) => format!("{}> ", user_id),
        None => "> ".to_string(),
    };
    println!(
        "\nType messages and press Enter to send. Commands: /search <q>, /join <room>, /dismiss <n>, /quit\n"
    );

    let mut presenter = Presenter::new(prompt.clone());
    let mut input = spawn_readline(prompt);

    loop {
        tokio::select! {
            Some(update) = updates.recv() => presenter.show(&update),
            line = input.recv() => {
                let Some(line) = line else {
                    break;
                };
                if !handle_line(&line, &config, &handle, &presenter)? {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    handle.shutdown()?;
    if let Err(e) = client_task.await {
        tracing::error!("Sync client task failed: {}", e);
    }
    transport_task.abort();
    Ok(())
}

/// Apply one input line; `false` means quit
fn handle_line(
    line: &str,
    config: &ClientConfig,
    handle: &SyncHandle,
    presenter: &Presenter,
) -> Result<bool, ClientError> {
    match parse_line(line) {
        LineCommand::Quit => return Ok(false),
        LineCommand::Search(query) => handle.search(query)?,
        LineCommand::Join(room) => handle.join_room(room)?,
        LineCommand::Dismiss(position) => match presenter.toast_at(position) {
            Some(id) => handle.dismiss_toast(id)?,
            None => notice(presenter, &format!("no toast at position {}", position)),
        },
        LineCommand::Chat(text) => match &config.thread_id {
            Some(thread_id) => handle.send_chat_message(thread_id.clone(), text)?,
            None => notice(presenter, "no chat thread open, start with --thread-id"),
        },
        LineCommand::Invalid(hint) => notice(presenter, &hint),
    }
    Ok(true)
}

fn notice(presenter: &Presenter, text: &str) {
    print!("\n{}\n", text);
    redisplay_prompt(presenter.prompt());
}

/// Read lines on a blocking thread (rustyline is synchronous)
fn spawn_readline(prompt: String) -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}
