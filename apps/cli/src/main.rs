use std::{fs, path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use client_core::{
    load_settings, AgentTransport, ClientSettings, HttpAgentClient, SessionController,
    SessionSnapshot,
};
use futures::StreamExt;
use result_render::{render_all, ResultBody};
use shared::domain::{AgentKind, InputState, InputType};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dreamforge", about = "Drive the DreamForge agent pipeline from a terminal")]
struct Args {
    /// Agent backend base URL (overrides dreamforge.toml and APP__SERVER_URL)
    #[arg(long)]
    server_url: Option<String>,
    /// Request timeout in seconds, 0 to wait forever
    #[arg(long)]
    timeout: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Call a single agent with the given input
    Call {
        #[arg(long)]
        agent: AgentKind,
        #[command(flatten)]
        input: InputArgs,
        /// Print generated code without collapsing it
        #[arg(long)]
        full: bool,
    },
    /// Run vision, code and evaluator in one server-side call
    Orchestrate {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        full: bool,
    },
    /// Follow the streaming orchestration endpoint
    Stream {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Check that the backend is up
    Health,
}

#[derive(ClapArgs, Debug)]
struct InputArgs {
    #[arg(long, default_value = "voice")]
    input_type: InputType,
    /// Description, layout or code to send
    #[arg(long, conflicts_with = "input_file")]
    input: Option<String>,
    /// Read the input from a file instead
    #[arg(long)]
    input_file: Option<PathBuf>,
}

impl InputArgs {
    fn resolve(&self) -> Result<InputState> {
        let data = match (&self.input, &self.input_file) {
            (Some(text), _) => text.clone(),
            (None, Some(path)) => fs::read_to_string(path)
                .with_context(|| format!("failed to read input file '{}'", path.display()))?,
            (None, None) => String::new(),
        };
        Ok(InputState::new(self.input_type, data))
    }
}

fn settings_from(args: &Args) -> ClientSettings {
    let mut settings = load_settings();
    if let Some(url) = &args.server_url {
        settings.server_url = url.clone();
    }
    if let Some(timeout) = args.timeout {
        settings.request_timeout_secs = timeout;
    }
    settings
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    let settings = settings_from(&args);
    tracing::debug!(server_url = %settings.server_url, "loaded client settings");

    let client = Arc::new(HttpAgentClient::new(&settings)?);

    match &args.command {
        Command::Call { agent, input, full } => {
            let session = session_for(&client, &settings, input.resolve()?);
            // Failures are recorded on the session and reported below.
            let _ = session.invoke_single(*agent).await;
            Ok(report(&session.snapshot(), *full))
        }
        Command::Orchestrate { input, full } => {
            let session = session_for(&client, &settings, input.resolve()?);
            let _ = session.invoke_orchestrate().await;
            Ok(report(&session.snapshot(), *full))
        }
        Command::Stream { input } => {
            let input = input.resolve()?;
            if !input.is_submittable() {
                bail!("{}", client_core::error::MISSING_INPUT_MESSAGE);
            }
            let mut lines = client.stream_orchestration(&input).await?;
            while let Some(line) = lines.next().await {
                println!("{}", line?);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Health => {
            let message = client.health().await?;
            println!("{message}");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn session_for(
    client: &Arc<HttpAgentClient>,
    settings: &ClientSettings,
    input: InputState,
) -> SessionController {
    let session = SessionController::new(client.clone(), settings.framework.clone());
    session.set_input(input.input_type, input.input_data);
    session
}

fn report(snapshot: &SessionSnapshot, full: bool) -> ExitCode {
    if let Some(error) = &snapshot.operation.last_error {
        eprintln!("error: {error}");
        return ExitCode::FAILURE;
    }
    for mut rendered in render_all(&snapshot.results) {
        if let ResultBody::Code(view) = &mut rendered.body {
            if full && view.is_truncated() {
                view.toggle();
            }
        }
        println!("{rendered}");
    }
    ExitCode::SUCCESS
}
