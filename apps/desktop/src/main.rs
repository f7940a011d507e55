use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use client_core::{
    find_preset, launch, load_settings, HttpPredictionClient, LaunchOptions, OrchestratorHandle,
    PassengerForm, PRESETS,
};
use shared::domain::FormField;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(about = "Titanic survival prediction client")]
struct Args {
    /// Base URL of the prediction service; overrides client.toml and the environment.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(long)]
    no_probe: bool,
    /// Start from a named example (Rose, Jack, Child).
    #[arg(long)]
    preset: Option<String>,
    /// Field override applied after the preset, e.g. `--set Age=30`.
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    overrides: Vec<(FormField, String)>,
    /// Read commands from stdin instead of submitting once.
    #[arg(short, long)]
    interactive: bool,
}

fn parse_assignment(raw: &str) -> Result<(FormField, String)> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected FIELD=VALUE, got '{raw}'"))?;
    Ok((FormField::from_str(field)?, value.trim().to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(url) = args.server_url.clone() {
        settings.server_url = url;
    }
    if args.timeout_secs.is_some() {
        settings.request_timeout_secs = args.timeout_secs;
    }
    if args.no_probe {
        settings.probe_on_startup = false;
    }
    tracing::info!(server_url = %settings.server_url, "starting prediction client");

    let client = HttpPredictionClient::from_settings(&settings)
        .context("failed to configure prediction client")?;
    let handle = launch(
        client.into_service(),
        LaunchOptions {
            initial_form: PassengerForm::default(),
            probe_on_startup: settings.probe_on_startup,
        },
    );

    if let Some(name) = &args.preset {
        let preset = find_preset(name).ok_or_else(|| anyhow!("unknown preset '{name}'"))?;
        handle.select_preset(preset)?;
    }
    for (field, value) in &args.overrides {
        handle.edit_field(*field, value.clone())?;
    }

    if args.interactive {
        run_interactive(&handle).await?;
    } else {
        submit_once(&handle).await?;
    }

    handle.shutdown().await;
    Ok(())
}

async fn submit_once(handle: &OrchestratorHandle) -> Result<()> {
    let mut notices = handle.subscribe_notices();
    handle.submit()?;
    let view = handle.settled().await?;

    println!("{}", render::render_view(&view));
    let mut failed = false;
    while let Ok(notice) = notices.try_recv() {
        println!("{}", render::render_notice(&notice));
        failed = true;
    }
    if failed {
        bail!("prediction failed");
    }
    Ok(())
}

async fn run_interactive(handle: &OrchestratorHandle) -> Result<()> {
    let mut notices = handle.subscribe_notices();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", render::HELP);
    println!("{}", render::render_view(&handle.sync().await?));

    while let Some(line) = lines.next_line().await? {
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };

        match command.to_ascii_lowercase().as_str() {
            "set" => {
                let (Some(field), Some(value)) = (parts.next(), parts.next()) else {
                    println!("usage: set FIELD VALUE");
                    continue;
                };
                match FormField::from_str(field) {
                    Ok(field) => handle.edit_field(field, value)?,
                    Err(err) => {
                        println!("{err}");
                        continue;
                    }
                }
                println!("{}", render::render_form(&handle.sync().await?));
            }
            "preset" => {
                let name = parts.next().unwrap_or_default();
                match find_preset(name) {
                    Some(preset) => handle.select_preset(preset)?,
                    None => {
                        let names: Vec<_> = PRESETS.iter().map(|preset| preset.name).collect();
                        println!("unknown preset '{name}'; try {}", names.join(", "));
                        continue;
                    }
                }
                println!("{}", render::render_form(&handle.sync().await?));
            }
            "submit" => {
                handle.submit()?;
                println!("Predicting...");
                println!("{}", render::render_view(&handle.settled().await?));
            }
            "show" => println!("{}", render::render_view(&handle.sync().await?)),
            "help" => println!("{}", render::HELP),
            "quit" | "exit" => break,
            other => println!("unknown command '{other}'; type 'help'"),
        }

        while let Ok(notice) = notices.try_recv() {
            println!("{}", render::render_notice(&notice));
        }
    }

    Ok(())
}
