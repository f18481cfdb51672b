use abstractgateway::upstream::fault::error_response;
use abstractgateway::upstream::ErrorType;
use abstractgateway::Gateway;
use anyhow::{Context, Result};
use clap::Parser;
use mqtt::{Args, MqttDownstream};
use tokio::io::AsyncReadExt;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics on stderr; stdout carries only the response document.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let args = Args::parse();

    let input = match &args.input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read directive from {}", path.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("failed to read directive from stdin")?;
            buf
        }
    };

    let gateway = Gateway::new(args.gateway_config(), MqttDownstream::new(args.broker_config()));
    info!("gateway ready for device {}", gateway.config().device.device_id);

    let response = match serde_json::from_str::<serde_json::Value>(&input) {
        Ok(raw) => gateway.respond(raw).await,
        Err(e) => {
            error!("directive is not valid JSON: {e}");
            error_response(ErrorType::InvalidDirective, &e.to_string(), None, None)
        }
    };

    let out = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{out}");

    Ok(())
}
