mod cli;
mod render;

use anyhow::Context;
use clap::Parser;
use healthqai_client::{ClientConfig, SymptomForm, Tab, ViewController};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};

/// Initialize tracing on stderr; `LOG_FORMAT=pretty` for humans, JSON otherwise
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "healthqai=warn,healthqai_client=warn".into());

    match log_format.as_str() {
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    ClientConfig::from_env_with(cli.api_url.as_deref(), cli.session_file.clone())
        .context("Failed to read configuration")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    info!("Using service at {}", config.base_url);

    let mut controller = ViewController::new(&config)
        .await
        .context("Failed to open session storage")?;
    controller.start().await;

    match cli.command {
        Command::Status => {}
        Command::Whoami => controller.switch_tab(Tab::Qa),
        Command::Diagnose {
            age,
            gender,
            symptoms,
            history,
        } => {
            controller
                .submit_diagnosis(SymptomForm {
                    age,
                    gender,
                    symptoms,
                    medical_history: history,
                })
                .await;
        }
        Command::Login { username, password } => {
            controller.show_login();
            controller.login(&username, &password).await;
        }
        Command::Logout => {
            controller.switch_tab(Tab::Qa);
            controller.logout().await;
        }
        Command::Ask { question } => {
            controller.submit_question(&question.join(" ")).await;
        }
    }

    let session = controller.session().await;
    print!("{}", render::render(controller.view(), &session));

    if controller.view().error().is_some() {
        std::process::exit(1);
    }
    Ok(())
}
