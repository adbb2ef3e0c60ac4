use clap::Parser;
use serde_json::json;

use crate::config::{load_or_default, to_toml_string};
use crate::control::ControlError;
use crate::logging;
use crate::runtime::{AppContext, AppError};

use super::types::{Cli, Commands, RenderReport};

pub fn run_cli() -> Result<(), String> {
    let cli = Cli::parse();
    let loaded = load_or_default(cli.config.as_deref()).map_err(|error| error.to_string())?;
    let _log_guard = logging::init(&loaded.config.logging);
    if let Some(warning) = &loaded.warning {
        tracing::warn!("{warning}");
    }
    if let Some(path) = &loaded.path {
        tracing::debug!(path = %path.display(), "configuration loaded");
    }
    let app = AppContext::new(loaded.config);

    match cli.command {
        None => {
            crate::ui::run(app, Vec::new()).map_err(|error| error.to_string())?;
        }
        Some(Commands::Open { files }) => {
            let identities = app.normalize_all(&files);
            match app.forward(&identities) {
                Ok(()) => {
                    tracing::info!(count = identities.len(), "handed files to running viewer");
                }
                Err(AppError::Control(ControlError::Connect { addr, .. })) => {
                    tracing::info!(%addr, "no running viewer; starting one");
                    crate::ui::run(app, identities).map_err(|error| error.to_string())?;
                }
                Err(error) => return Err(error.to_string()),
            }
        }
        Some(Commands::Send { files }) => {
            let identities = app.normalize_all(&files);
            app.forward(&identities).map_err(|error| error.to_string())?;
            println!("{}", json!({"status": "ok", "sent": identities.len()}));
        }
        Some(Commands::Render { input, output }) => {
            let image = app
                .render_to(&input, &output)
                .map_err(|error| error.to_string())?;
            let report = RenderReport {
                status: "ok",
                input,
                output,
                width: image.width,
                height: image.height,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&report).map_err(|error| error.to_string())?
            );
        }
        Some(Commands::Config { toml }) => {
            let rendered = if toml {
                to_toml_string(app.config()).map_err(|error| error.to_string())?
            } else {
                serde_json::to_string_pretty(app.config()).map_err(|error| error.to_string())?
            };
            println!("{rendered}");
        }
    }

    Ok(())
}
