use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::PredictionClient;
use shared::domain::{is_image_media_type, SelectedImage};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "predict", about = "Headless client for the image prediction service")]
struct Args {
    /// Prediction service origin, e.g. http://127.0.0.1:8000
    #[arg(long, global = true)]
    api_base: Option<String>,
    /// Explicit client config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload one image and print the predicted label
    Predict {
        file: PathBuf,
        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
        /// Write the preprocessed image returned by the service to PATH
        #[arg(long, value_name = "PATH")]
        save_preview: Option<PathBuf>,
    },
    /// Check that the service answers on its base address
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = client_core::load_settings(args.config.as_deref(), args.api_base.as_deref())?;
    let client = PredictionClient::new(&settings)?;

    match args.command {
        Command::Predict {
            file,
            json,
            save_preview,
        } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let image = selected_image(&file, bytes)?;
            tracing::info!(endpoint = %client.endpoint(), filename = %image.filename, "uploading");

            let result = client.predict(&image).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.prediction);
                println!("{}", result.confidence_text());
            }

            if let Some(target) = save_preview {
                let Some(reference) = result.preprocessed_image.as_deref() else {
                    bail!("the service returned no preprocessed image");
                };
                let preview = client.load_preview(reference).await?;
                tokio::fs::write(&target, &preview)
                    .await
                    .with_context(|| format!("failed to write {}", target.display()))?;
                tracing::info!(path = %target.display(), bytes = preview.len(), "saved preprocessed image");
            }
        }
        Command::Health => {
            let message = client.health().await?;
            println!("{message}");
        }
    }

    Ok(())
}

/// Same media-type gate as the desktop app: only `image/*` is uploaded.
fn selected_image(path: &Path, bytes: Vec<u8>) -> Result<SelectedImage> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload.bin")
        .to_string();
    let media_type = mime_guess::from_path(path)
        .first_raw()
        .unwrap_or_default()
        .to_string();
    if !is_image_media_type(&media_type) {
        bail!("Please upload an image ({filename} is not an image)");
    }
    Ok(SelectedImage::new(filename, media_type, bytes))
}
