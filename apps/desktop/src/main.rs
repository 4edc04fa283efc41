use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::{load_settings, normalize_base_url},
    view::{self, Panel},
    RequestController, RequestState, SegmentationClient,
};
use shared::domain::IMAGE_OPTIONS;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Cli {
    /// Overrides the configured segmentation service URL.
    #[arg(long)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lists the sample images the service can segment.
    List,
    /// Sends one image to the service and prints the analysis.
    Segment {
        #[arg(long)]
        image: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let cli = Cli::parse();

    match cli.command {
        Command::List => {
            for option in IMAGE_OPTIONS.iter() {
                println!("{:<10} {}", option.name, option.file);
            }
        }
        Command::Segment { image } => {
            let settings = load_settings();
            let raw_base_url = cli.base_url.as_deref().unwrap_or(&settings.api_base_url);
            let base_url = normalize_base_url(raw_base_url)?;
            let client = SegmentationClient::new(base_url);

            let mut controller = RequestController::new();
            controller
                .select_image(&image)
                .with_context(|| format!("cannot select '{image}'"))?;
            controller.submit_with(&client).await;

            for line in panel_lines(&view::render(controller.state(), &client)) {
                println!("{line}");
            }
            if let RequestState::Failed(message) = controller.state() {
                bail!("segmentation failed: {message}");
            }
        }
    }

    Ok(())
}

fn panel_lines(panel: &Panel) -> Vec<String> {
    match panel {
        Panel::Idle => Vec::new(),
        Panel::Loading { headline, hint } => vec![headline.to_string(), hint.to_string()],
        Panel::Error(message) => vec![format!("Erro: {message}")],
        Panel::Result(result) => {
            let mut lines = vec![
                "Resultados da Análise".to_string(),
                format!("Núcleos Detectados: {}", result.nuclei_count),
                format!("Imagem Analisada: {}", result.image_name),
                "Estatísticas:".to_string(),
            ];
            lines.extend(
                result
                    .stats
                    .iter()
                    .map(|row| format!("  {}: {}", row.label, row.value)),
            );
            lines.push(format!("Imagem Segmentada: {}", result.result_image_url));
            lines.push(format!("Histograma: {}", result.histogram_url));
            lines
        }
    }
}
