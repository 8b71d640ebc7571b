use anyhow::{bail, Context};
use choropleth::prelude::*;
use std::path::PathBuf;

/// Prints the dimension picker, fill paint and initial camera for a map document
#[derive(clap::Parser, Debug)]
#[command(name = "choropleth-app", version, about)]
struct Cli {
    /// Path or http(s) URL of a `{ "layers": [ { "source": ... } ] }` document
    source: String,

    /// Dimension to paint instead of the first one
    #[arg(short, long)]
    dimension: Option<String>,

    /// Layer name shown as the control panel title
    #[arg(short, long, default_value = "COVID-19 State-By-State Daily Statistic Heatmap Layer")]
    name: String,

    /// JSON configuration file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Use the compact preset (400x300 frame)
    #[arg(long, conflicts_with = "config")]
    compact: bool,
}

fn load_config(cli: &Cli) -> anyhow::Result<ChoroplethConfig> {
    if let Some(path) = &cli.config {
        return ChoroplethConfig::from_file(path)
            .with_context(|| format!("reading config {}", path.display()));
    }
    let profile = if cli.compact {
        ChoroplethProfile::Compact
    } else {
        ChoroplethProfile::Standard
    };
    Ok(profile.resolve())
}

fn source_for(cli: &Cli, config: &ChoroplethConfig) -> anyhow::Result<Box<dyn DocumentSource>> {
    if cli.source.starts_with("http://") || cli.source.starts_with("https://") {
        return Ok(Box::new(HttpSource::with_config(&cli.source, &config.http)?));
    }
    let json = std::fs::read_to_string(&cli.source)
        .with_context(|| format!("reading document {}", cli.source))?;
    Ok(Box::new(InlineSource::from_json(cli.source.clone(), &json)?))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = <Cli as clap::Parser>::parse();
    let config = load_config(&cli)?;
    let source = source_for(&cli, &config)?;

    let mut layer = ChoroplethLayer::with_config(cli.name.clone(), config)?;
    layer
        .load(source.as_ref())
        .await
        .with_context(|| format!("loading {}", source.describe()))?;

    let Some(panel) = layer.control_panel() else {
        bail!("no dataset loaded from {}", source.describe());
    };

    println!("{}", panel.name);
    for option in &panel.options {
        let marker = if option.key == panel.default_key { "*" } else { " " };
        println!("  {} {:<24} {}", marker, option.key, option.label);
    }

    if let Some(key) = &cli.dimension {
        layer.select(key)?;
    }

    if let Some(paint) = layer.paint()? {
        println!("paint:");
        println!("{}", serde_json::to_string_pretty(&paint.to_style_json())?);
    }

    if let Some(viewport) = layer.viewport() {
        println!(
            "viewport: longitude {:.6} latitude {:.6} zoom {:.4}",
            viewport.longitude, viewport.latitude, viewport.zoom
        );
    }

    Ok(())
}
