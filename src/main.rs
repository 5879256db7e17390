use anyhow::{Context, Result};
use tokio::io::{self, BufReader};

use event_interpolation::config::Settings;
use event_interpolation::stream::render_lines;
use event_interpolation::telemetry::init_tracing;
use event_interpolation::Interpolator;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new()?;

    // Initialize tracing
    init_tracing(&settings.log)?;
    tracing::debug!("Configuration loaded");

    let template = std::env::args()
        .nth(1)
        .or_else(|| settings.cli.template.clone())
        .context("No template given: pass one as the first argument or set INTERPOLATE__CLI__TEMPLATE")?;

    let interpolator = Interpolator::new(settings.interpolation.clone());
    let stats = render_lines(
        &interpolator,
        &template,
        BufReader::new(io::stdin()),
        io::stdout(),
        settings.cli.skip_invalid,
    )
    .await?;

    tracing::info!(
        rendered = stats.rendered,
        skipped = stats.skipped,
        "Finished rendering events"
    );
    Ok(())
}
