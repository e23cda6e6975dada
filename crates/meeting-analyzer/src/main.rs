mod bootstrap;

use std::path::Path;

use anyhow::{Context, Result};
use meeting_core::settings::Settings;
use meeting_data::analysis::analyze_meetings_from_path;
use meeting_ui::app::App;
use meeting_ui::table_view;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::info!("Meeting Analyzer v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "File: {}, View: {}, Theme: {}",
        settings.file.display(),
        settings.view,
        settings.theme
    );

    let analysis = analyze_meetings_from_path(&settings.file, &settings.exclude)
        .with_context(|| format!("Failed to analyse {}", settings.file.display()))?;

    tracing::info!(
        "{} of {} rows retained across {} months",
        analysis.metadata.rows_retained,
        analysis.metadata.rows_loaded,
        analysis.summaries.len()
    );

    match settings.view.as_str() {
        "json" => {
            let json = analysis
                .to_json_pretty()
                .context("Failed to serialize the analysis")?;
            println!("{json}");
        }
        "table" => print!("{}", table_view::report_text(&analysis)),
        _ => {
            let app = App::new(&settings.theme, display_name(&settings.file));
            app.run(&analysis).context("Terminal UI failed")?;
        }
    }

    Ok(())
}

/// File name of `path` for the report header, or the whole path when it has
/// none.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
