//! CLI command implementations

use crate::output::{to_json, OutputFormat};
use anyhow::Context;
use serde::Serialize;
use std::path::Path;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::{error, info, warn};
use vplayer_core::{
    build_layout, quality, DefaultQuality, HeadlessHost, MediaHost, PlayerConfig, ScriptStep,
    Simulation, UiState,
};

/// Load a configuration file merged over the defaults
pub fn load_config(path: Option<&Path>) -> anyhow::Result<PlayerConfig> {
    let Some(path) = path else {
        return Ok(PlayerConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = PlayerConfig::from_json(&json)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    info!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

// =============================================================================
// Inspect
// =============================================================================

/// One quality variant with the selectors that resolve to it
#[derive(Debug, Serialize, Tabled)]
pub struct QualityRow {
    #[tabled(rename = "#")]
    pub index: usize,
    pub name: String,
    #[tabled(rename = "rank")]
    pub leading_number: i64,
    pub src: String,
    #[tabled(rename = "selected by")]
    pub selectors: String,
}

#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub config: PlayerConfig,
    pub default_quality: Option<String>,
    pub qualities: Vec<QualityRow>,
    pub subtitle_tracks: Vec<String>,
}

pub fn build_inspect_report(config: &PlayerConfig) -> InspectReport {
    let qualities = &config.video_qualities;
    let selectors = [DefaultQuality::Highest, DefaultQuality::Lowest, DefaultQuality::P720];

    let rows = qualities
        .iter()
        .enumerate()
        .map(|(index, variant)| {
            let picked_by: Vec<String> = selectors
                .iter()
                .filter(|selector| quality::select_index(qualities, **selector) == Some(index))
                .map(|selector| selector.to_string())
                .collect();
            QualityRow {
                index: index + 1,
                name: variant.name.clone(),
                leading_number: quality::leading_number(&variant.name),
                src: variant.src.clone(),
                selectors: picked_by.join(", "),
            }
        })
        .collect();

    InspectReport {
        config: config.clone(),
        default_quality: quality::get_quality(qualities, config.behavior.default_quality)
            .map(|q| q.name.clone()),
        qualities: rows,
        subtitle_tracks: config.subtitle_tracks().map(|s| s.code.clone()).collect(),
    }
}

/// Show the resolved configuration
pub fn inspect(path: Option<&Path>, format: &str) -> anyhow::Result<()> {
    let config = load_config(path)?;
    let report = build_inspect_report(&config);

    match OutputFormat::from(format) {
        OutputFormat::Json => println!("{}", to_json(&report)),
        OutputFormat::Table => {
            println!("{}", Table::new(&report.qualities).with(Style::rounded()));
            println!(
                "Default quality: {}",
                report.default_quality.as_deref().unwrap_or("-")
            );
        }
        OutputFormat::Text => print_inspect_text(&report),
    }

    Ok(())
}

fn print_inspect_text(report: &InspectReport) {
    let config = &report.config;
    let dims = &config.dimensions;
    let controls = &config.controls;
    let behavior = &config.behavior;

    println!("Configuration:");
    println!(
        "  Dimensions: {} x {} (min {}x{}px)",
        dims.width.to_css(),
        dims.height.to_css(),
        dims.min_width,
        dims.min_height
    );
    println!(
        "  Controls: fullscreen={} quality={} subtitles={} volume={} time={}",
        controls.show_fullscreen,
        controls.show_quality,
        controls.show_subtitles,
        controls.show_volume,
        controls.show_time
    );
    println!(
        "  Behavior: autoplay={} loop={} default={} controls-on-init={} hide-delay={}ms",
        behavior.autoplay,
        behavior.loop_playback,
        behavior.default_quality,
        behavior.show_controls_on_init,
        behavior.hide_controls_delay
    );

    println!("\nQualities:");
    for row in &report.qualities {
        let tags = if row.selectors.is_empty() {
            String::new()
        } else {
            format!(" [{}]", row.selectors)
        };
        println!("  {}. {} - {}{}", row.index, row.name, row.src, tags);
    }
    println!(
        "  Default: {}",
        report.default_quality.as_deref().unwrap_or("(none)")
    );

    println!("\nSubtitles:");
    for subtitle in &config.subtitle_options {
        match subtitle.src.as_deref().filter(|_| subtitle.has_track()) {
            Some(src) => println!("  - {} {} ({})", subtitle.code, subtitle.label, src),
            None => println!("  - {} {}", subtitle.code, subtitle.label),
        }
    }
}

// =============================================================================
// Render
// =============================================================================

/// Render the widget skeleton as HTML
pub fn render(path: Option<&Path>, output: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(path)?;
    let html = build_layout(&config).to_html();

    match output {
        Some(file) => {
            std::fs::write(file, &html)
                .with_context(|| format!("Failed to write {}", file.display()))?;
            info!(path = %file.display(), bytes = html.len(), "Markup written");
        }
        None => print!("{}", html),
    }

    Ok(())
}

// =============================================================================
// Simulate
// =============================================================================

/// State after one script step
#[derive(Debug, Serialize)]
pub struct StepReport {
    pub step: Option<ScriptStep>,
    pub source: String,
    pub paused: bool,
    pub current_time: f64,
    pub ui: UiState,
}

impl StepReport {
    fn capture(step: Option<ScriptStep>, sim: &Simulation) -> Self {
        let host = sim.host();
        Self {
            step,
            source: host.source().to_string(),
            paused: host.paused(),
            current_time: host.current_time(),
            ui: sim.ui().clone(),
        }
    }
}

/// Run a script against a headless player and collect the states
pub fn run_script(
    config: PlayerConfig,
    steps: &[ScriptStep],
    duration: f64,
    fail_sources: &[String],
) -> Vec<StepReport> {
    let mut host = HeadlessHost::new();
    host.set_media_duration(duration);
    for src in fail_sources {
        host.fail_source(src.clone());
    }

    let mut sim = Simulation::with_host(config, host);
    sim.widget_mut().on_error(|error| {
        if error.is_recoverable() {
            warn!(code = error.error_code(), "{}", error);
        } else {
            error!(code = error.error_code(), "{}", error);
        }
    });

    let mut reports = vec![StepReport::capture(None, &sim)];
    for step in steps {
        sim.run_step(step);
        reports.push(StepReport::capture(Some(step.clone()), &sim));
    }
    reports
}

/// Replay an interaction script
pub fn simulate(
    config_path: &Path,
    script_path: &Path,
    duration: f64,
    fail_sources: &[String],
    format: &str,
) -> anyhow::Result<()> {
    let config = load_config(Some(config_path))?;
    let script = std::fs::read_to_string(script_path)
        .with_context(|| format!("Failed to read script {}", script_path.display()))?;
    let steps: Vec<ScriptStep> = serde_json::from_str(&script)
        .with_context(|| format!("Failed to parse script {}", script_path.display()))?;

    info!(steps = steps.len(), "Running simulation");
    let reports = run_script(config, &steps, duration, fail_sources);

    match OutputFormat::from(format) {
        OutputFormat::Json => println!("{}", to_json(&reports)),
        OutputFormat::Text | OutputFormat::Table => {
            for report in &reports {
                println!("{}", describe_step(report));
            }
        }
    }

    Ok(())
}

fn describe_step(report: &StepReport) -> String {
    let step = match &report.step {
        None => "initial".to_string(),
        Some(ScriptStep::Advance { advance_ms }) => format!("+{}ms", advance_ms),
        Some(ScriptStep::Event(event)) => event.name().to_string(),
    };
    let ui = &report.ui;
    format!(
        "{:<18} controls={:<7} settings={:<6} icon={:?} time={}/{} src={}{}",
        step,
        if ui.controls_visible { "shown" } else { "hidden" },
        if ui.settings_open { "open" } else { "closed" },
        ui.play_icon,
        ui.current_time_label,
        ui.duration_label,
        report.source,
        if report.paused { " (paused)" } else { "" },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use vplayer_core::{QualityVariant, WidgetEvent};

    fn config() -> PlayerConfig {
        let mut config = PlayerConfig::default();
        config.video_qualities = vec![
            QualityVariant::new("1080p", "hd.mp4", ""),
            QualityVariant::new("720p", "md.mp4", ""),
            QualityVariant::new("360p", "ld.mp4", ""),
        ];
        config
    }

    #[test]
    fn test_inspect_report_selectors() {
        let report = build_inspect_report(&config());
        assert_eq!(report.default_quality.as_deref(), Some("360p"));
        assert_eq!(report.qualities[0].selectors, "highest");
        assert_eq!(report.qualities[1].selectors, "720p");
        assert_eq!(report.qualities[2].selectors, "lowest");
        assert_eq!(report.qualities[2].leading_number, 360);
    }

    #[test]
    fn test_run_script() {
        let steps = vec![
            ScriptStep::Event(WidgetEvent::PlayPauseClick),
            ScriptStep::Advance { advance_ms: 3000 },
            ScriptStep::Event(WidgetEvent::QualitySelected { index: 0 }),
        ];
        let reports = run_script(config(), &steps, 120.0, &[]);

        assert_eq!(reports.len(), 4);
        assert!(reports[0].paused);
        assert_eq!(reports[0].ui.duration_label, "2:00");
        assert!(!reports[2].ui.controls_visible);
        assert_eq!(reports[3].source, "hd.mp4");
        assert_eq!(reports[3].current_time, 3.0);
        assert!(!reports[3].paused);
    }

    #[test]
    fn test_describe_step() {
        let reports = run_script(config(), &[], 60.0, &[]);
        let line = describe_step(&reports[0]);
        assert!(line.starts_with("initial"));
        assert!(line.contains("src=ld.mp4 (paused)"));
    }
}
