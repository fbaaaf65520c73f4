// cv-pdf: Generate a CV PDF from a JSON profile

use clap::Parser;
use log::{info, warn};
use std::fs;

use cv_pdf::builder::layout_document;
use cv_pdf::config::{LayoutConfig, PaperSize, DEFAULT_MARGIN_PT};
use cv_pdf::dates::DEFAULT_ONGOING_LABEL;
use cv_pdf::error::CvError;
use cv_pdf::pdf::render_pdf;
use cv_pdf::profile::ProfileData;

// ============================================================================
// Data Structures
// ============================================================================

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Generate a CV PDF from a JSON profile")]
struct Args {
    /// Profile data (JSON file)
    #[arg(short, long)]
    profile: String,

    /// Output filename (defaults to cv-{name}.pdf)
    #[arg(short, long)]
    output: Option<String>,

    /// Paper size
    #[arg(long, value_enum, default_value_t = PaperSize::A4)]
    paper: PaperSize,

    /// Margin on all sides, in points
    #[arg(long, default_value_t = DEFAULT_MARGIN_PT)]
    margin: f32,

    /// End-date label for items still running
    #[arg(long, default_value = DEFAULT_ONGOING_LABEL)]
    ongoing_label: String,

    /// Keep items in the order given instead of newest first
    #[arg(long)]
    keep_order: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), CvError> {
    // Load profile
    let mut profile = load_profile(&args.profile)?;
    if !args.keep_order {
        profile.normalize_order();
    }

    let config = LayoutConfig {
        paper: args.paper,
        margin: args.margin,
        ongoing_label: args.ongoing_label,
    };

    // Determine output filename
    let output_file = args.output.unwrap_or_else(|| {
        let name = profile.user.full_name.as_deref().unwrap_or("");
        format!("cv-{}.pdf", slug(name))
    });

    // Generate PDF
    let document = layout_document(&profile, &config)?;
    for defect in &document.defects {
        warn!("{:?}: {}", defect.kind, defect.detail);
    }
    let bytes = render_pdf(&document)?;
    fs::write(&output_file, bytes)?;
    info!("Wrote {}", output_file);

    println!("✓ Generated: {}", output_file);
    println!("  Title: {}", document.info.title);
    println!("  Pages: {}", document.pages.len());
    if !document.defects.is_empty() {
        println!("  Skipped items: {}", document.defects.len());
    }

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_profile(path: &str) -> Result<ProfileData, CvError> {
    let content = fs::read_to_string(path)
        .map_err(|e| CvError::ProfileError(format!("{}: {}", path, e)))?;
    ProfileData::from_json(&content).map_err(|e| CvError::ProfileError(format!("{}: {}", path, e)))
}

/// Lowercase, dash-separated, alphanumerics only. Falls back to "profile".
fn slug(name: &str) -> String {
    let sanitized = name
        .trim()
        .to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect::<String>();
    if sanitized.is_empty() {
        "profile".to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        assert_eq!(slug("Johnny Full"), "johnny-full");
        assert_eq!(slug("  Ana O'Neil "), "ana-oneil");
        assert_eq!(slug(""), "profile");
    }
}
