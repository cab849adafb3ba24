use super::utils::resolve_dir;
use label_catalog::validate::Severity;
use label_catalog::{validate, CatalogConfig, CatalogPublisher};
use std::fs;
use std::path::PathBuf;

/// Handle the validate command
pub fn handle_validate(
    config: &CatalogConfig,
    dir: Option<PathBuf>,
    tolerance: Option<u64>,
    rendered: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = resolve_dir(dir, config);
    let publisher = CatalogPublisher::new(&dir, config.label_name.as_str());
    let (catalog, stats) = publisher.load_documents()?;

    let mut report = validate(
        &catalog,
        &stats,
        tolerance.unwrap_or(config.consistency_tolerance),
    );

    if let Some(path) = rendered {
        report.check_rendered(&fs::read_to_string(&path)?, &stats);
    }

    println!(
        "📊 {} tracks, {} artists, {} streams recomputed",
        report.track_count, report.artist_count, report.recomputed_streams
    );
    for issue in &report.issues {
        match issue.severity {
            Severity::Error => println!("❌ {}", issue.message),
            Severity::Warning => println!("⚠️  {}", issue.message),
        }
    }

    if report.is_consistent() {
        println!("✅ {} is consistent", dir.display());
        Ok(())
    } else {
        Err(format!(
            "{} inconsistency(ies) found in {}",
            report.errors().count(),
            dir.display()
        )
        .into())
    }
}
