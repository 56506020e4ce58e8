use anyhow::{Context, Result};
use lenscraft_core::{LayoutConfig, PipelineStages};
use std::fs;
use std::path::Path;

/// Write every pipeline stage as its own JSON file, plus a `summary.json`
/// with counts for quick comparison between runs.
pub fn save_stages(
    stages: &PipelineStages,
    config: &LayoutConfig,
    output_dir: impl AsRef<Path>,
) -> Result<()> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    // Stage 1: fragments in sweep order
    let fragments_path = output_dir.join("stage1_fragments.json");
    fs::write(&fragments_path, serde_json::to_string_pretty(&stages.sorted_fragments)?)?;
    println!(
        "  💾 {} ({} fragments)",
        fragments_path.display(),
        stages.sorted_fragments.len()
    );

    // Stage 2: lines
    let lines_path = output_dir.join("stage2_lines.json");
    fs::write(&lines_path, serde_json::to_string_pretty(&stages.lines)?)?;
    println!("  💾 {} ({} lines)", lines_path.display(), stages.lines.len());

    // Stage 3: paragraphs
    let paragraphs_path = output_dir.join("stage3_paragraphs.json");
    fs::write(&paragraphs_path, serde_json::to_string_pretty(&stages.paragraphs)?)?;
    println!(
        "  💾 {} ({} paragraphs)",
        paragraphs_path.display(),
        stages.paragraphs.len()
    );

    let summary = serde_json::json!({
        "captured_at": chrono::Utc::now().to_rfc3339(),
        "config": config,
        "thresholds": {
            "line": config.threshold_y(),
            "paragraph": config.paragraph_threshold_y(),
        },
        "stage_counts": {
            "fragments": stages.sorted_fragments.len(),
            "lines": stages.lines.len(),
            "paragraphs": stages.paragraphs.len(),
        }
    });
    let summary_path = output_dir.join("summary.json");
    fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;
    println!("  💾 {}", summary_path.display());

    Ok(())
}
