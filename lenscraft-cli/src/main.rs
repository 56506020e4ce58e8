use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;

// Import from lenscraft-core
use lenscraft_core::{DebugConfig, LayoutConfig, LayoutProcessor, LayoutResult, ReadingDirection};

// Import CLI utilities
use lenscraft_cli::{extract_fragments, read_input, resolve_config, save_stages, ConfigOverrides};

#[derive(Parser)]
#[command(name = "lenscraft")]
#[command(about = "Rebuild lines and paragraphs from OCR text fragments")]
struct Args {
    /// Path to the OCR JSON file (array of fragments or `{ "segments": [...] }`)
    #[arg(short, long)]
    input: Option<String>,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Override the density factor (0.0 - 4.0)
    #[arg(short, long)]
    density_factor: Option<f64>,

    /// Override the reading direction: ltr or rtl
    #[arg(long)]
    direction: Option<ReadingDirection>,

    /// Output format: layout, text, or flat
    #[arg(short = 'f', long, default_value = "layout")]
    output_format: String,

    /// Output file path (if not specified, the report is printed)
    #[arg(short, long)]
    output: Option<String>,

    /// Show available config options and exit
    #[arg(long)]
    show_configs: bool,

    /// Enable detailed profiling of all pipeline steps
    #[arg(long)]
    profile: bool,

    /// Trace lines whose text matches this pattern after each stage (repeatable)
    #[arg(long = "debug-filter")]
    debug_filters: Vec<String>,

    /// Dump all intermediate pipeline stage outputs to a directory
    /// Captures: sorted fragments, lines, paragraphs and a summary
    #[arg(long)]
    dump_stages: bool,

    /// Directory for stage dump output
    #[arg(long, default_value = "test_outputs/stages")]
    stages_dir: String,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    // Argument errors exit 1 like every other failure; --help stays 0
    let args = Args::try_parse().unwrap_or_else(|e| {
        if !e.use_stderr() {
            e.exit();
        }
        eprint!("{e}");
        std::process::exit(1);
    });
    init_tracing(args.verbose, args.profile || !args.debug_filters.is_empty());

    if let Err(e) = run(args) {
        eprintln!("❌ Processing failed: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8, diagnostics: bool) {
    let level = match verbose {
        0 if diagnostics => tracing::Level::INFO,
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    println!("🔎 Lenscraft Layout Reconstruction");

    if args.show_configs {
        show_help();
        return Ok(());
    }

    let input = args
        .input
        .as_deref()
        .context("no input file given (use --input <path>)")?;
    if !Path::new(input).exists() {
        anyhow::bail!("input file not found: {input}");
    }

    let overrides = ConfigOverrides {
        density_factor: args.density_factor,
        direction: args.direction,
    };
    let config = resolve_config(args.config.as_deref(), overrides)?;
    if let Some(config_path) = &args.config {
        println!("📋 Loaded config from: {}", config_path);
    } else {
        println!("📋 Using default config");
    }
    println!(
        "   - density factor {} ({}px line / {}px paragraph), {}",
        config.density_factor,
        config.threshold_y(),
        config.paragraph_threshold_y(),
        config.direction
    );

    let debug_config = DebugConfig::new(!args.debug_filters.is_empty(), args.debug_filters.clone());
    let processor = LayoutProcessor::from_config(config)?.with_debug_config(debug_config);

    println!("📄 Processing: {}", input);
    let fragments = extract_fragments(read_input(input)?);

    // Stage dump mode: capture and save all intermediates
    if args.dump_stages {
        println!("\n🔬 Pipeline stage dump mode");
        let stages = processor.process_capture_stages(&fragments)?;
        save_stages(&stages, &config, &args.stages_dir)?;
        println!("\n✅ All stages dumped to: {}", args.stages_dir);
        return Ok(());
    }

    let result = processor.process_with_profiling(&fragments, args.profile)?;
    println!("✅ Successfully processed document");
    println!("📊 Layout metrics:");
    println!("   - Fragments: {}", result.fragment_count());
    println!("   - Lines: {}", result.lines.len());
    println!("   - Paragraphs: {}", result.paragraphs.len());

    match &args.output {
        Some(output_path) => save_result(&result, &config, output_path, &args.output_format)?,
        None => println!("\n{}", result.render(&args.output_format, &config)?),
    }

    Ok(())
}

fn save_result(
    result: &LayoutResult,
    config: &LayoutConfig,
    output_path: &str,
    format: &str,
) -> Result<()> {
    result
        .save_with_format(output_path, format, config)
        .with_context(|| format!("failed to write {output_path}"))?;

    match format {
        "text" => println!("💾 Text report saved to: {}", output_path),
        "flat" => println!("💾 Flat format results saved to: {}", output_path),
        "layout" => println!("💾 Layout format results saved to: {}", output_path),
        _ => {
            println!("⚠️  Unknown output format '{}', using default layout format", format);
            println!("💾 Layout format results saved to: {}", output_path);
        }
    }

    Ok(())
}

fn show_help() {
    println!("\n📋 Available Configuration Options:");
    println!("  --config <path>           Load custom config file");
    println!("  --input <path>            OCR JSON file to process");
    println!("  --density-factor <f>      Grouping tolerance, 0.0 - 4.0 (default 1.0)");
    println!("  --direction <ltr|rtl>     Reading direction within a line (default ltr)");
    println!("  --output <path>           Output file path (prints to stdout if not specified)");
    println!("  --output-format <fmt>     Output format: layout, text, or flat");
    println!("  --debug-filter <pattern>  Trace matching lines after each stage");

    println!("\n📐 Thresholds:");
    println!("  line       - 10px x density factor between a fragment and the line average");
    println!("  paragraph  - 1.5 x the line threshold between consecutive line averages");

    println!("\n📄 Output Formats:");
    println!("  layout  - Lines, paragraphs, fragments and layout profile (default)");
    println!("  text    - Numbered lines and paragraphs as plain text");
    println!("  flat    - Arrays of line and paragraph strings (minimal format)");

    println!("\n📁 Example config files in ./configs/:");
    println!("  default.yaml        - Density 1.0, left to right");
    println!("  receipt-dense.yaml  - Tight rows, density 0.6");
    println!("  rtl.yaml            - Right-to-left scripts");

    println!("\n📝 Usage Examples:");
    println!("  cargo run -- -i scan.json");
    println!("  cargo run -- -i scan.json -o layout.json");
    println!("  cargo run -- -i scan.json -c configs/rtl.yaml -f text");
    println!("  cargo run -- -i scan.json --density-factor 2.0 --dump-stages");
}
