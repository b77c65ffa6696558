// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use guide_report::utils::logging::{
    format_error, format_field, format_info, format_success, format_warning, init_logger,
};
use guide_report::{
    BatchOptions, BatchOrchestrator, Config, GuideProcessor, HtmlRenderer, PageTemplate,
    Validator, VehicleGuide, to_json,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

const DESCRIPTION_PREVIEW_CHARS: usize = 100;

#[derive(Parser)]
#[command(name = "guide_report")]
#[command(version)]
#[command(about = "Turns vehicle platform guide documents into HTML reports", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one guide document to an HTML page
    Render {
        /// Guide document (.docx)
        document: PathBuf,

        /// Folder of car images (front, side, rear, quarter)
        #[arg(short, long, value_name = "DIR")]
        images: Option<PathBuf>,

        #[arg(short, long, value_name = "FILE", default_value = "output.html")]
        output: PathBuf,

        /// Page template overriding the configured one
        #[arg(short, long, value_name = "FILE")]
        template: Option<PathBuf>,
    },

    /// Render every guide document in a directory
    Batch {
        #[arg(default_value = ".")]
        directory: PathBuf,

        /// Defaults to the configured render.output_dir
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        #[arg(short, long, value_name = "DIR")]
        images: Option<PathBuf>,

        /// Also write the parsed guide as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the parsed guide as JSON
    Inspect {
        document: PathBuf,

        #[arg(short, long)]
        images: Option<PathBuf>,

        #[arg(short, long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    let config = load_config(&cli.config)?;

    let outcome = match cli.command {
        Commands::Render {
            document,
            images,
            output,
            template,
        } => cmd_render(&config, &document, images.as_deref(), &output, template.as_deref()),
        Commands::Batch {
            directory,
            output_dir,
            images,
            json,
        } => cmd_batch(config, &directory, output_dir, images, json, cli.color).await,
        Commands::Inspect {
            document,
            images,
            pretty,
        } => cmd_inspect(&config, &document, images.as_deref(), pretty),
    };

    if let Err(e) = outcome {
        eprintln!("{}", format_error(&format!("{:#}", e)));
        std::process::exit(1);
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<Config> {
    info!("Loading configuration from: {}", path.display());

    if path.exists() {
        return Config::load(Some(path)).context("Failed to load configuration");
    }

    warn!(
        "Config file {} not found, using default configuration",
        path.display()
    );
    Ok(Config::load(None).unwrap_or_else(|e| {
        warn!("Falling back to built-in defaults: {}", e);
        Config::default_config()
    }))
}

fn cmd_render(
    config: &Config,
    document: &Path,
    images: Option<&Path>,
    output: &Path,
    template: Option<&Path>,
) -> Result<()> {
    let start_time = Instant::now();

    let mut processor = GuideProcessor::new(config).context("Failed to prepare renderer")?;
    if let Some(template) = template {
        let template = PageTemplate::from_file(template).context("Failed to load template")?;
        processor = processor.with_renderer(HtmlRenderer::new(template));
    }

    let result = processor
        .render(document, images, output)
        .with_context(|| format!("Failed to render {}", document.display()))?;

    println!(
        "{}",
        format_success(&format!(
            "Generated {} in {:.2}s",
            result.output.display(),
            start_time.elapsed().as_secs_f64()
        ))
    );
    print_summary(&result.guide);
    Ok(())
}

async fn cmd_batch(
    config: Config,
    directory: &Path,
    output_dir: Option<PathBuf>,
    images: Option<PathBuf>,
    json: bool,
    colored: bool,
) -> Result<()> {
    let output_dir = output_dir.unwrap_or_else(|| config.render.output_dir.clone());
    let options = BatchOptions {
        images_dir: images,
        write_json: json,
        show_progress: true,
        colored,
    };

    let orchestrator = BatchOrchestrator::new(config).context("Failed to prepare batch")?;
    let stats = orchestrator
        .run(directory, &output_dir, &options)
        .await
        .with_context(|| format!("Batch render of {} failed", directory.display()))?;

    if stats.documents_rendered + stats.documents_failed == 0 {
        println!("{}", format_warning("No guide documents found"));
        return Ok(());
    }

    println!(
        "{}",
        format_success(&format!(
            "Rendered {} documents into {}",
            stats.documents_rendered,
            output_dir.display()
        ))
    );
    if stats.documents_failed > 0 {
        println!(
            "{}",
            format_warning(&format!("{} documents failed, see log", stats.documents_failed))
        );
    }
    println!("{}", format_field("Issues", &stats.issues_extracted.to_string()));
    println!("{}", format_field("Duration", &format!("{:.2}s", stats.duration_secs)));
    Ok(())
}

fn cmd_inspect(config: &Config, document: &Path, images: Option<&Path>, pretty: bool) -> Result<()> {
    let processor = GuideProcessor::new(config).context("Failed to prepare parser")?;
    let guide = processor
        .parse(document, images)
        .with_context(|| format!("Failed to parse {}", document.display()))?;

    println!("{}", to_json(&guide, pretty)?);
    Ok(())
}

fn print_summary(guide: &VehicleGuide) {
    let description = if guide.description.is_empty() {
        "Not found".to_string()
    } else {
        Validator::truncate_text(&guide.description, DESCRIPTION_PREVIEW_CHARS)
    };
    let spec_categories = guide.specs.values().filter(|t| !t.is_empty()).count();

    println!("{}", format_info("Guide summary"));
    println!("{}", format_field("Vehicle", &guide.heading));
    println!("{}", format_field("Description", &description));
    println!("{}", format_field("Spec categories", &spec_categories.to_string()));
    println!("{}", format_field("Total issues", &guide.issue_count().to_string()));
}
