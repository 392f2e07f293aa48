//! CLI tool for turning text or Markdown into a PowerPoint deck.

use anyhow::{bail, Context, Result};
use clap::Parser;
use slidegen_core::{
    assemble, plan_slides, ContentProvider, OutlineFormatter, PlanRequest, SlidePlan,
};
use slidegen_llm::{build_provider, ProviderConfig, ProviderKind};
use slidegen_pptx::PptxRenderer;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Largest accepted template file.
const MAX_TEMPLATE_BYTES: u64 = 15 * 1024 * 1024;

/// Largest accepted input text.
const MAX_TEXT_BYTES: u64 = 1024 * 1024;

/// Output name when reading from stdin.
const STDIN_OUTPUT_NAME: &str = "generated_presentation.pptx";

/// Generate a PowerPoint deck from text, using a template's layouts and styles.
#[derive(Parser, Debug)]
#[command(name = "slidegen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input text or Markdown file ("-" for stdin)
    input: PathBuf,

    /// PowerPoint template (.pptx or .potx)
    #[arg(short, long, required_unless_present_any = ["print", "json"])]
    template: Option<PathBuf>,

    /// Output .pptx path (default: input name with .pptx extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// One-line guidance for tone or structure
    #[arg(short, long)]
    guidance: Option<String>,

    /// Content provider: none, openai, anthropic or gemini
    #[arg(long, default_value = "none")]
    provider: String,

    /// API key for the provider
    #[arg(long, env = "SLIDEGEN_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model name (default depends on the provider)
    #[arg(long)]
    model: Option<String>,

    /// Provider request timeout in seconds
    #[arg(long, default_value = "60")]
    timeout: u64,

    /// Generate speaker notes
    #[arg(short, long)]
    notes: bool,

    /// Print the slide outline to stdout instead of writing a deck
    #[arg(short, long)]
    print: bool,

    /// Print the slide plan as JSON to stdout instead of writing a deck
    #[arg(long, conflicts_with = "print")]
    json: bool,

    /// Use the built-in planner if the provider fails
    #[arg(long)]
    fallback: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let text = read_input(&args.input)?;
    let request = PlanRequest::new(text)
        .with_guidance(args.guidance.clone())
        .with_notes(args.notes);

    let config = ProviderConfig::new(ProviderKind::from_name_or_none(&args.provider))
        .with_api_key(args.api_key.clone())
        .with_model(args.model.clone())
        .with_timeout(Duration::from_secs(args.timeout));
    let provider = build_provider(&config).context("Failed to set up content provider")?;

    let plan = plan(&request, provider.as_ref(), args.fallback)?;
    if args.verbose {
        eprintln!("Planned {} slides", plan.len());
    }

    if args.json {
        let json = serde_json::to_string_pretty(&plan).context("Failed to serialize plan")?;
        println!("{}", json);
        return Ok(());
    }
    if args.print {
        let formatter = OutlineFormatter::new().with_notes(args.notes);
        print!("{}", formatter.format_with_newline(&plan));
        return Ok(());
    }

    let template_path = args
        .template
        .as_deref()
        .context("A template is required to write a deck")?;
    check_template(template_path)?;

    let output_path = get_output_path(&args.input, args.output.as_deref())?;
    let template = File::open(template_path)
        .with_context(|| format!("Failed to open {}", template_path.display()))?;

    let deck = PptxRenderer::new()
        .render(BufReader::new(template), &plan, Cursor::new(Vec::new()))
        .context("Failed to render presentation")?
        .into_inner();

    write_output(&output_path, &deck)?;
    if args.verbose {
        eprintln!("Written to: {}", output_path.display());
    }

    Ok(())
}

/// Plan slides, optionally retrying with the built-in planner when the
/// provider fails.
fn plan(request: &PlanRequest, provider: &dyn ContentProvider, fallback: bool) -> Result<SlidePlan> {
    match plan_slides(request, provider) {
        Ok(plan) => Ok(plan),
        Err(e) if fallback && e.is_provider_failure() => {
            log::warn!(
                "Provider {} failed ({}); using the built-in planner",
                provider.name(),
                e
            );
            assemble(&request.text, request.guidance.as_deref(), request.want_notes)
                .context("Failed to plan slides")
        }
        Err(e) => Err(e).context("Failed to plan slides"),
    }
}

/// Read the input text from a file or stdin.
fn read_input(path: &Path) -> Result<String> {
    let mut data = Vec::new();
    if path.as_os_str() == "-" {
        std::io::stdin()
            .take(MAX_TEXT_BYTES + 1)
            .read_to_end(&mut data)
            .context("Failed to read stdin")?;
    } else {
        File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?
            .take(MAX_TEXT_BYTES + 1)
            .read_to_end(&mut data)
            .with_context(|| format!("Failed to read {}", path.display()))?;
    }

    check_size(data.len() as u64, MAX_TEXT_BYTES, "Input text")?;
    let text = String::from_utf8(data).context("Input text is not valid UTF-8")?;
    if text.trim().is_empty() {
        bail!("Input text is empty");
    }
    Ok(text)
}

/// Check a template's extension and size.
fn check_template(path: &Path) -> Result<()> {
    check_template_extension(path)?;
    let size = std::fs::metadata(path)
        .with_context(|| format!("Failed to read {}", path.display()))?
        .len();
    check_size(size, MAX_TEMPLATE_BYTES, "Template")
}

fn check_template_extension(path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        Some("pptx" | "potx") => Ok(()),
        _ => bail!("Template must be a .pptx or .potx file"),
    }
}

fn check_size(size: u64, limit: u64, what: &str) -> Result<()> {
    if size > limit {
        bail!("{} is too large (limit {} MiB)", what, limit / (1024 * 1024));
    }
    Ok(())
}

/// Determine the output path for the generated deck.
fn get_output_path(input_path: &Path, output: Option<&Path>) -> Result<PathBuf> {
    let output_path = match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
            path.to_path_buf()
        }
        None if input_path.as_os_str() == "-" => PathBuf::from(STDIN_OUTPUT_NAME),
        None => {
            let stem = input_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("presentation");
            let output_filename = format!("{}.pptx", stem);

            match input_path.parent() {
                Some(parent) => parent.join(output_filename),
                None => PathBuf::from(output_filename),
            }
        }
    };

    Ok(output_path)
}

/// Write output to a file.
fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content)
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
