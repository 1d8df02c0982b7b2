//! Compile design prompts and run synthesis against the Gemini API.
//!
//! Reads the API key from `GEMINI_API_KEY` (or `GOOGLE_API_KEY`) unless
//! `--api-key` is given.
//!
//! # Examples
//!
//! ```sh
//! # Print the compiled prompt without touching the network
//! hyperxgen compile --mode monogram --subject HX --directive "LAYOUT_MODE: stacked"
//!
//! # Synthesize a vector mark from a preset
//! hyperxgen synthesize --mode vector --subject "owl" --preset sig-vec-02 --out owl.png
//!
//! # Extract style DNA, then reuse it
//! hyperxgen extract --image ref.png --out dna.json
//! hyperxgen synthesize --mode typo --subject NEON --dna dna.json --out neon.png
//!
//! # Browse presets
//! hyperxgen presets --kind monogram
//! ```

use clap::{Parser, Subcommand};
use futures::future::BoxFuture;
use hyperxgen::directives::{effective_subject, join_directives, subject_for_source};
use hyperxgen::media::{decode_data_url, extension_for_mime, read_image};
use hyperxgen::presets::{PresetKind, combine_with_preset, find_preset, group_by_category};
use hyperxgen::prelude::*;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Compile design prompts and run synthesis against the Gemini API.
#[derive(Parser)]
#[command(name = "hyperxgen", version)]
struct Cli {
    // ── Configuration ──────────────────────────────────────────
    /// JSON settings file (model, temperature, textModel, maxRetries, ...)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Image model, overriding the settings file
    #[arg(long, global = true)]
    model: Option<String>,

    /// Sampling temperature, overriding the settings file
    #[arg(long, global = true)]
    temperature: Option<f32>,

    /// API key, overriding GEMINI_API_KEY / GOOGLE_API_KEY
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Quota retries per request
    #[arg(long, global = true)]
    retries: Option<u32>,

    /// Log request details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the compiled prompt (no network)
    Compile {
        #[arg(long)]
        mode: Mode,
        #[arg(long, default_value = "")]
        subject: String,
        /// Style DNA JSON produced by `extract`
        #[arg(long)]
        dna: Option<PathBuf>,
        /// `KEY: value` directive line (repeatable)
        #[arg(long = "directive")]
        directives: Vec<String>,
        /// Compile as if a source image were attached
        #[arg(long)]
        has_image: bool,
    },

    /// Synthesize an image and write it to disk
    Synthesize {
        #[arg(long)]
        mode: Mode,
        #[arg(long, default_value = "")]
        subject: String,
        /// Source image to vectorize or restyle
        #[arg(long)]
        image: Option<PathBuf>,
        #[arg(long)]
        dna: Option<PathBuf>,
        /// Preset id (see `presets`)
        #[arg(long)]
        preset: Option<String>,
        #[arg(long = "directive")]
        directives: Vec<String>,
        /// Output file; the extension is replaced to match the returned MIME type
        #[arg(long)]
        out: PathBuf,
    },

    /// Extract style DNA from an image
    Extract {
        #[arg(long)]
        image: PathBuf,
        /// Write the DNA JSON here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Ask the text model to tighten a prompt
    RefinePrompt {
        #[arg(long)]
        mode: Mode,
        #[arg(long)]
        prompt: String,
        #[arg(long)]
        dna: Option<PathBuf>,
    },

    /// Rebalance the composition of an existing image
    RefineComposition {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },

    /// List built-in presets grouped by category
    Presets {
        /// vector, typography, monogram, or filter (default: all)
        #[arg(long)]
        kind: Option<PresetKind>,
    },
}

// ── Credential reselection ─────────────────────────────────────────

/// Prompts on stderr and reads a replacement key from stdin.
struct StdinReselector {
    key: ApiKey,
}

impl CredentialReselector for StdinReselector {
    fn reselect(&self) -> BoxFuture<'_, Result<(), KernelError>> {
        Box::pin(async move {
            eprint!("API key rejected. Enter a new Gemini API key: ");
            let mut line = String::new();
            BufReader::new(tokio::io::stdin())
                .read_line(&mut line)
                .await?;
            let key = line.trim();
            if key.is_empty() {
                return Err(KernelError::Credential("no key entered".into()));
            }
            self.key.set(key);
            info!("API key replaced");
            Ok(())
        })
    }
}

// ── Helpers ────────────────────────────────────────────────────────

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(cli: &Cli) -> Result<Settings, KernelError> {
    let mut settings = Settings::load_or_default(cli.config.as_deref())?;
    if let Some(model) = &cli.model {
        settings.kernel.model = model.clone();
    }
    if let Some(t) = cli.temperature {
        settings.kernel.temperature = t;
    }
    if let Some(r) = cli.retries {
        settings.max_retries = r;
    }
    settings.validate()?;
    Ok(settings)
}

fn load_dna(path: Option<&Path>) -> Result<Option<ExtractionResult>, KernelError> {
    let Some(path) = path else {
        return Ok(None);
    };
    let content = std::fs::read_to_string(path)?;
    let dna = serde_json::from_str(&content).map_err(|e| {
        KernelError::Parse(format!("invalid DNA file '{}': {e}", path.display()))
    })?;
    Ok(Some(dna))
}

/// Decode `data_url` and write it next to `out` with a matching extension.
fn write_image(data_url: &str, out: &Path) -> Result<PathBuf, KernelError> {
    let (mime, bytes) = decode_data_url(data_url)?;
    let path = out.with_extension(extension_for_mime(&mime));
    std::fs::write(&path, bytes)?;
    Ok(path)
}

fn build_kernel(cli: &Cli, settings: &Settings) -> Result<DesignKernel<GeminiClient>, KernelError> {
    let key = match &cli.api_key {
        Some(k) => ApiKey::new(k.clone()),
        None => ApiKey::from_env().ok_or_else(|| {
            KernelError::Config(
                "GEMINI_API_KEY environment variable is not set (or pass --api-key)".into(),
            )
        })?,
    };
    let reselector = Arc::new(StdinReselector { key: key.clone() });
    let executor = ReliableExecutor::new(settings.retry_config()).with_reselector(reselector);
    let client = GeminiClient::new(key)?;
    Ok(DesignKernel::from_settings(client, settings).with_executor(executor))
}

fn print_presets(kind: Option<PresetKind>) {
    let kinds = match kind {
        Some(k) => vec![k],
        None => PresetKind::ALL.to_vec(),
    };
    for kind in kinds {
        println!("{kind}");
        for group in group_by_category(kind) {
            println!("  {}", group.title);
            for preset in group.items {
                println!("    {:<14} {}: {}", preset.id, preset.name, preset.description);
            }
        }
    }
}

async fn run(cli: Cli) -> Result<(), KernelError> {
    let settings = load_settings(&cli)?;

    match &cli.command {
        Command::Compile {
            mode,
            subject,
            dna,
            directives,
            has_image,
        } => {
            let dna = load_dna(dna.as_deref())?;
            let subject = effective_subject(*mode, subject, *has_image);
            let extra = join_directives(directives);
            let prompt = PromptCompiler::default().compile(
                &subject,
                *mode,
                dna.as_ref(),
                extra.as_deref(),
                *has_image,
            );
            println!("{prompt}");
        }

        Command::Synthesize {
            mode,
            subject,
            image,
            dna,
            preset,
            directives,
            out,
        } => {
            let kernel = build_kernel(&cli, &settings)?;
            let dna = load_dna(dna.as_deref())?;
            let image = image.as_deref().map(read_image).transpose()?;

            let preset = match preset {
                Some(id) => Some(find_preset(id).ok_or_else(|| {
                    KernelError::Config(format!("unknown preset '{id}'"))
                })?),
                None => None,
            };
            if let Some(p) = preset
                && p.kind.mode() != Some(*mode)
            {
                warn!("preset '{}' is a {} preset, not {mode}", p.id, p.kind);
            }

            let subject = subject_for_source(*mode, subject, image.as_deref());
            let subject = combine_with_preset(preset, &subject);
            let extra = join_directives(directives);

            let result = kernel
                .synthesize(
                    *mode,
                    &subject,
                    image.as_deref(),
                    dna.as_ref(),
                    extra.as_deref(),
                )
                .await?;
            let path = write_image(&result, out)?;
            eprintln!("  Wrote {}", path.display());
        }

        Command::Extract { image, out } => {
            let kernel = build_kernel(&cli, &settings)?;
            let dna = kernel.extract_style(&read_image(image)?).await?;
            let json = serde_json::to_string_pretty(&dna)
                .map_err(|e| KernelError::Parse(format!("failed to serialize DNA: {e}")))?;
            match out {
                Some(path) => {
                    std::fs::write(path, json)?;
                    eprintln!("  {}", dna.summary());
                    eprintln!("  Wrote {}", path.display());
                }
                None => println!("{json}"),
            }
        }

        Command::RefinePrompt { mode, prompt, dna } => {
            let kernel = build_kernel(&cli, &settings)?;
            let dna = load_dna(dna.as_deref())?;
            let refined = kernel.refine_text_prompt(prompt, *mode, dna.as_ref()).await?;
            println!("{refined}");
        }

        Command::RefineComposition { image, out } => {
            let kernel = build_kernel(&cli, &settings)?;
            let result = kernel.refine_composition(&read_image(image)?).await?;
            let path = write_image(&result, out)?;
            eprintln!("  Wrote {}", path.display());
        }

        Command::Presets { kind } => print_presets(*kind),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
