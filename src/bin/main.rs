use clap::{Parser, Subcommand};
use language_sniffer::config::{self, SnifferSettings};
use language_sniffer::language::{LanguageResolver, PrologScanner};
use language_sniffer::{SnifferError, SnifferResult};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEFAULT_EXCERPT_BYTES: usize = 4096;

/// Guess the language of documents from their filename and contents
#[derive(Parser)]
#[command(name = "language-sniffer")]
#[command(version)]
#[command(about = "Guess the language of documents from their filename and contents")]
struct Cli {
    /// Settings file layered over the user configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify files by name, falling back to their contents
    Detect {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Bytes read from each end of a file for content sniffing
        #[arg(long, default_value_t = DEFAULT_EXCERPT_BYTES)]
        excerpt_bytes: usize,
    },
    /// Guess the language of text read from stdin
    Guess {
        /// Bytes taken from each end of the input
        #[arg(long, default_value_t = DEFAULT_EXCERPT_BYTES)]
        excerpt_bytes: usize,
    },
    /// List the active file associations
    Associations {
        /// Only patterns mapped to this language
        #[arg(long)]
        language: Option<String>,
    },
    /// List languages, primary ones first
    Languages,
}

#[derive(Serialize)]
struct Detection {
    path: String,
    language: Option<String>,
    source: Option<&'static str>,
    candidates: Vec<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> SnifferResult<()> {
    let settings = load_settings(cli.config.as_deref())?;
    let resolver = LanguageResolver::from_settings(&settings, Arc::new(PrologScanner));

    match cli.command {
        Commands::Detect {
            files,
            excerpt_bytes,
        } => {
            let mut detections = Vec::with_capacity(files.len());
            for path in &files {
                detections.push(detect(&resolver, path, excerpt_bytes)?);
            }
            if cli.json {
                print_json(&detections)?;
            } else {
                for d in &detections {
                    match (&d.language, d.source) {
                        (Some(language), Some(source)) => {
                            println!("{}: {} ({})", d.path, language, source)
                        }
                        _ => println!("{}: unknown", d.path),
                    }
                }
            }
        }
        Commands::Guess { excerpt_bytes } => {
            let mut input = Vec::new();
            std::io::stdin().read_to_end(&mut input)?;
            let (head, tail) = excerpts(&input, excerpt_bytes);
            let languages = resolver.guess_language_from_contents(&head, &tail);
            if cli.json {
                print_json(&languages)?;
            } else {
                for language in languages {
                    println!("{}", language);
                }
            }
        }
        Commands::Associations { language } => {
            let (patterns, languages) = resolver.get_file_associations();
            let pairs: Vec<(String, String)> = patterns
                .into_iter()
                .zip(languages)
                .filter(|(_, l)| language.as_ref().is_none_or(|wanted| wanted == l))
                .collect();
            if cli.json {
                print_json(&pairs)?;
            } else {
                for (pattern, language) in pairs {
                    println!("{}\t{}", pattern, language);
                }
            }
        }
        Commands::Languages => {
            let hierarchy = resolver.language_hierarchy();
            if cli.json {
                print_json(&hierarchy)?;
            } else {
                for item in hierarchy.primary.iter().chain(&hierarchy.other) {
                    let marker = if hierarchy.primary.contains(item) { "*" } else { " " };
                    println!("{} {}", marker, item.name);
                }
            }
        }
    }
    Ok(())
}

/// User config, then the `--config` file on top.
fn load_settings(explicit: Option<&Path>) -> SnifferResult<SnifferSettings> {
    let user = config::load_user_config()?;
    let explicit = explicit.map(config::load_config_file).transpose()?;
    Ok(config::merge_all(&[user, explicit]).unwrap_or_default())
}

fn detect(
    resolver: &LanguageResolver,
    path: &Path,
    excerpt_bytes: usize,
) -> SnifferResult<Detection> {
    let basename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let display = path.display().to_string();

    let by_name = resolver.suggest_language_for_file(&basename);
    if !by_name.is_empty() {
        return Ok(Detection {
            path: display,
            language: Some(by_name),
            source: Some("filename"),
            candidates: Vec::new(),
        });
    }

    let bytes = std::fs::read(path)?;
    let (head, tail) = excerpts(&bytes, excerpt_bytes);
    let candidates = resolver.guess_language_from_contents(&head, &tail);
    Ok(Detection {
        path: display,
        language: candidates.first().cloned(),
        source: candidates.first().map(|_| "content"),
        candidates,
    })
}

/// First and last `limit` bytes, decoded lossily.
fn excerpts(bytes: &[u8], limit: usize) -> (String, String) {
    let head = &bytes[..bytes.len().min(limit)];
    let tail = &bytes[bytes.len().saturating_sub(limit)..];
    (
        String::from_utf8_lossy(head).into_owned(),
        String::from_utf8_lossy(tail).into_owned(),
    )
}

fn print_json<T: Serialize>(value: &T) -> SnifferResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| SnifferError::config(e.to_string()))?;
    println!("{}", text);
    Ok(())
}
