use std::{
    fs,
    io::{self, BufRead, IsTerminal},
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, Context};
use clap::{ArgAction, Args, Parser, Subcommand};
use console::style;
use serde::Serialize;
use slng_core::{
    load_dictionary_file, CanonicalGroup, Detection, Detector, DetectorConfig, ElongationPolicy,
    Sentiment, SlangDictionary, SlangEntry,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// SLNG command-line entry point.
#[derive(Debug, Parser)]
#[command(name = "slng", about = "Spot Indonesian slang in sentences and explain it.")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG wins when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Detect slang in sentences given as arguments or one per stdin line.
    Detect(DetectArgs),
    /// List the dictionary grouped by canonical form.
    Lookup(LookupArgs),
    /// Show every variant of one canonical word.
    Variants(VariantsArgs),
}

#[derive(Debug, Args)]
struct DictArgs {
    /// Dictionary JSON, grouped or flat.
    #[arg(long, default_value = "slang.json")]
    dict: PathBuf,
}

#[derive(Debug, Args)]
struct DetectArgs {
    #[command(flatten)]
    dict: DictArgs,

    /// Path to config file (YAML). Defaults to slng.yml if present.
    #[arg(long, default_value = "slng.yml")]
    config: PathBuf,

    /// Set config overrides (repeatable as key=value). Example: --set elongation=fallback-only
    #[arg(long = "set", value_name = "KEY=VALUE", num_args = 1)]
    sets: Vec<String>,

    /// Sentence sentiment reported by the translator.
    #[arg(long, value_name = "positive|neutral|negative")]
    sentiment: Option<Sentiment>,

    /// Emit JSON output for automation.
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Include raw matches and per-occurrence choices.
    #[arg(long, action = ArgAction::SetTrue)]
    explain: bool,

    /// Sentence to scan. Words are joined with spaces.
    #[arg(value_name = "TEXT", num_args = 0..)]
    text: Vec<String>,
}

#[derive(Debug, Args)]
struct LookupArgs {
    #[command(flatten)]
    dict: DictArgs,

    /// Emit JSON output for automation.
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Only show words whose spelling or canonical form contains this.
    #[arg(value_name = "KEYWORD")]
    keyword: Option<String>,
}

#[derive(Debug, Args)]
struct VariantsArgs {
    #[command(flatten)]
    dict: DictArgs,

    /// Emit JSON output for automation.
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    #[arg(value_name = "CANONICAL")]
    canonical: String,
}

#[derive(Debug, Serialize)]
struct SentenceResult<'a> {
    text: &'a str,
    sentiment: Option<Sentiment>,
    entries: &'a [SlangEntry],
    #[serde(skip_serializing_if = "Option::is_none")]
    detection: Option<&'a Detection>,
}

#[derive(Debug, Serialize)]
struct GroupOutput<'a> {
    canonical_form: &'a str,
    variants: &'a [&'a SlangEntry],
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Detect(args) => run_detect(args),
        Command::Lookup(args) => run_lookup(args),
        Command::Variants(args) => run_variants(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .init();
}

fn run_detect(args: DetectArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.config)?;
    apply_overrides(&mut cfg, &args.sets)?;
    let entries = load_dictionary(&args.dict.dict)?;
    debug!(entries = entries.len(), config = ?cfg, "building detector");
    let detector = Detector::new(entries, cfg);

    let sentences = if args.text.is_empty() {
        read_stdin_lines()?
    } else {
        vec![args.text.join(" ")]
    };

    let mut results = Vec::with_capacity(sentences.len());
    for sentence in &sentences {
        results.push(detector.detect(sentence, args.sentiment));
    }

    if args.json {
        let output: Vec<SentenceResult<'_>> = sentences
            .iter()
            .zip(&results)
            .map(|(text, detection)| SentenceResult {
                text,
                sentiment: args.sentiment,
                entries: &detection.entries,
                detection: args.explain.then_some(detection),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for (sentence, detection) in sentences.iter().zip(&results) {
        print_detection(sentence, detection, &detector, args.explain);
    }
    Ok(())
}

fn run_lookup(args: LookupArgs) -> anyhow::Result<()> {
    let dictionary = SlangDictionary::new(load_dictionary(&args.dict.dict)?);
    let groups = dictionary.grouped(args.keyword.as_deref());

    if args.json {
        let output: Vec<GroupOutput<'_>> = groups
            .iter()
            .map(|g| GroupOutput {
                canonical_form: &g.canonical_form,
                variants: &g.variants,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if groups.is_empty() {
        println!("{}", style("No matching slang.").dim());
        return Ok(());
    }
    for group in &groups {
        print_group(group);
    }
    println!(
        "\n{} words, {} variants",
        groups.len(),
        groups.iter().map(|g| g.variants.len()).sum::<usize>()
    );
    Ok(())
}

fn run_variants(args: VariantsArgs) -> anyhow::Result<()> {
    let dictionary = SlangDictionary::new(load_dictionary(&args.dict.dict)?);
    let variants = dictionary.variants_of(&args.canonical);
    if variants.is_empty() {
        bail!("no variants registered for `{}`", args.canonical);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&variants)?);
        return Ok(());
    }
    print_group(&CanonicalGroup {
        canonical_form: variants[0].canonical_form.clone(),
        variants,
    });
    Ok(())
}

fn print_detection(sentence: &str, detection: &Detection, detector: &Detector, explain: bool) {
    println!("{}", style(sentence).bold());
    if detection.entries.is_empty() {
        println!("  {}", style("no slang found").dim());
    }
    for (idx, entry) in detection.entries.iter().enumerate() {
        println!(
            "  {}. {} {} {}",
            idx + 1,
            style(&entry.slang).cyan().bold(),
            style(format!("({})", entry.canonical_form)).dim(),
            sentiment_label(entry.sentiment),
        );
        if !entry.translation_target.is_empty() {
            println!("     {}", entry.translation_target);
        }
        if !entry.example_native.is_empty() {
            println!(
                "     {} {}",
                style("e.g.").dim(),
                style(&entry.example_native).italic()
            );
        }
    }

    if explain {
        if detection.normalized_retry {
            println!(
                "  {} retried on `{}`",
                style("note:").yellow(),
                detection.searched_text
            );
        }
        for res in &detection.resolutions {
            let chosen = detector
                .dictionary()
                .get(res.chosen)
                .map(|e| e.slang.as_str())
                .unwrap_or("?");
            println!(
                "  {} {}..{} `{}` -> {}",
                style("match").dim(),
                res.span.start,
                res.span.end,
                res.token,
                chosen
            );
        }
    }
    println!();
}

fn print_group(group: &CanonicalGroup<'_>) {
    println!("{}", style(&group.canonical_form).bold());
    for variant in &group.variants {
        println!(
            "  - {} {} {}",
            style(&variant.slang).cyan(),
            sentiment_label(variant.sentiment),
            variant.translation_target
        );
    }
}

fn sentiment_label(sentiment: Sentiment) -> String {
    let label = format!("[{sentiment}]");
    match sentiment {
        Sentiment::Positive => style(label).green().to_string(),
        Sentiment::Neutral => style(label).dim().to_string(),
        Sentiment::Negative => style(label).red().to_string(),
    }
}

fn read_stdin_lines() -> anyhow::Result<Vec<String>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        bail!("no text given; pass TEXT or pipe sentences on stdin");
    }
    let mut lines = Vec::new();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read stdin")?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}

fn load_dictionary(path: &Path) -> anyhow::Result<Vec<SlangEntry>> {
    load_dictionary_file(path)
        .with_context(|| format!("Failed to load dictionary {}", path.display()))
}

fn load_config(path: &Path) -> anyhow::Result<DetectorConfig> {
    if path.exists() {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        DetectorConfig::from_yaml_str(&text)
            .with_context(|| format!("Invalid config structure in {}", path.display()))
    } else {
        Ok(DetectorConfig::default())
    }
}

fn apply_overrides(cfg: &mut DetectorConfig, sets: &[String]) -> anyhow::Result<()> {
    for kv in sets {
        let mut parts = kv.splitn(2, '=');
        let key = parts.next().unwrap_or("").trim();
        let val = parts.next().unwrap_or("").trim();
        if key.is_empty() {
            continue;
        }
        match key {
            "elongation" => {
                cfg.elongation = serde_yaml::from_str::<ElongationPolicy>(val)
                    .map_err(|_| anyhow!("unknown elongation policy `{val}`"))?;
            }
            "normalized_retry" => {
                cfg.normalized_retry = parse_bool(val)
                    .ok_or_else(|| anyhow!("invalid normalized_retry value `{val}`"))?;
            }
            other => bail!("unknown config key `{other}`"),
        }
    }
    Ok(())
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
