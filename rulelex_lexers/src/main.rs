use clap::{Parser, ValueEnum};
use rulelex_core::lexical::{self, Lexer, TokenCounts};
use rulelex_core::logging;
use rulelex_core::utils::SourceMap;
use rulelex_core::{log_info, RunMetrics, RuntimeConfig, Token};
use rulelex_lexers::{read_source, LexerCatalog};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about = "Dump the token stream of a file", long_about = None)]
struct Cli {
    /// File to tokenize
    #[arg(required_unless_present = "list")]
    file: Option<PathBuf>,

    /// Lexer name or alias; chosen from the file name when omitted
    #[arg(short, long)]
    lexer: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print token counts, run metrics and unclosed states after the tokens
    #[arg(short, long)]
    summary: bool,

    /// Runtime preferences file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List available lexers and exit
    #[arg(long)]
    list: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct Summary {
    counts: TokenCounts,
    metrics: RunMetrics,
    open_states: Vec<String>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    lexer: &'a str,
    tokens: &'a [Token],
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a Summary>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::default(),
    };
    logging::config::init_runtime_preferences(config.logging.clone())?;
    logging::init_global_logging()?;
    lexical::init_lexical_logging()?;

    let catalog = LexerCatalog::builtin()?;

    if cli.list {
        print_catalog(&catalog);
        return Ok(());
    }

    let Some(path) = cli.file.as_deref() else {
        return Err("no input file given".into());
    };

    let source = read_source(path)?;
    let lexer = catalog.resolve(cli.lexer.as_deref(), path)?;

    let source_name = path.display().to_string();
    logging::with_source_context(&source_name, || run(&cli, &config, lexer, path, &source))
}

fn run(
    cli: &Cli,
    config: &RuntimeConfig,
    lexer: &dyn Lexer,
    path: &Path,
    source: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut stream = lexer.get_tokens_with(source, config.tokenizer);
    let tokens = stream.drain_all();

    let summary = Summary {
        counts: lexical::get_token_counts(&tokens),
        metrics: stream.metrics().clone(),
        open_states: stream.open_states(),
    };

    log_info!("Writing token stream",
        "lexer" => lexer.name(),
        "format" => format!("{:?}", cli.format),
        "tokens" => summary.counts.total,
        "open_states" => summary.open_states.join(" > ")
    );

    match cli.format {
        OutputFormat::Json => {
            let report = JsonReport {
                lexer: lexer.name(),
                tokens: &tokens,
                summary: cli.summary.then_some(&summary),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            for token in &tokens {
                println!("{:<24} {:?}", token.kind.path(), token.text);
            }
            if summary.counts.has_errors() {
                report_error_tokens(path, source, &tokens);
            }
            if cli.summary {
                print_summary(lexer.name(), &summary);
            }
        }
    }

    Ok(())
}

fn report_error_tokens(path: &Path, source: &str, tokens: &[Token]) {
    let source_map = SourceMap::new(source.to_string());
    for token in tokens.iter().filter(|t| t.is_error()) {
        let message = format!("unrecognized input {:?} in {}", token.text, path.display());
        eprint!("{}", source_map.format_diagnostic(&token.span, &message));
    }
}

fn print_summary(lexer_name: &str, summary: &Summary) {
    let counts = &summary.counts;
    println!();
    println!("=== Summary ({}) ===", lexer_name);
    println!("  Tokens:       {}", counts.total);
    println!("  Significant:  {}", counts.significant_tokens());
    println!("  Names:        {}", counts.names);
    println!("  Strings:      {}", counts.strings);
    println!("  Operators:    {}", counts.operators);
    println!("  Comments:     {}", counts.comments);
    println!("  Whitespace:   {}", counts.whitespace);
    println!("  Errors:       {}", counts.errors);
    println!("  Max depth:    {}", summary.metrics.max_stack_depth);
    if summary.metrics.had_recoveries() {
        println!(
            "  Recoveries:   {} underflow(s), {} dropped push(es), {} forced fallback(s)",
            summary.metrics.stack_underflows,
            summary.metrics.dropped_pushes,
            summary.metrics.forced_fallbacks
        );
    }
    println!("  Open states:  {}", summary.open_states.join(" > "));
}

fn print_catalog(catalog: &LexerCatalog) {
    for lexer in catalog.iter() {
        println!("{}", lexer.name());
        println!("    aliases:   {}", lexer.aliases().join(", "));
        println!("    filenames: {}", lexer.filenames().join(", "));
        println!("    mimetypes: {}", lexer.mimetypes().join(", "));
    }
}
