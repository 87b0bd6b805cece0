use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use colored::{ColoredString, Colorize};
use std::fs;
use std::path::PathBuf;

use tmlex::grammars;
use tmlex::{GrammarId, LexOptions, Lexer, Token, TokenKind};

#[derive(Parser)]
#[command(name = "tmlex")]
#[command(author, version, about = "Tokenizer for the CTM, tolog and CRTM Topic Maps syntaxes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DumpFormat {
    /// One `Kind "text"` line per token
    #[value(name = "text")]
    Text,
    /// JSON array of tokens
    #[value(name = "json")]
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token stream of a file
    Tokens {
        /// The source file to tokenize
        input: PathBuf,

        /// Grammar name or alias (defaults to the one matching the file name)
        #[arg(short, long)]
        lang: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: DumpFormat,

        /// Normalize, strip and terminate newlines like a highlighter would
        #[arg(long)]
        highlighting: bool,
    },

    /// Print a file with ANSI syntax colors
    Highlight {
        /// The source file to highlight
        input: PathBuf,

        /// Grammar name or alias (defaults to the one matching the file name)
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Report unrecognized characters and unclosed constructs
    Check {
        /// The source file to check
        input: PathBuf,

        /// Grammar name or alias (defaults to the one matching the file name)
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// List the registered grammars
    List,
}

fn main() -> Result<()> {
    // Initialize logger before parsing CLI args
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    // Set log level based on verbose flag
    if cli.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    let result = match cli.command {
        Commands::Tokens {
            input,
            lang,
            format,
            highlighting,
        } => tokens(input, lang, format, highlighting),
        Commands::Highlight { input, lang } => highlight(input, lang),
        Commands::Check { input, lang } => check(input, lang),
        Commands::List => list(),
    };

    if let Err(e) = result {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

/// A loaded source file and the grammar chosen for it
struct SourceState {
    grammar: GrammarId,
    source: String,
    files: SimpleFiles<String, String>,
    file_id: usize,
}

impl SourceState {
    fn new(input: PathBuf, lang: Option<String>) -> Result<Self> {
        let grammar = match lang {
            Some(name) => name.parse::<GrammarId>()?,
            None => GrammarId::for_filename(&input).with_context(|| {
                format!("No grammar registered for {:?}, pass --lang", input)
            })?,
        };
        let source = fs::read_to_string(&input)
            .with_context(|| format!("Failed to read source file: {:?}", input))?;
        log::debug!("Using grammar {} for {:?}", grammar, input);

        let mut files = SimpleFiles::new();
        let file_id = files.add(input.display().to_string(), source.clone());

        Ok(Self {
            grammar,
            source,
            files,
            file_id,
        })
    }

    fn lexer(&self, options: &LexOptions) -> Result<Lexer<'_>> {
        let grammar = grammars::grammar(self.grammar)?;
        Ok(Lexer::with_options(grammar, &self.source, options))
    }

    fn report_error(&self, diagnostic: &Diagnostic<usize>) -> Result<()> {
        let writer = StandardStream::stderr(ColorChoice::Auto);
        let config = codespan_reporting::term::Config::default();
        codespan_reporting::term::emit(&mut writer.lock(), &config, &self.files, diagnostic)?;
        Ok(())
    }
}

fn tokens(input: PathBuf, lang: Option<String>, format: DumpFormat, highlighting: bool) -> Result<()> {
    let state = SourceState::new(input, lang)?;
    let options = if highlighting {
        LexOptions::highlighting()
    } else {
        LexOptions::default()
    };
    let tokens: Vec<Token> = state.lexer(&options)?.collect();

    match format {
        DumpFormat::Text => {
            for token in &tokens {
                println!("{:>5}:{:<4} {}", token.position.line, token.position.column, token);
            }
        }
        DumpFormat::Json => println!("{}", serde_json::to_string_pretty(&tokens)?),
    }
    Ok(())
}

fn highlight(input: PathBuf, lang: Option<String>) -> Result<()> {
    let state = SourceState::new(input, lang)?;
    for token in state.lexer(&LexOptions::default())? {
        print!("{}", paint(&token));
    }
    Ok(())
}

fn paint(token: &Token) -> ColoredString {
    let text = token.text.as_str();
    let kind = token.kind;
    if kind.is_a(TokenKind::Error) {
        text.red().underline()
    } else if kind.is_a(TokenKind::Comment) {
        text.bright_black().italic()
    } else if kind.is_a(TokenKind::KeywordConstant) {
        text.magenta()
    } else if kind.is_a(TokenKind::Keyword) {
        text.blue().bold()
    } else if kind.is_a(TokenKind::NameFunction) || kind.is_a(TokenKind::NameBuiltin) {
        text.cyan()
    } else if kind.is_a(TokenKind::NameNamespace) {
        text.cyan().bold()
    } else if kind.is_a(TokenKind::NameVariable) {
        text.yellow()
    } else if kind.is_a(TokenKind::LiteralIri) {
        text.green().underline()
    } else if kind.is_a(TokenKind::Literal) {
        text.green()
    } else if kind.is_a(TokenKind::Operator) {
        text.magenta()
    } else {
        text.normal()
    }
}

fn check(input: PathBuf, lang: Option<String>) -> Result<()> {
    log::info!("Checking {:?}", input);

    let state = SourceState::new(input, lang)?;
    let mut lexer = state.lexer(&LexOptions::default())?;
    let mut has_errors = false;

    for token in lexer.by_ref() {
        if token.is_error() {
            has_errors = true;
            let diagnostic = Diagnostic::error()
                .with_message(format!("Lexical error: unrecognized character {:?}", token.text))
                .with_labels(vec![Label::primary(state.file_id, token.span.clone())]);
            state.report_error(&diagnostic)?;
        }
    }

    if !lexer.is_at_root() {
        has_errors = true;
        let end = state.source.len();
        let diagnostic = Diagnostic::error()
            .with_message("Unclosed construct at end of input")
            .with_labels(vec![Label::primary(state.file_id, end..end)
                .with_message(format!("still inside {}", lexer.state_stack().join(" > ")))]);
        state.report_error(&diagnostic)?;
    }

    if has_errors {
        anyhow::bail!("Lexical check failed");
    }

    println!("{}: No errors found", "success".green().bold());
    Ok(())
}

fn list() -> Result<()> {
    for id in GrammarId::ALL {
        let info = id.info();
        println!("{}", info.name.bold());
        println!("  aliases:   {}", info.aliases.join(", "));
        println!("  filenames: {}", info.filenames.join(", "));
        println!("  mimetypes: {}", info.mimetypes.join(", "));
    }
    Ok(())
}
