use std::io::{self, Read};

use clap::{Parser, Subcommand, ValueEnum};
use log::{LevelFilter, debug, error};

use follang::driver::{self, Driver, DriverOptions, Session};
use follang::error::Error;
use follang::parser::lexer::{self, Lexer};
use follang::parser::precedence::PrecedenceTable;

#[derive(Parser)]
#[command(name = "follang")]
#[command(about = "Parser for a small first-order logic language", version)]
struct Cli {
    /// Precedence of /\
    #[arg(long, global = true, default_value_t = 40)]
    and_prec: u16,

    /// Precedence of \/
    #[arg(long, global = true, default_value_t = 20)]
    or_prec: u16,

    /// Parse top-level expressions instead of skipping them
    #[arg(long, global = true)]
    expressions: bool,

    /// Overrides RUST_LOG
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read definitions from stdin with a prompt (default)
    Repl {
        /// Print every parsed tree
        #[arg(long)]
        show_ast: bool,
    },

    /// Parse a file and report every top-level item
    Parse {
        /// Source file
        input: String,

        /// Print the token stream first
        #[arg(long)]
        tokens: bool,

        /// Print every parsed tree
        #[arg(long)]
        show_ast: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn init_logging(level: Option<LogLevel>) {
    let mut builder = pretty_env_logger::formatted_timed_builder();
    builder.filter_level(LevelFilter::Warn);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    if let Some(level) = level {
        builder.filter_level(level.into());
    }
    builder.init();
}

fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let precedence = PrecedenceTable::new(i32::from(cli.and_prec), i32::from(cli.or_prec));
    debug!("{:?}", precedence);

    match cli.command.unwrap_or(Commands::Repl { show_ast: false }) {
        Commands::Repl { show_ast } => {
            // Bytes are pulled one at a time so the prompt shows before each read.
            let stdin = io::stdin();
            let chars = stdin
                .lock()
                .bytes()
                .map_while(|byte| byte.map_err(|e| error!("failed to read stdin: {}", e)).ok())
                .map(char::from);

            let options = DriverOptions {
                show_ast,
                expressions: cli.expressions,
                ..DriverOptions::default()
            };
            let parser = follang::parser::Parser::new(Lexer::new(chars), precedence);
            Driver::new(parser, io::stderr(), options).run()?;
        }
        Commands::Parse { input, tokens, show_ast } => {
            if tokens {
                let source = std::fs::read_to_string(&input)?;
                println!("=== TOKENS ===");
                for token in lexer::tokenize(&source) {
                    println!("{:?}", token);
                }
                println!("=== AST ===");
            }

            let options = DriverOptions {
                prompt: None,
                show_ast,
                expressions: cli.expressions,
            };
            let session = driver::run_file(&input, precedence, options, io::stdout())?;
            summarize(&input, &session)?;
        }
    }

    Ok(())
}

fn summarize(input: &str, session: &Session) -> Result<(), Error> {
    println!(
        "{}: {} item(s), {} error(s), {} warning(s)",
        input,
        session.items.len(),
        session.errors.len(),
        session.warnings
    );

    if session.errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Rejected {
            errors: session.errors.len(),
        })
    }
}
