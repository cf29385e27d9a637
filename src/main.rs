// rat25s: lexer and syntax checker for the Rat25S teaching language

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser as CliParser, Subcommand};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use rat25s::parser::{ParseOptions, ParseOutcome, Parser, TokenKind, tokenize};
use rat25s::report;
use rat25s::ui::App;

#[derive(CliParser, Debug)]
#[command(name = "rat25s", version, about = "Lexer and syntax checker for Rat25S")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tokenize a source file and write the token table
    Lex {
        /// Rat25S source file
        input: PathBuf,

        /// Where to write the token table
        #[arg(short, long, default_value = "output.txt")]
        output: PathBuf,
    },
    /// Check a source file and write the rule trace and diagnostics
    Parse {
        /// Rat25S source file
        input: PathBuf,

        /// Where to write the parse report
        #[arg(short, long, default_value = "sa_output.txt")]
        output: PathBuf,

        /// Leave production rules out of the trace
        #[arg(long)]
        no_rules: bool,

        /// Step through the trace in the terminal viewer
        #[arg(long)]
        tui: bool,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read '{}': {source}", .path.display())]
    ReadInput { path: PathBuf, source: io::Error },

    #[error("cannot write '{}': {source}", .path.display())]
    WriteOutput { path: PathBuf, source: io::Error },

    #[error("terminal: {0}")]
    Terminal(#[from] io::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let tui = matches!(cli.command, Command::Parse { tui: true, .. });
    let default_directive = if tui && cli.verbose == 0 {
        "off"
    } else {
        directive_for_verbosity(cli.verbose)
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_ansi(!tui)
        .with_writer(io::stderr)
        .init();

    match run(cli.command) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(1)
        }
    }
}

fn directive_for_verbosity(v: u8) -> &'static str {
    match v {
        0 => "rat25s=warn",
        1 => "rat25s=debug",
        _ => "rat25s=trace",
    }
}

fn run(command: Command) -> Result<ExitCode, CliError> {
    match command {
        Command::Lex { input, output } => lex(&input, &output),
        Command::Parse {
            input,
            output,
            no_rules,
            tui,
        } => parse(&input, &output, no_rules, tui),
    }
}

fn read_source(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    })
}

fn write_output(path: &Path, contents: &str) -> Result<(), CliError> {
    fs::write(path, contents).map_err(|source| CliError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })
}

fn lex(input: &Path, output: &Path) -> Result<ExitCode, CliError> {
    let source = read_source(input)?;
    let tokens = tokenize(&source);

    for token in tokens.iter().filter(|t| t.kind == TokenKind::Unknown) {
        warn!(line = token.line, lexeme = %token.lexeme, "unrecognised input");
    }

    write_output(output, &report::render_token_table(&tokens))?;
    info!("{}", report::render_token_summary(&tokens));

    let count = tokens.iter().filter(|t| !t.is_eof()).count();
    eprintln!(
        "Lexical analysis complete → {} ({} tokens)",
        output.display(),
        count
    );
    Ok(ExitCode::SUCCESS)
}

fn parse(input: &Path, output: &Path, no_rules: bool, tui: bool) -> Result<ExitCode, CliError> {
    let source = read_source(input)?;
    let options = ParseOptions {
        trace_productions: !no_rules,
    };
    let outcome = Parser::with_options(tokenize(&source), options).parse_program();
    debug!(
        entries = outcome.trace.len(),
        errors = outcome.error_count(),
        "syntax analysis finished"
    );

    write_output(output, &report::render_parse_report(&outcome))?;

    let status = outcome.exit_status();
    let messages: Vec<String> = outcome
        .diagnostics
        .iter()
        .map(ToString::to_string)
        .chain(std::iter::once(report::summary_line(&outcome)))
        .collect();

    if tui {
        run_viewer(outcome, source)?;
    }

    for message in &messages {
        eprintln!("{}", message);
    }
    Ok(ExitCode::from(status))
}

fn run_viewer(outcome: ParseOutcome, source: String) -> Result<(), CliError> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(outcome, source);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(CliError::from)
}
