use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use clap::Parser;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::tty::IsTty;
use itertools::Itertools;
use tracing_subscriber::EnvFilter;

use chronopat::{Component, ComponentKind, ScanError, Token, tokenize, validate};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Patterns to inspect; read one per line from stdin when omitted (blank lines are empty patterns)
    #[arg(value_name = "PATTERN")]
    patterns: Vec<String>,

    /// Validate patterns and fail if any is invalid
    #[arg(short = 'c', long)]
    check: bool,

    /// Print the symbol table and exit
    #[arg(short = 'k', long)]
    kinds: bool,

    /// Disable coloured output
    #[arg(long)]
    no_color: bool,

    /// Increase log verbosity (repeatable); RUST_LOG takes precedence
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let stdout = io::stdout();
    let mut out = Painter {
        color: !args.no_color && stdout.is_tty(),
        out: stdout.lock(),
    };

    if args.kinds {
        return print_kinds(&mut out);
    }

    let patterns = if args.patterns.is_empty() {
        read_patterns(io::stdin().lock())?
    } else {
        args.patterns
    };
    if patterns.is_empty() {
        return Err(ScanError::MissingPattern.into());
    }

    let mut failures = Vec::new();
    for pattern in &patterns {
        if args.check {
            if let Err(err) = validate(pattern) {
                out.styled(&format!("{pattern:?}"), None, true)?;
                out.plain(": ")?;
                out.styled(&err.to_string(), Some(Color::Red), false)?;
                out.plain("\n")?;
                failures.push(pattern.as_str());
            }
        } else {
            print_tokens(&mut out, pattern, &tokenize(pattern))?;
        }
    }
    out.out.flush()?;

    if !failures.is_empty() {
        bail!(
            "{} invalid pattern{}: {}",
            failures.len(),
            if failures.len() == 1 { "" } else { "s" },
            failures.iter().map(|p| format!("{p:?}")).join(", ")
        );
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_patterns(input: impl BufRead) -> Result<Vec<String>> {
    let mut patterns = Vec::new();
    for line in input.lines() {
        patterns.push(line.context("Failed to read stdin")?);
    }
    Ok(patterns)
}

/// Output sink that only emits colour sequences when `color` is set.
struct Painter<W: Write> {
    color: bool,
    out: W,
}

impl<W: Write> Painter<W> {
    fn plain(&mut self, text: &str) -> io::Result<()> {
        queue!(self.out, Print(text))
    }

    fn styled(&mut self, text: &str, color: Option<Color>, bold: bool) -> io::Result<()> {
        if !self.color {
            return self.plain(text);
        }
        if bold {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        if let Some(color) = color {
            queue!(self.out, SetForegroundColor(color))?;
        }
        queue!(
            self.out,
            Print(text),
            ResetColor,
            SetAttribute(Attribute::Reset)
        )
    }
}

fn print_tokens<W: Write>(out: &mut Painter<W>, pattern: &str, tokens: &[Token]) -> Result<()> {
    out.styled(&format!("{pattern:?}"), None, true)?;
    out.plain("\n")?;
    let text_width = tokens
        .iter()
        .map(|t| t.text.chars().count() + 2)
        .max()
        .unwrap_or(0);
    for token in tokens {
        let color = match &token.component {
            Component::Illegal { .. } => Color::Red,
            Component::Literal { .. } => Color::DarkGrey,
            Component::Width { .. } | Component::Symbol { .. } => Color::Green,
        };
        let text = format!("{:?}", token.text);
        out.plain(&format!("{:>5}  {text:<text_width$}  ", token.position))?;
        out.styled(&token.component.to_string(), Some(color), false)?;
        out.plain("\n")?;
    }
    let illegal = tokens.iter().filter(|t| t.component.is_illegal()).count();
    if illegal > 0 {
        let summary = format!(
            "{illegal} illegal component{}\n",
            if illegal == 1 { "" } else { "s" }
        );
        out.styled(&summary, Some(Color::Red), false)?;
    }
    Ok(())
}

fn print_kinds<W: Write>(out: &mut Painter<W>) -> Result<()> {
    for kind in ComponentKind::ALL {
        let spec = kind.spec();
        let symbol = spec.symbol.map(String::from).unwrap_or_default();
        let widths = if spec.strategy.is_width_based() {
            spec.describe_widths()
        } else {
            String::new()
        };
        out.styled(&format!("{symbol:>3}"), None, true)?;
        out.plain(&format!(
            "  {:<34}  {:<16}  {widths}\n",
            spec.name,
            format!("{:?}", spec.strategy)
        ))?;
    }
    out.out.flush()?;
    Ok(())
}
