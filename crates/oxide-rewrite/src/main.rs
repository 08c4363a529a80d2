//! oxide-rewrite CLI
//!
//! Command-line tool for inspecting how statement templates are rewritten.

use std::io::Read;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

use oxide_rewrite::{
    Attributes, Binding, ParserStyle, Rewriter, RewriterConfig, Scanner, SqlValue, TokenKind,
};

/// Rewrite named-parameter SQL templates into prepared-statement SQL.
#[derive(Parser)]
#[command(name = "oxide-rewrite")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Named-parameter prefix style (colon or hash).
    #[arg(short, long, env = "OXIDE_REWRITE_STYLE", default_value = "colon")]
    style: ParserStyle,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Substitute attributes and replace parameters with `?`.
    Rewrite {
        /// SQL template (read from stdin if omitted or `-`).
        sql: Option<String>,

        /// Attribute definition `key=value` (repeatable).
        #[arg(short = 'D', long = "define", value_parser = parse_pair)]
        defines: Vec<(String, String)>,

        /// Named argument `name=value` (repeatable).
        #[arg(short, long = "bind", value_parser = parse_pair)]
        binds: Vec<(String, String)>,

        /// Positional argument (repeatable).
        #[arg(short, long = "arg")]
        args: Vec<String>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the tokens the scanner produces.
    Tokens {
        /// SQL template (read from stdin if omitted or `-`).
        sql: Option<String>,
    },
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(key, value)| (String::from(key), String::from(value)))
        .ok_or_else(|| format!("expected key=value, got '{s}'"))
}

fn parse_value(s: &str) -> SqlValue {
    if s.eq_ignore_ascii_case("null") {
        SqlValue::Null
    } else if let Ok(b) = s.parse::<bool>() {
        SqlValue::Bool(b)
    } else if let Ok(n) = s.parse::<i64>() {
        SqlValue::Int(n)
    } else if let Ok(f) = s.parse::<f64>() {
        SqlValue::Float(f)
    } else {
        SqlValue::Text(String::from(s))
    }
}

fn read_sql(sql: Option<String>) -> anyhow::Result<String> {
    match sql {
        Some(sql) if sql != "-" => Ok(sql),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read SQL from stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Rewrite {
            sql,
            defines,
            binds,
            args,
            json,
        } => {
            let sql = read_sql(sql)?;
            let rewriter = Rewriter::from_config(&RewriterConfig {
                style: cli.style,
                ..RewriterConfig::default()
            });
            let attributes: Attributes = defines.into_iter().collect();
            debug!(style = %cli.style, attributes = attributes.len(), "Rewriting statement");

            let parsed = rewriter
                .rewrite(&sql, &attributes)
                .context("Unable to rewrite statement")?;

            let values = if binds.is_empty() && args.is_empty() {
                None
            } else {
                let binding = args.iter().fold(Binding::new(), |binding, arg| {
                    binding.add(parse_value(arg))
                });
                let binding = binds.iter().fold(binding, |binding, (name, value)| {
                    binding.add_named(name.as_str(), parse_value(value))
                });
                Some(parsed.bind(&binding).context("Unable to bind arguments")?)
            };

            if json {
                let output = json!({
                    "sql": parsed.sql(),
                    "parameters": parsed.parameters(),
                    "values": values,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{}", parsed.sql());
                for (i, parameter) in parsed.parameters().iter().enumerate() {
                    match values.as_ref().and_then(|values| values.get(i)) {
                        Some(value) => {
                            println!("  {}: {parameter} = {}", i + 1, value.to_sql_inline());
                        }
                        None => println!("  {}: {parameter}", i + 1),
                    }
                }
            }
        }

        Commands::Tokens { sql } => {
            let sql = read_sql(sql)?;
            let tokens = Scanner::new(&sql, cli.style)
                .tokenize()
                .context("Unable to scan statement")?;
            for token in tokens {
                let label = match token.kind {
                    TokenKind::Fragment(text) => format!("fragment {text:?}"),
                    TokenKind::NamedParameter(name) => format!("named {name}"),
                    TokenKind::PositionalParameter => String::from("positional"),
                    TokenKind::AttributeRef(key) => format!("attribute {key}"),
                    TokenKind::Eof => String::from("eof"),
                };
                println!("{:>5}..{:<5} {label}", token.span.start, token.span.end);
            }
        }
    }

    Ok(())
}
