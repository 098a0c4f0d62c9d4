// SPDX-License-Identifier: PMPL-1.0-or-later

//! iso639: look up ISO 639 language codes and names from the command line.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use iso639::{Language, MatchMode, Status, DATA_LAST_UPDATED};

#[derive(Parser)]
#[command(name = "iso639")]
#[command(version)]
#[command(about = "Resolve language codes and names to ISO 639-3 records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a language code or name to its full record
    Lookup {
        /// A language code (639-1/2/3) or a language name
        #[arg(value_name = "INPUT")]
        input: String,

        /// Match case- and whitespace-sensitively
        #[arg(long)]
        exact: bool,

        /// Emit the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every language in the catalog
    List {
        /// Restrict to one status
        #[arg(long, value_enum)]
        status: Option<StatusArg>,

        /// Emit the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show dataset statistics
    Stats,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum StatusArg {
    Active,
    Retired,
}

impl From<StatusArg> for Status {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Active => Status::Active,
            StatusArg::Retired => Status::Retired,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Lookup { input, exact, json } => {
            let mode = if exact {
                MatchMode::Exact
            } else {
                MatchMode::Lenient
            };
            let language = iso639::match_language(&input, mode)?;
            if json {
                println!("{}", serde_json::to_string_pretty(language)?);
            } else {
                print_language(language);
            }
        }

        Commands::List { status, json } => {
            let mut languages: Vec<&Language> = Language::all()
                .filter(|lang| status.is_none_or(|s| lang.status == Status::from(s)))
                .collect();
            languages.sort_by(|a, b| a.part3.cmp(&b.part3));

            if json {
                println!("{}", serde_json::to_string_pretty(&languages)?);
            } else {
                for lang in &languages {
                    let tag = match lang.status {
                        Status::Active => "A".green(),
                        Status::Retired => "R".red(),
                    };
                    println!("[{}] {}  {}", tag, lang.part3.bold(), lang.name);
                }
                println!("\n{} languages", languages.len());
            }
        }

        Commands::Stats => {
            let dataset = iso639::resolve::registry().dataset();
            println!("ISO 639-3 dataset ({})", *DATA_LAST_UPDATED);
            println!("  {:22} {}", "active codes", dataset.code_count());
            println!("  {:22} {}", "retired codes", dataset.retirement_count());
            println!("  {:22} {}", "name index entries", dataset.name_count());
            println!("  {:22} {}", "macrolanguage links", dataset.macrolanguage_count());
            println!("  {:22} {}", "languages", Language::all().count());
        }
    }

    Ok(())
}

fn print_language(language: &Language) {
    let status = match language.status {
        Status::Active => "Active".green(),
        Status::Retired => "Retired".red(),
    };
    println!("{}  {} ({})", language.part3.bold(), language.name, status);

    if let Some(part2b) = &language.part2b {
        println!("  {:14} {}", "639-2/B", part2b);
    }
    if let Some(part2t) = &language.part2t {
        println!("  {:14} {}", "639-2/T", part2t);
    }
    if let Some(part1) = &language.part1 {
        println!("  {:14} {}", "639-1", part1);
    }
    println!("  {:14} {:?}", "scope", language.scope);
    if let Some(kind) = language.kind {
        println!("  {:14} {:?}", "type", kind);
    }
    if let Some(macrolanguage) = &language.macrolanguage {
        println!("  {:14} {}", "macrolanguage", macrolanguage);
    }
    if let Some(other_names) = &language.other_names {
        for name in other_names {
            if name.print == name.inverted {
                println!("  {:14} {}", "other name", name.print);
            } else {
                println!("  {:14} {} / {}", "other name", name.print, name.inverted);
            }
        }
    }
    if let Some(comment) = &language.comment {
        println!("  {:14} {}", "comment", comment);
    }
    if let Some(reason) = language.retire_reason {
        println!("  {:14} {:?}", "retired", reason);
    }
    if let Some(change_to) = &language.retire_change_to {
        println!("  {:14} {}", "changed to", change_to);
    }
    if let Some(remedy) = &language.retire_remedy {
        println!("  {:14} {}", "remedy", remedy);
    }
    if let Some(date) = language.retire_date {
        println!("  {:14} {}", "retire date", date);
    }
}
