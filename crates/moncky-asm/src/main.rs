use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use moncky_asm::{load_record, load_source, write_record};
use moncky_rs::decoder::Decoder;
use moncky_rs::disasm::{fmt_instruction, listing};
use moncky_rs::isa::moncky2::Moncky2Decoder;
use moncky_rs::lint::lint;
use moncky_rs::engine::assemble_program;
use moncky_rs::Program;

#[derive(Parser, Debug)]
#[command(author, version, about = "Moncky-2 assembler CLI", long_about=None)]
struct Cli {
    /// Assembly source
    #[arg(short, long, default_value = "moncky2in/code.txt")]
    input: PathBuf,
    /// Subcommand
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble the program in source order into a `v2.0 raw` hex record
    Build {
        /// Output hex record
        #[arg(short, long, default_value = "moncky2out/compiledCode.hex")]
        output: PathBuf,
    },
    /// Report syntax, value and label problems without running anything
    Lint {
        /// Output format: text or json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Decode a hex record back into instructions
    Disasm {
        /// Hex record to decode (the --input source is not read)
        #[arg(value_name = "HEXFILE")]
        record: PathBuf,
        /// Output format: text or json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat { Text, Json }

#[derive(Debug, Clone, serde::Serialize)]
struct WordOut { addr: usize, word: u16, text: Option<String> }

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Build { output } => {
            let program = Program::new(&load_source(&cli.input)?);
            let words = assemble_program(&program)?;
            write_record(&output, &words)?;
            info!(words = words.len(), output = %output.display(), "wrote hex record");
            println!("Successfully wrote {} words to {}", words.len(), output.display());
        }
        Command::Lint { format } => {
            let program = Program::new(&load_source(&cli.input)?);
            let diags = lint(&program);
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&diags)?),
                OutputFormat::Text => {
                    for d in &diags {
                        println!("{d}");
                    }
                    let errors = diags.iter().filter(|d| d.kind.is_error()).count();
                    println!("{} error(s), {} warning(s)", errors, diags.len() - errors);
                }
            }
        }
        Command::Disasm { record, format } => {
            let words = load_record(&record)?;
            let dec = Moncky2Decoder::new();
            match format {
                OutputFormat::Json => {
                    let out: Vec<WordOut> = words
                        .iter()
                        .enumerate()
                        .map(|(addr, w)| WordOut {
                            addr,
                            word: w.value(),
                            text: dec.decode(w.value()).map(|i| fmt_instruction(&i)),
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
                OutputFormat::Text => {
                    for row in listing(&dec, &words) {
                        println!("{row}");
                    }
                }
            }
        }
    }

    Ok(())
}
