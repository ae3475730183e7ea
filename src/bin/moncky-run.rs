use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use moncky_rs::{Cpu, Engine, EngineConfig, Program};

const DEFAULT_MAX_STEPS: u64 = 10_000_000;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Simulate a Moncky-2 assembly program and print the final CPU state"
)]
struct Opts {
    /// Abort after this many instructions (default 10,000,000)
    #[arg(long)]
    max_steps: Option<u64>,
    /// Engine configuration as JSON, e.g. {"max_steps": 1000}
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print registers, flags and memory as JSON
    #[arg(long)]
    json: bool,
    #[arg(value_name = "ASMFILE", default_value = "moncky2in/code.txt")]
    input: PathBuf,
}

#[derive(Serialize)]
struct Snapshot<'a> {
    cpu: &'a Cpu,
    steps: u64,
    memory: Vec<(u16, u16)>,
}

fn load_config(opts: &Opts) -> Result<EngineConfig> {
    let mut cfg = match &opts.config {
        Some(path) => {
            let txt = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&txt)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    if opts.max_steps.is_some() {
        cfg.max_steps = opts.max_steps;
    }
    cfg.max_steps.get_or_insert(DEFAULT_MAX_STEPS);
    Ok(cfg)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    let cfg = load_config(&opts)?;
    let source = std::fs::read_to_string(&opts.input)
        .with_context(|| format!("no code file at {}", opts.input.display()))?;

    let program = Program::new(&source);
    let mut engine = Engine::new(cfg);
    let report = engine.run(&program)?;

    let cpu = engine.cpu();
    let memory: Vec<(u16, u16)> = engine.bus().nonzero().collect();
    if opts.json {
        let snap = Snapshot {
            cpu,
            steps: report.steps,
            memory,
        };
        println!("{}", serde_json::to_string_pretty(&snap)?);
        return Ok(());
    }

    for (i, v) in cpu.regs.iter().enumerate() {
        println!("register {i}: {}", *v as i16);
    }
    println!("flags: {:?}", cpu.flags);
    for (addr, v) in memory {
        println!("memory at #{addr}: {}", v as i16);
    }
    Ok(())
}
