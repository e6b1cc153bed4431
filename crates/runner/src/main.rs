use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use hostkernel::HostKernel;
use runtime::allocator::Arena;
use runtime::entrypoint::boot;
use runtime::Runtime;

mod demo;
mod report;
mod script;
mod wad;

use demo::Demo;
use report::Report;

const ARENA_BYTES: usize = 32 * 1024 * 1024;

/// Boots the freestanding runtime against an in-process kernel
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// WAD file to serve as the IWAD (a small one is synthesized if omitted)
    #[arg(short, long)]
    asset: Option<PathBuf>,

    /// Number of frames to run before the demo returns
    #[arg(short = 'n', long, default_value_t = 35)]
    frames: u64,

    /// JSON key script: [{"frame": 3, "scancode": 1, "pressed": true}]
    #[arg(short, long)]
    keys: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Trace every syscall
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let args = Args::parse();
    let text = args.format != "json";
    if args.format != "text" && args.format != "json" {
        anyhow::bail!("Unknown format: {}", args.format);
    }

    let trace = Rc::new(RefCell::new(String::new()));
    let kernel = if args.verbose {
        let writer: Rc<RefCell<dyn std::fmt::Write>> = trace.clone();
        HostKernel::with_writer(Some(writer))
    } else {
        HostKernel::new()
    };

    let config = runtime::Config::DEFAULT;
    let iwad_name = config.argv[2];
    let asset = match &args.asset {
        Some(path) => fs::read(path).with_context(|| format!("Failed to read asset {}", path.display()))?,
        None => wad::synthesize()?,
    };
    if text {
        println!("{}", "Runtime Runner v0.1.0".bold().blue());
        println!("{}", "=====================================".blue());
        println!("📦 {} ({} bytes)", iwad_name.cyan(), asset.len());
    }
    kernel.insert_file(iwad_name, asset);

    if let Some(path) = &args.keys {
        let steps = script::load(path)?;
        if text {
            println!("⌨️  {} scripted key changes", steps.len());
        }
        for step in steps {
            kernel.schedule_key(step.frame, step.scancode, step.pressed);
        }
    }

    let memory: &'static mut [u8] = Box::leak(vec![0u8; ARENA_BYTES].into_boxed_slice());
    let mut rt = Runtime::with_config(kernel.clone(), Arena::new(memory), config);
    let demo = Demo {
        max_frames: args.frames,
        ..Demo::default()
    };
    let status = boot(&mut rt, |rt, argv| demo.main(rt, argv));

    let report = Report::collect(&kernel, status);
    if text {
        println!();
        if args.verbose {
            println!("{}", "Trace".bold());
            println!("{}", "-------------------------------------".blue());
            print!("{}", trace.borrow());
            println!();
        }
        report.print_text();
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(report.exit_code)
}
