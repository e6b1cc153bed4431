use colored::*;
use hostkernel::{HostKernel, SyscallCounters};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// What one run produced.
#[derive(Debug, Serialize)]
pub struct Report {
    pub exit_code: i32,
    pub frames: u64,
    pub simulated_ms: u64,
    /// SHA-256 of the last presented frame, hex encoded.
    pub frame_sha256: Option<String>,
    pub console: String,
    pub counters: SyscallCounters,
}

impl Report {
    pub fn collect(kernel: &HostKernel, status: i32) -> Self {
        Self {
            exit_code: kernel.exit_code().unwrap_or(status),
            frames: kernel.frames(),
            simulated_ms: kernel.now_ms(),
            frame_sha256: kernel.last_frame().map(|frame| hex::encode(Sha256::digest(&frame))),
            console: kernel.console(),
            counters: kernel.counters(),
        }
    }

    pub fn print_text(&self) {
        println!("{}", "Console".bold());
        println!("{}", "-------------------------------------".blue());
        for line in self.console.lines() {
            println!("  {}", line);
        }
        println!();

        println!("{}", "Summary".bold().green());
        println!("{}", "=====================================".blue());
        let status = if self.exit_code == 0 {
            format!("✅ exit {}", self.exit_code).green()
        } else {
            format!("❌ exit {}", self.exit_code).red()
        };
        println!("  {}", status);
        println!("  Frames presented: {}", self.frames.to_string().yellow());
        println!("  Simulated time:   {} ms", self.simulated_ms);
        match &self.frame_sha256 {
            Some(digest) => println!("  Last frame:       {}", digest),
            None => println!("  Last frame:       {}", "none".dimmed()),
        }

        let c = &self.counters;
        println!();
        println!("  {} ({} total)", "Syscalls".bold(), c.total());
        println!("    open {:>6}   close {:>6}", c.open, c.close);
        println!("    read {:>6}   write {:>6}", c.read, c.write);
        println!("    yield {:>5}   clock {:>6}", c.sched_yield, c.clock_gettime);
        println!("    exit {:>6}   unknown {:>4}", c.exit, c.unknown);
        println!("    bytes read {}, bytes written {}", c.bytes_read, c.bytes_written);
    }
}
