//! Command-line front end: argument parsing, terminal raw-mode setup,
//! `Ctrl-C` handling, image loading, and running the machine to completion.

use std::fs::File;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use termios::{tcsetattr, Termios, ECHO, ICANON, TCSANOW};

use lc3vm::loader;
use lc3vm::selftest;
use lc3vm::vm::Vm;

/// Run a 16-bit LC-3 virtual machine.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Object image files to load and run, in order, sharing one address
    /// space (later images may overwrite earlier ones where they overlap)
    images: Vec<String>,

    /// Run the built-in self-check instead of loading an image
    #[arg(long)]
    test: bool,
}

/// Put stdin into raw, non-canonical, non-echoing mode so the keyboard trap
/// routines see individual keystrokes as they're typed.
fn disable_input_buffering() -> Option<Termios> {
    let original = Termios::from_fd(0).ok()?;
    let mut raw = original;
    raw.c_lflag &= !(ICANON | ECHO);
    tcsetattr(0, TCSANOW, &raw).ok()?;
    Some(original)
}

fn restore_input_buffering(original: &Termios) {
    let _ = tcsetattr(0, TCSANOW, original);
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.test {
        return if selftest::run() {
            ExitCode::from(0)
        } else {
            ExitCode::from(1)
        };
    }

    if args.images.is_empty() {
        println!("usage: lc3 --test | [image-file1] ...");
        return ExitCode::from(2);
    }

    let mut vm = Vm::new();
    for path in &args.images {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("failed to load image: {path} ({e})");
                return ExitCode::from(1);
            }
        };
        if let Err(e) = loader::load_image(&mut vm.memory, file) {
            eprintln!("failed to load image: {path} ({e})");
            return ExitCode::from(1);
        }
    }

    let original_termios = disable_input_buffering();

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = Arc::clone(&interrupted);
        // If this fails there is nothing useful to do about it: the process
        // just won't be able to clean up the terminal on Ctrl-C.
        let _ = ctrlc::set_handler(move || {
            interrupted.store(true, Ordering::SeqCst);
        });
    }

    let mut exit_code = ExitCode::from(0);
    loop {
        if interrupted.load(Ordering::SeqCst) {
            if let Some(original) = &original_termios {
                restore_input_buffering(original);
            }
            std::process::exit(254);
        }
        match vm.step() {
            Ok(lc3vm::vm::StepOutcome::Continue) => continue,
            Ok(lc3vm::vm::StepOutcome::Halted) => break,
            Ok(lc3vm::vm::StepOutcome::PcOverflowed) => {
                println!("program counter ran off the end of the address space, halting");
                break;
            }
            Err(e) => {
                eprintln!("execution error: {e}");
                exit_code = ExitCode::from(1);
                break;
            }
        }
    }

    if let Some(original) = &original_termios {
        restore_input_buffering(original);
    }

    exit_code
}
