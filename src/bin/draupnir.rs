//! Command-line front end.
//!
//! With no arguments, streams squeezed bytes from a default 64-bit
//! sponge to stdout. Each argument is a command script executed in a
//! shared evaluator environment; `-` reads commands from stdin.

use std::env;
use std::fs::File;
use std::io::{self, BufReader, Write};

use draupnir::env::Environment;
use draupnir::{crc64, Draupnir};

fn show_logo() {
    eprint!(
        "\n\
         ---------------------------\n\
         \x20  /\\                      \n\
         \x20  \\/  Draupnir v1.0.0     \n\
         \x20  /\\                      \n\
         ---------------------------\n\
         \n"
    );
}

fn stream_bytes() -> io::Result<()> {
    let mut sponge = match crc64().build() {
        Ok(sponge) => sponge,
        Err(error) => {
            eprintln!("error: {error}");
            std::process::exit(1);
        }
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    loop {
        let byte = [sponge.squeeze()];
        if out.write_all(&byte).is_err() {
            // Downstream closed the pipe; stop quietly.
            return Ok(());
        }
    }
}

fn main() -> io::Result<()> {
    show_logo();

    let args: Vec<String> = env::args().collect();
    eprintln!("Arguments:");
    for (index, argument) in args.iter().enumerate() {
        eprintln!("  {index}: {argument}");
    }
    eprintln!();

    if args.len() < 2 {
        return stream_bytes();
    }

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();
    let mut environment = Environment::new(&mut out, &mut err);
    environment.push(Draupnir::Crc64(match crc64().build() {
        Ok(sponge) => sponge,
        Err(error) => {
            eprintln!("error: {error}");
            std::process::exit(1);
        }
    }));

    for script in &args[1..] {
        let result = if script == "-" {
            let stdin = io::stdin();
            environment.run_script(stdin.lock())
        } else {
            match File::open(script) {
                Ok(file) => environment.run_script(BufReader::new(file)),
                Err(error) => {
                    eprintln!("error opening {script}: {error}");
                    std::process::exit(1);
                }
            }
        };
        if let Err(error) = result {
            eprintln!("error in {script}: {error}");
            std::process::exit(1);
        }
    }

    Ok(())
}
