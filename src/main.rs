//! CLI tool to format VTL template files.

use std::fs;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        eprintln!("Usage: vtlfmt <command> [files...]");
        eprintln!();
        eprintln!("Commands:");
        eprintln!("  fmt       Format VTL template(s) and print to stdout");
        eprintln!("  check     Check if VTL template(s) are formatted");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  vtlfmt fmt template.vm");
        eprintln!("  vtlfmt check template.vm");
        return ExitCode::from(2);
    }

    let command = args[1].as_str();
    let files = &args[2..];

    if files.is_empty() {
        eprintln!("Error: no files specified");
        return ExitCode::from(2);
    }

    let mut had_error = false;

    for path in files {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{path}: {e}");
                had_error = true;
                continue;
            }
        };

        match command {
            "fmt" => match vtlfmt::try_format(&content) {
                Ok(formatted) => {
                    println!("{formatted}");
                }
                Err(e) => {
                    eprintln!("{path}: {e}");
                    had_error = true;
                }
            },
            "check" => match vtlfmt::try_format(&content) {
                Ok(formatted) => {
                    if formatted == content.trim_end() {
                        eprintln!("{path}: formatted");
                    } else {
                        eprintln!("{path}: not formatted");
                        had_error = true;
                    }
                }
                Err(e) => {
                    eprintln!("{path}: {e}");
                    had_error = true;
                }
            },
            _ => {
                eprintln!("Unknown command: {command}");
                return ExitCode::from(2);
            }
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
