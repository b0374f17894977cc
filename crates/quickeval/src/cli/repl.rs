//! REPL implementation

use super::output;
use crate::engine::QueryEngine;
use anyhow::{Result, bail};
use colored::Colorize;
use quickeval_types::AngleUnit;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::path::PathBuf;

const HISTORY_FILE: &str = ".quickeval_history";

/// What the loop should do after a `:command`
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run the interactive REPL
pub fn run(mut engine: QueryEngine) -> Result<()> {
    println!("{}", "quickeval interactive REPL".cyan().bold());
    println!("Type {} for help, {} to quit", ":help".green(), ":quit".green());
    println!();

    let mut rl = DefaultEditor::new()?;
    let history_file = history_path();
    if let Some(path) = &history_file {
        let _ = rl.load_history(path);
    }

    loop {
        match rl.readline("quickeval> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                if line.starts_with(':') {
                    match handle_command(line, &mut engine) {
                        Ok(Flow::Quit) => break,
                        Ok(Flow::Continue) => {}
                        Err(e) => eprintln!("{}", output::format_error(&e)),
                    }
                    continue;
                }

                for result in engine.query(line) {
                    println!("{}", output::format_result(&result));
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {err:?}");
                break;
            }
        }
    }

    if let Some(path) = &history_file {
        let _ = rl.save_history(path);
    }

    println!("Goodbye!");
    Ok(())
}

/// Handle REPL commands (starting with :)
pub fn handle_command(command: &str, engine: &mut QueryEngine) -> Result<Flow> {
    let (name, argument) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        ":help" | ":h" => print_help(),
        ":quit" | ":q" | ":exit" => return Ok(Flow::Quit),
        ":stats" => {
            let stats = engine.cache_stats();
            println!(
                "Cache: {}/{} entries ({:.1}%)",
                stats.count,
                stats.capacity,
                stats.usage_percentage()
            );
            let config = engine.config().engine;
            println!("Precision: {}, angle unit: {}", config.precision, config.angle_unit);
        }
        ":clear" | ":c" => {
            engine.clear_cache();
            println!("{}", output::format_success("Cache cleared"));
        }
        ":classify" => {
            if argument.is_empty() {
                bail!("Usage: :classify <query>");
            }
            let priority = engine.module_priority(argument);
            println!("{}", output::format_classification(engine.classify(argument), &priority));
        }
        ":parse" => {
            if argument.is_empty() {
                bail!("Usage: :parse <query>");
            }
            println!("{}", output::format_parsed(&engine.parse(argument)));
        }
        ":precision" => {
            let Ok(precision) = argument.parse::<u32>() else {
                bail!("Usage: :precision <0-28>");
            };
            let config = engine.config().engine.with_precision(precision);
            engine.reconfigure(config)?;
            println!("{}", output::format_success(&format!("Precision set to {precision}")));
        }
        ":angle" => {
            let unit: AngleUnit = argument.parse()?;
            let config = engine.config().engine.with_angle_unit(unit);
            engine.reconfigure(config)?;
            println!("{}", output::format_success(&format!("Angle unit set to {unit}")));
        }
        other => bail!("Unknown command: {other}. Type :help for help"),
    }
    Ok(Flow::Continue)
}

/// Print help message
fn print_help() {
    println!("{}", "REPL Commands:".bold());
    println!();
    println!("  {}  Show this help message", ":help, :h".green());
    println!("  {}  Quit the REPL", ":quit, :q, :exit".green());
    println!("  {}  Show cache and configuration", ":stats".green());
    println!("  {}  Clear the result cache", ":clear, :c".green());
    println!("  {}  Show classification and module priority", ":classify <query>".green());
    println!("  {}  Show domain, tokens and validity", ":parse <query>".green());
    println!("  {}  Set decimal places (0-28)", ":precision <n>".green());
    println!("  {}  Set angle unit (radians, degrees, gradians)", ":angle <unit>".green());
    println!();
    println!("{}", "Examples:".bold());
    println!();
    for example in [
        "2 + 3 * 4",
        "sqrt(16) + 2pi",
        "0xFF & 0x0F",
        "10 km to miles",
        "100 celsius to fahrenheit",
        "today + 7 days",
        "days between 2024-01-01 and 2024-01-31",
    ] {
        println!("  {}", example.cyan());
    }
}

fn history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(HISTORY_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueryEngineConfig;
    use pretty_assertions::assert_eq;

    fn engine() -> QueryEngine {
        QueryEngine::new(QueryEngineConfig::default()).unwrap()
    }

    #[test]
    fn test_quit() {
        let mut engine = engine();
        assert_eq!(handle_command(":quit", &mut engine).unwrap(), Flow::Quit);
        assert_eq!(handle_command(":q", &mut engine).unwrap(), Flow::Quit);
    }

    #[test]
    fn test_precision_reconfigures_and_clears_cache() {
        let mut engine = engine();
        engine.query("2 + 2");
        assert_eq!(engine.cache().len(), 1);

        assert_eq!(handle_command(":precision 2", &mut engine).unwrap(), Flow::Continue);
        assert_eq!(engine.config().engine.precision, 2);
        assert!(engine.cache().is_empty());
        assert_eq!(engine.query("2 + 2")[0].result, "4.00");
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let mut engine = engine();
        assert!(handle_command(":precision 99", &mut engine).is_err());
        assert!(handle_command(":precision", &mut engine).is_err());
        assert!(handle_command(":angle turns", &mut engine).is_err());
        assert!(handle_command(":classify", &mut engine).is_err());
        assert!(handle_command(":nope", &mut engine).is_err());
        assert_eq!(engine.config().engine.precision, 10);
    }

    #[test]
    fn test_history_lives_in_home_directory() {
        assert_eq!(history_path(), dirs::home_dir().map(|home| home.join(HISTORY_FILE)));
    }

    #[test]
    fn test_angle() {
        let mut engine = engine();
        handle_command(":angle degrees", &mut engine).unwrap();
        assert_eq!(engine.config().engine.angle_unit, AngleUnit::Degrees);
    }
}
