//! Rollbench operator console.
//!
//! Interactive front end over `rollbench-core`: collects the raw bench
//! inputs, shows the derived record, and drives save/export/plot.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use clap::Parser;
use rollbench_core::prelude::*;
use rollbench_core::{format, measure};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rollbench")]
#[command(about = "Rolling-resistance test bench companion")]
#[command(version)]
struct Cli {
    /// Directory the spreadsheet, mirror and plot files are written to
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// JSON file overriding the built-in rig constants
    #[arg(long)]
    rig: Option<PathBuf>,

    /// Do not open the spreadsheet after an export
    #[arg(long)]
    no_open: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let rig = match &cli.rig {
        Some(path) => RigConfig::from_file(path)
            .with_context(|| format!("loading rig config {}", path.display()))?,
        None => RigConfig::default(),
    };

    std::fs::create_dir_all(&cli.output)
        .with_context(|| format!("creating output directory {}", cli.output.display()))?;

    let mut session = Session::new(&cli.output, rig);
    print_banner(&session);
    repl(&mut session, cli.no_open)
}

fn print_banner(session: &Session) {
    println!("Rollbench — rolling resistance calculator");
    println!();
    println!("  1. Enter idle and load currents (space separated, 6 readings per 30 s test).");
    println!("  2. Enter the weight placed on the lever arm.");
    println!("  3. Enter tire name / type and tire pressure.");
    println!("     A new tire name starts a new line in the plot.");
    println!("  4. Comma or dot both work as decimal separator.");
    println!();
    println!("  calculate (c)  compute all derived values");
    println!("  save      (s)  store the result in the session list");
    println!("  export    (e)  write spreadsheet + text mirror, open the spreadsheet");
    println!("  plot      (p)  render C_rr vs pressure per tire");
    println!("  quit      (q)");
    println!();
    println!("Spreadsheet: {}", session.spreadsheet_path().display());
    println!("Mirror:      {}", session.mirror_path().display());
    println!();
}

fn repl(session: &mut Session, no_open: bool) -> Result<()> {
    loop {
        let Some(line) = prompt("rollbench>")? else {
            break;
        };
        match line.trim() {
            "c" | "calculate" => do_calculate(session)?,
            "s" | "save" => do_save(session),
            "e" | "export" => do_export(session, no_open),
            "p" | "plot" => do_plot(session),
            "h" | "help" | "?" => print_help(),
            "q" | "quit" | "exit" => break,
            "" => {}
            other => println!("unknown command '{other}', try 'help'"),
        }
    }
    Ok(())
}

fn print_help() {
    println!("commands: calculate (c), save (s), export (e), plot (p), quit (q)");
}

fn prompt(label: &str) -> Result<Option<String>> {
    print!("{label} ");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn do_calculate(session: &mut Session) -> Result<()> {
    let Some(tire_name) = prompt("Tire name / type:")? else {
        return Ok(());
    };
    let Some(weight) = prompt("Weight on lever in kg:")? else {
        return Ok(());
    };
    let Some(idle_currents) = prompt("Idle currents in A:")? else {
        return Ok(());
    };
    let Some(load_currents) = prompt("Load currents in A:")? else {
        return Ok(());
    };
    let Some(tire_pressure) = prompt("Tire pressure in bar:")? else {
        return Ok(());
    };

    let hanging_mass = match measure::parse_decimal(&weight) {
        Ok(value) => value,
        Err(e) => {
            println!("Calculate failed: weight: {e}");
            return Ok(());
        }
    };

    let input = MeasurementInput {
        tire_name,
        tire_pressure,
        idle_currents,
        load_currents,
        hanging_mass,
    };
    match session.calculate(&input) {
        Ok(record) => {
            println!();
            print_record(record);
            println!();
        }
        Err(e) => println!("Calculate failed: {e}"),
    }
    Ok(())
}

fn print_record(record: &DerivedRecord) {
    for field in Field::ALL {
        let text = format::render(field, record.value(field));
        let shown = if text.is_empty() { "-" } else { text.as_str() };
        println!("  {:<30} {}", field.title(), shown);
    }
}

fn do_save(session: &mut Session) {
    match session.save() {
        Ok(receipt) => {
            println!("Data set number {} saved in list", receipt.count);
            if let Some(e) = receipt.sheet_error {
                println!("Warning: could not append to the spreadsheet: {e}");
                println!("The data set is still in the session list.");
            }
        }
        Err(e) => println!("Save failed: {e}"),
    }
}

fn do_export(session: &mut Session, no_open: bool) {
    match session.export() {
        Ok(rows) => {
            println!("Exported {rows} data rows");
            println!("  {}", session.spreadsheet_path().display());
            println!("  {}", session.mirror_path().display());
            if !no_open {
                if let Err(e) = open_with_default_app(session.spreadsheet_path()) {
                    println!("Files written, but the spreadsheet could not be opened: {e}");
                }
            }
        }
        Err(e) => println!("Export failed: {e}"),
    }
}

fn do_plot(session: &mut Session) {
    match session.render_plot() {
        Ok(path) => println!("Plot written to {}", path.display()),
        Err(e) => println!("Plot failed: {e}"),
    }
}

fn open_with_default_app(path: &Path) -> io::Result<()> {
    let mut command = if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]).arg(path);
        c
    } else if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg(path);
        c
    } else {
        let mut c = Command::new("xdg-open");
        c.arg(path);
        c
    };

    let status = command.status()?;
    if !status.success() {
        return Err(io::Error::other(format!("viewer exited with {status}")));
    }
    Ok(())
}
