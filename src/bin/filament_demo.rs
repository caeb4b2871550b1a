use staff_filaments::config::filaments;
use staff_filaments::factory::{process_sheets, SheetInput};
use staff_filaments::io::{read_json_file, write_json_file};
use staff_filaments::report::SheetReport;
use log::warn;
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = filaments::load_config(Path::new(&config_path))?;

    let sheets: Vec<SheetInput> = read_json_file(&config.input)?;
    let outcomes = process_sheets(sheets, &config.params);

    let mut reports: Vec<SheetReport> = Vec::with_capacity(outcomes.len());
    for (index, outcome) in outcomes.into_iter().enumerate() {
        let report = outcome
            .and_then(|o| o.report(index))
            .map_err(|e| format!("sheet {index}: {e}"));
        match report {
            Ok(report) => {
                println!("{report}");
                reports.push(report);
            }
            Err(err) => warn!("skipping {err}"),
        }
    }

    write_json_file(&config.output.report_json, &reports)?;
    println!(
        "Saved {} sheet report(s) to {}",
        reports.len(),
        config.output.report_json.display()
    );
    Ok(())
}

fn usage() -> String {
    "Usage: filament_demo <config.json>".to_string()
}
