//! `strata solve`: floorplan one circuit.
//!
//! 1. Load config (`--config` or `strata.toml` in the current directory)
//! 2. Read the design and the symmetry pairs
//! 3. Select the circuit and resolve its settings
//! 4. Build, solve and extract the floorplan
//! 5. With `--apply`, write the solution into the in-memory design
//! 6. Render diagnostics
//! 7. Write the result JSON and the updated design
//!
//! Nothing is written unless steps 4 and 5 both succeed.

use std::fs;

use strata_diagnostics::{DiagnosticSink, Severity};
use strata_floorplan::diagnostics::error_diagnostic;
use strata_floorplan::{apply_fp_solution, solve_floorplan, Design, FloorplanResult};

use crate::pipeline::{load_config, read_design, read_symmetry, render_diagnostics, select_circuit};
use crate::{GlobalArgs, SolveArgs};

/// Runs the `strata solve` command.
///
/// Returns exit code 0 on success, 1 if the floorplan could not be solved
/// or applied.
pub fn run(args: &SolveArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    // Step 1: Config
    let config = load_config(global)?;

    // Step 2: Inputs
    let mut design = read_design(&args.design)?;
    let symmetry = read_symmetry(args.symmetry.as_deref())?;

    // Step 3: Circuit and settings
    let (circuit, name) = select_circuit(&design, &args.target)?;
    let settings = strata_config::resolve_circuit(&config, &name);
    if !global.quiet {
        eprintln!("   Floorplanning circuit {name} ({} symmetry pairs)", symmetry.len());
    }

    // Step 4: Solve
    let sink = DiagnosticSink::new();
    match solve_floorplan(&design, circuit, &symmetry, &settings, &sink) {
        Ok(result) => finish(args, global, &result, &mut design, circuit, &sink),
        Err(err) => {
            sink.emit(error_diagnostic(&err));
            render_diagnostics(&sink, global.color);
            Ok(1)
        }
    }
}

/// Steps 5 to 7 for a solved `result`.
fn finish(
    args: &SolveArgs,
    global: &GlobalArgs,
    result: &FloorplanResult,
    design: &mut Design,
    circuit: usize,
    sink: &DiagnosticSink,
) -> Result<i32, Box<dyn std::error::Error>> {
    // Step 5: Apply
    let applied = args.apply.is_none()
        || apply_fp_solution(result, design, circuit)
            .map_err(|err| sink.emit(error_diagnostic(&err)))
            .is_ok();

    // Step 6: Diagnostics
    render_diagnostics(sink, global.color);
    if !applied {
        return Ok(1);
    }

    // Step 7: Outputs
    let json = serde_json::to_string_pretty(result)?;
    match args.output {
        Some(ref path) => fs::write(path, json)?,
        None => println!("{json}"),
    }
    if let Some(ref path) = args.apply {
        fs::write(path, serde_json::to_string_pretty(&*design)?)?;
    }

    if !global.quiet {
        eprintln!(
            "   Result: height {}, {} warning(s)",
            result.total_height(),
            sink.count(Severity::Warning)
        );
    }
    Ok(0)
}
