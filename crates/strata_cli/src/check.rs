//! `strata check`: validate a circuit without solving it.
//!
//! Runs the input half of the floorplanning pipeline: problem construction
//! (reference checks, pin classification, symmetry validation) and the
//! vertical sweep. Nothing is written.

use strata_diagnostics::{DiagnosticSink, Severity};
use strata_floorplan::diagnostics::error_diagnostic;
use strata_floorplan::{vertical_sweep_line, FloorplanError, FloorplanProblem};

use crate::pipeline::{load_config, read_design, read_symmetry, render_diagnostics, select_circuit};
use crate::{CheckArgs, GlobalArgs, ReportFormat};

/// Runs the `strata check` command.
///
/// Returns exit code 0 if no errors, 1 if there are errors.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_config(global)?;
    let design = read_design(&args.design)?;
    let symmetry = read_symmetry(args.symmetry.as_deref())?;
    let (circuit, name) = select_circuit(&design, &args.target)?;
    let settings = strata_config::resolve_circuit(&config, &name);

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!("   Checking circuit {name}");
    }

    let sink = DiagnosticSink::new();
    match summarize(&design, circuit, &symmetry, &settings, &sink) {
        Ok((summary, edges)) => {
            if !global.quiet && args.format == ReportFormat::Text {
                eprintln!("   {summary}");
                if global.verbose {
                    for edge in &edges {
                        eprintln!("     {edge}");
                    }
                }
            }
        }
        Err(err) => sink.emit(error_diagnostic(&err)),
    }

    match args.format {
        ReportFormat::Text => {
            render_diagnostics(&sink, global.color);
            if !global.quiet {
                eprintln!(
                    "   Result: {} error(s), {} warning(s)",
                    sink.error_count(),
                    sink.count(Severity::Warning)
                );
            }
        }
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&sink.diagnostics())?;
            println!("{json}");
        }
    }

    Ok(if sink.has_errors() { 1 } else { 0 })
}

/// Builds the problem and the constraint graph. Returns a one-line summary
/// and the "below" edges labelled by module name.
fn summarize(
    design: &strata_floorplan::Design,
    circuit: usize,
    symmetry: &[strata_floorplan::SymmetryPair],
    settings: &strata_config::FloorplanSettings,
    sink: &DiagnosticSink,
) -> Result<(String, Vec<String>), FloorplanError> {
    let mut problem = FloorplanProblem::build(design, circuit, symmetry, sink)?;
    problem.set_pin_resource_len(settings.resource_per_len)?;
    let edges = vertical_sweep_line(problem.modules(), settings.edge_policy)?;
    let summary = format!(
        "{} modules, {} assignable pins ({} mirrored pairs), {} nets, {} vertical edges",
        problem.modules().len(),
        problem.num_assignable_pins(),
        problem.num_sym_pri_pins(),
        problem.nets().len(),
        edges.len()
    );
    let labels = edges
        .iter()
        .map(|e| {
            format!(
                "{} below {}",
                problem.module_name(e.below),
                problem.module_name(e.above)
            )
        })
        .collect();
    Ok((summary, labels))
}
