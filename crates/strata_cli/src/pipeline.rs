//! Shared pipeline helpers for CLI commands.
//!
//! Contains the input steps used by both `solve` and `check`: configuration
//! loading, design and symmetry file reading, circuit selection, and
//! diagnostic rendering.

use std::fs;
use std::path::{Path, PathBuf};

use strata_config::StrataConfig;
use strata_diagnostics::{DiagnosticRenderer, DiagnosticSink, TerminalRenderer};
use strata_floorplan::{Design, DesignSource, SymmetryPair};

use crate::{CircuitArgs, GlobalArgs};

/// Loads the configuration named by `--config`, or `strata.toml` from the
/// current directory.
///
/// A `--config` pointing at a directory is searched for `strata.toml`. An
/// absent file in the fallback location yields the defaults.
pub fn load_config(global: &GlobalArgs) -> Result<StrataConfig, Box<dyn std::error::Error>> {
    match global.config {
        Some(ref config_path) => {
            let p = PathBuf::from(config_path);
            if p.is_dir() {
                Ok(strata_config::load_config(&p)?)
            } else {
                Ok(strata_config::load_config_file(&p)?)
            }
        }
        None => Ok(strata_config::load_config(&std::env::current_dir()?)?),
    }
}

/// Reads a JSON design database.
pub fn read_design(path: &Path) -> Result<Design, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("cannot read design {}: {e}", path.display()))?;
    let design = serde_json::from_str(&content)
        .map_err(|e| format!("invalid design {}: {e}", path.display()))?;
    Ok(design)
}

/// Reads a JSON list of symmetry pairs. No path means no pairs.
pub fn read_symmetry(path: Option<&Path>) -> Result<Vec<SymmetryPair>, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let content = fs::read_to_string(path)
        .map_err(|e| format!("cannot read symmetry file {}: {e}", path.display()))?;
    let pairs = serde_json::from_str(&content)
        .map_err(|e| format!("invalid symmetry file {}: {e}", path.display()))?;
    Ok(pairs)
}

/// Picks the circuit to floorplan: by `--circuit` name, else by `--index`
/// (default 0).
pub fn select_circuit(
    design: &Design,
    args: &CircuitArgs,
) -> Result<(usize, String), Box<dyn std::error::Error>> {
    let index = match args.circuit {
        Some(ref name) => design
            .find_circuit(name)
            .ok_or_else(|| format!("design has no circuit named '{name}'"))?,
        None => args.index.unwrap_or(0),
    };
    let name = design.circuit_name(index).ok_or_else(|| {
        format!(
            "circuit index {index} out of range (design has {} circuits)",
            design.circuit_count()
        )
    })?;
    Ok((index, name.to_string()))
}

/// Renders all diagnostics from a sink to stderr using the terminal renderer.
///
/// Returns the number of diagnostics rendered.
pub fn render_diagnostics(sink: &DiagnosticSink, color: bool) -> usize {
    let diagnostics = sink.diagnostics();
    let renderer = TerminalRenderer::new(color);
    for diag in &diagnostics {
        eprintln!("{}", renderer.render(diag));
    }
    diagnostics.len()
}
