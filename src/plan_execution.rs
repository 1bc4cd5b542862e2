use crate::data_loader;
use crate::diagram::{self, DiagramData};
use crate::errors::ConnectogramError;
use crate::matrix;
use crate::node::InputNode;
use crate::plan::{ExportProfileItem, ImportFileType, ImportProfile, Plan};
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use tracing::{debug, error, info, warn};

use anyhow::{anyhow, Result};

fn plan_dir(plan_file_path: &Path) -> Result<&Path> {
    plan_file_path
        .parent()
        .ok_or_else(|| anyhow!("Plan file has no parent directory"))
}

/// Converts a matrix import profile into node records
fn load_matrix_profile(profile: &ImportProfile, parent_dir: &Path) -> Result<Vec<InputNode>> {
    let params = profile.matrix.as_ref().ok_or_else(|| {
        ConnectogramError::Plan(format!(
            "Matrix import {} is missing its matrix parameters",
            profile.filename
        ))
    })?;

    let matrix = data_loader::load_matrix(&parent_dir.join(&profile.filename))?;
    let parcels = data_loader::load_parcels(&parent_dir.join(&params.parcels))?;
    let layout = data_loader::layout_from_parcels(&parcels);

    info!(
        "Converting {}x{} matrix at threshold {}",
        matrix.size(),
        matrix.size(),
        params.threshold
    );
    Ok(matrix::matrix_to_nodes(&matrix, &layout, params.threshold)?)
}

/// Loads node records from every import profile, in profile order
pub fn load_plan_nodes(plan: &Plan, plan_file_path: &Path) -> Result<Vec<InputNode>> {
    let parent_dir = plan_dir(plan_file_path)?;
    let mut nodes = Vec::new();

    for profile in &plan.import.profiles {
        let import_file_path = parent_dir.join(&profile.filename);
        info!(
            "Importing file: {} as {:?}",
            import_file_path.display(),
            profile.filetype
        );

        let loaded = match profile.filetype {
            ImportFileType::Nodes => data_loader::load_nodes(&import_file_path)?,
            ImportFileType::Matrix => load_matrix_profile(profile, parent_dir)?,
        };
        nodes.extend(loaded);
    }

    info!("Loaded {} nodes", nodes.len());
    Ok(nodes)
}

/// Exports the diagram to the specified file using the appropriate renderer
fn export_diagram(diagram: &DiagramData, profile: &ExportProfileItem, parent_dir: &Path) {
    let output_path: PathBuf = parent_dir.join(&profile.filename);
    info!(
        "Starting export to file: {} using exporter {:?}",
        output_path.display(),
        profile.exporter
    );

    match crate::export::render(diagram, profile.exporter) {
        Ok(output) => {
            if let Err(e) = crate::common::write_string_to_file(&output_path, &output) {
                error!("Failed to write to file {}: {}", output_path.display(), e);
            }
        }
        Err(e) => {
            error!("Failed to export file {}: {}", profile.filename, e);
        }
    }
}

/// Executes a single plan: import, build, export
pub fn run_plan(plan: &Plan, plan_file_path: &Path) -> Result<()> {
    let nodes = load_plan_nodes(plan, plan_file_path)?;

    let diagram = match diagram::build_diagram(&plan.name(), &nodes, &plan.options) {
        Ok(diagram) => diagram,
        Err(ConnectogramError::Validation(diagnostics)) => {
            warn!("Identified {} validation error(s)", diagnostics.len());
            diagnostics.iter().for_each(|d| warn!("{}", d));
            warn!("Not rendering exports");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let parent_dir = plan_dir(plan_file_path)?;
    for profile in &plan.export.profiles {
        export_diagram(&diagram, profile, parent_dir);
    }

    Ok(())
}

/// Main function to execute a plan, with optional file watching
pub fn execute_plan(plan: String, watch: bool) -> Result<()> {
    info!("Executing plan {}", plan);

    let plan_file_path = Path::new(&plan);
    let path_content = std::fs::read_to_string(plan_file_path)?;
    let plan: Plan = serde_yaml::from_str(&path_content)?;

    debug!("Executing plan: {:?}", plan);
    run_plan(&plan, plan_file_path)?;

    if watch {
        watch_for_changes(&plan, plan_file_path)?;
    }

    Ok(())
}

/// Files a plan reads, relative to its directory
fn watched_files(plan: &Plan) -> Vec<&str> {
    let mut files = Vec::new();
    for profile in &plan.import.profiles {
        files.push(profile.filename.as_str());
        if let Some(params) = &profile.matrix {
            files.push(params.parcels.as_str());
        }
    }
    files
}

/// Sets up file watching for input files to re-run the plan on changes
fn watch_for_changes(plan: &Plan, plan_file_path: &Path) -> Result<()> {
    info!("Watching for changes");

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(tx, Config::default())?;
    let parent_dir = plan_dir(plan_file_path)?;
    for file in watched_files(plan) {
        watcher.watch(&parent_dir.join(file), RecursiveMode::NonRecursive)?;
    }

    loop {
        match rx.recv() {
            Ok(Ok(event)) => {
                if let EventKind::Modify(_) = event.kind {
                    debug!("File modified {:?}", event.paths);
                    info!("Change detected, re-executing plan");
                    if let Err(e) = run_plan(plan, plan_file_path) {
                        error!("Failed to re-execute plan: {}", e);
                    }
                }
            }
            Ok(Err(e)) => error!("Watch error: {:?}", e),
            Err(e) => return Err(anyhow!("Watch channel closed: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{ImportConfig, MatrixImportParams};

    #[test]
    fn test_watched_files_include_parcels() {
        let plan = Plan {
            import: ImportConfig {
                profiles: vec![
                    ImportProfile {
                        filename: "nodes.json".to_string(),
                        filetype: ImportFileType::Nodes,
                        matrix: None,
                    },
                    ImportProfile {
                        filename: "matrix.tsv".to_string(),
                        filetype: ImportFileType::Matrix,
                        matrix: Some(MatrixImportParams {
                            parcels: "parcels.csv".to_string(),
                            threshold: 0.9,
                        }),
                    },
                ],
            },
            ..Default::default()
        };
        assert_eq!(
            watched_files(&plan),
            vec!["nodes.json", "matrix.tsv", "parcels.csv"]
        );
    }

    #[test]
    fn test_matrix_profile_requires_params() {
        let profile = ImportProfile {
            filename: "matrix.tsv".to_string(),
            filetype: ImportFileType::Matrix,
            matrix: None,
        };
        let err = load_matrix_profile(&profile, Path::new(".")).unwrap_err();
        assert!(err.to_string().contains("missing its matrix parameters"));
    }
}
