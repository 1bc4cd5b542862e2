use include_dir::{include_dir, Dir};
use std::fs;
use std::path::Path;
use tracing::{error, info};

static SAMPLE_DIR: Dir = include_dir!("sample");

pub fn generate_template(exporter: String) {
    info!("Generating exporter template: {}", exporter);
    match exporter.as_str() {
        "dothierarchy" | "dot" => {
            println!("{}", crate::export::to_dot_hierarchy::get_template());
        }
        _ => {
            error!("Unsupported exporter: {} - use dothierarchy", exporter);
        }
    }
}

fn write_dir_contents(dir: &Dir, target_path: &Path) -> std::io::Result<()> {
    for file in dir.files() {
        // include_dir paths are relative to the embedded root
        let target_file_path = target_path.join(file.path());
        if let Some(parent) = target_file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target_file_path, file.contents())?;
    }

    for sub_dir in dir.dirs() {
        write_dir_contents(sub_dir, target_path)?;
    }
    Ok(())
}

/// Writes the bundled sample project (plan, nodes, matrix and parcels)
/// into `dir`.
pub fn generate_sample(dir: String) {
    info!("Generating sample project in {:?}", dir);
    let target_path = Path::new(&dir);
    if let Err(e) = fs::create_dir_all(target_path) {
        error!("Failed to create target directory: {:?}", e);
        return;
    }

    match write_dir_contents(&SAMPLE_DIR, target_path) {
        Ok(()) => info!("Sample project generated successfully at: {:?}", dir),
        Err(e) => error!("Failed to write sample project: {:?}", e),
    }
}
