//! First-run project scaffolding.
//!
//! Creates the fixed SystemPulse project tree once; if the root directory
//! already exists the whole step is skipped.

use std::path::Path;
use tracing::info;

const DIRECTORIES: &[&str] = &[
    "config",
    "frontend/src",
    "frontend/static",
    "scripts",
    "src/api",
    "src/core",
    "src/models",
    "src/utils",
    "tests",
];

const PLACEHOLDER_FILES: &[&str] = &[
    "config/settings.yaml",
    "frontend/svelte.config.js",
    "scripts/build_app.sh",
    "src/api/system.py",
    "src/api/network.py",
    "src/core/analysis.py",
    "src/core/cleaner.py",
    "src/core/scanner.py",
    "src/models/system_models.py",
    "src/utils/helpers.py",
    "tests/test_api.py",
    "tests/test_core.py",
];

const PYPROJECT: &str = "\
[project]
name = \"systempulse\"
version = \"0.1.0\"
description = \"A modern system utility and monitoring tool.\"
dependencies = [
    \"fastapi\",
    \"uvicorn[standard]\",
    \"psutil\",
]
";

const README: &str = "# SystemPulse\nA modern system utility and monitoring tool.\n";

const GITIGNORE: &str = "__pycache__/\n*.pyc\n.env\n/dist\n/build\n*.spec\nvenv/\n";

/// Creates the project tree under `root` unless it already exists.
/// Returns whether anything was created.
pub fn setup_if_needed(root: &Path) -> std::io::Result<bool> {
    if root.exists() {
        info!(root = %root.display(), "project directory exists; skipping setup");
        return Ok(false);
    }

    info!(root = %root.display(), "creating project structure");
    for dir in DIRECTORIES {
        std::fs::create_dir_all(root.join(dir))?;
    }
    for file in PLACEHOLDER_FILES {
        let content = if file.ends_with(".py") {
            "# Placeholder\n"
        } else {
            ""
        };
        std::fs::write(root.join(file), content)?;
    }
    std::fs::write(root.join("pyproject.toml"), PYPROJECT)?;
    std::fs::write(root.join("README.md"), README)?;
    std::fs::write(root.join(".gitignore"), GITIGNORE)?;
    std::fs::write(
        root.join("src/main.py"),
        "# Main application entry point placeholder.\n",
    )?;
    Ok(true)
}
