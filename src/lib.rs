//! Library crate root: launch configuration, hardware detection, and job assembly.

#[path = "lib/mod.rs"]
pub mod lib_mod;
pub use lib_mod as lib;
pub mod cli;
pub mod config;
pub mod hardware;
pub mod jobs;
pub mod runtime;

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    #[test]
    fn jobs_layout_requires_split_modules() {
        let expected_files = [
            "src/jobs/mod.rs",
            "src/jobs/train/mod.rs",
            "src/jobs/train/options.rs",
            "src/jobs/train/assemble.rs",
            "src/jobs/evaluate/mod.rs",
            "src/jobs/evaluate/request.rs",
        ];

        for path in expected_files {
            assert!(Path::new(path).exists(), "jobs layout: {} must exist", path);
        }

        let mod_path = Path::new("src/jobs/mod.rs");
        let content = fs::read_to_string(mod_path)
            .unwrap_or_else(|_| panic!("jobs layout: failed to read {}", mod_path.display()));

        for needle in ["train", "evaluate"] {
            assert!(
                content.contains(needle),
                "jobs layout: mod.rs must declare {}",
                needle
            );
        }
    }

    #[test]
    fn config_layout_requires_split_modules() {
        let expected_files = [
            "src/config/mod.rs",
            "src/config/launcher.rs",
            "src/config/hardware.rs",
            "src/config/telemetry.rs",
        ];

        for path in expected_files {
            assert!(
                Path::new(path).exists(),
                "config layout: {} must exist",
                path
            );
        }
    }
}
