use tracing::{debug, info};

use super::{LaunchSettings, CONFIG_ENV_KEY, DEFAULT_CONFIG_PATH};

pub fn log_source(path: &std::path::Path, explicit: bool) {
    if explicit {
        info!(
            target: "leia_launch::config",
            path = %path.display(),
            "Loading launcher settings from explicit path"
        );
    } else {
        debug!(
            target: "leia_launch::config",
            path = %path.display(),
            env = CONFIG_ENV_KEY,
            default = DEFAULT_CONFIG_PATH,
            "LEIA_LAUNCH_CONFIG not set; using default launch.toml"
        );
    }
}

pub fn log_defaults(settings: &LaunchSettings) {
    debug!(
        target: "leia_launch::config",
        program = %settings.launcher.program.display(),
        train_script = %settings.launcher.train_script.display(),
        probe = settings.hardware.probe.as_str(),
        "No settings file found; using built-in defaults"
    );
}

pub fn log_loaded(settings: &LaunchSettings) {
    info!(
        target: "leia_launch::config",
        path = %settings
            .source_path
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_default(),
        program = %settings.launcher.program.display(),
        train_script = %settings.launcher.train_script.display(),
        evaluate_script = %settings.launcher.evaluate_script.display(),
        probe = settings.hardware.probe.as_str(),
        "Launcher settings loaded successfully"
    );
}
