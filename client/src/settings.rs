use std::path::PathBuf;

use bevy::prelude::*;
use shared::SceneSettings;

const CONFIG_ENV: &str = "AURORA_CONFIG";

/// Settings the scene is (re)mounted with.
#[derive(Resource, Debug, Clone, Copy)]
pub struct SceneConfig {
    pub settings: SceneSettings,
    /// Camera-only preview: no player entity is spawned.
    pub preview: bool,
}

/// How the settings were obtained, reported once logging is up.
#[derive(Resource, Debug)]
enum ConfigSource {
    Defaults,
    File(PathBuf),
    Fallback(PathBuf, String),
}

pub(super) fn plugin(app: &mut App) {
    let options = read_launch_options(std::env::args().skip(1), std::env::var(CONFIG_ENV).ok());

    let (settings, source) = match options.config_path {
        None => (SceneSettings::default(), ConfigSource::Defaults),
        Some(path) => match SceneSettings::load(&path) {
            Ok(settings) => (settings, ConfigSource::File(path)),
            Err(err) => (
                SceneSettings::default(),
                ConfigSource::Fallback(path, err.to_string()),
            ),
        },
    };

    app.insert_resource(SceneConfig {
        settings,
        preview: options.preview,
    });
    app.insert_resource(source);
    app.add_systems(Startup, report_config_source);
}

fn report_config_source(source: Res<ConfigSource>, config: Res<SceneConfig>) {
    match &*source {
        ConfigSource::Defaults => info!("Using built-in scene settings."),
        ConfigSource::File(path) => info!("Loaded scene settings from {}", path.display()),
        ConfigSource::Fallback(path, err) => {
            warn!("{} ({}); falling back to built-in settings.", err, path.display())
        }
    }
    if config.preview {
        info!("Preview mode: camera only, no player.");
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct LaunchOptions {
    config_path: Option<PathBuf>,
    preview: bool,
}

/// Parse launch options from CLI args, falling back to the environment for the config path.
///
/// Supported:
///   --config <path>
///   --config=<path>
///   --preview
///   AURORA_CONFIG environment variable
fn read_launch_options(
    args: impl IntoIterator<Item = String>,
    env_config: Option<String>,
) -> LaunchOptions {
    let mut options = LaunchOptions::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        if arg == "--preview" {
            options.preview = true;
        } else if arg == "--config" {
            if let Some(path) = args.next() {
                options.config_path = Some(PathBuf::from(path));
            }
        } else if let Some(path) = arg.strip_prefix("--config=") {
            options.config_path = Some(PathBuf::from(path));
        }
    }

    if options.config_path.is_none() {
        options.config_path = env_config
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_args_means_defaults() {
        assert_eq!(read_launch_options(args(&[]), None), LaunchOptions::default());
    }

    #[test]
    fn config_flag_in_both_forms() {
        let a = read_launch_options(args(&["--config", "a.toml"]), None);
        assert_eq!(a.config_path, Some(PathBuf::from("a.toml")));

        let b = read_launch_options(args(&["--preview", "--config=b.toml"]), None);
        assert_eq!(b.config_path, Some(PathBuf::from("b.toml")));
        assert!(b.preview);
    }

    #[test]
    fn cli_wins_over_environment() {
        let cli = read_launch_options(args(&["--config=cli.toml"]), Some("env.toml".into()));
        assert_eq!(cli.config_path, Some(PathBuf::from("cli.toml")));

        let env = read_launch_options(args(&[]), Some("env.toml".into()));
        assert_eq!(env.config_path, Some(PathBuf::from("env.toml")));

        let blank = read_launch_options(args(&[]), Some("  ".into()));
        assert_eq!(blank.config_path, None);
    }

    #[test]
    fn dangling_config_flag_is_ignored() {
        let opts = read_launch_options(args(&["--config"]), None);
        assert_eq!(opts.config_path, None);
    }
}
