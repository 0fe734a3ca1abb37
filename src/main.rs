use log::{error, info};

use snowfall::SnowConfig;

/// Environment variable naming an optional JSON config file.
const CONFIG_ENV: &str = "SNOWFALL_CONFIG";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => match SnowConfig::from_json_file(&path) {
            Ok(config) => {
                info!("Loaded config from {}", path.to_string_lossy());
                config
            }
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        },
        None => SnowConfig::default(),
    };

    if let Err(e) = snowfall::run(config) {
        error!("{}", e);
        std::process::exit(1);
    }
}
