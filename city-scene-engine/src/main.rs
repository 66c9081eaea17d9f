use city_scene_engine::config::SimConfig;
use city_scene_engine::engine::core::app_setup::create_app;

const CONFIG_PATH: &str = "assets/city_config.json";

fn main() {
    let config = match SimConfig::load(CONFIG_PATH) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load {CONFIG_PATH}: {err}");
            std::process::exit(1);
        }
    };
    if let Err(err) = config.validate() {
        eprintln!("Invalid configuration: {err}");
        std::process::exit(1);
    }

    create_app(config).run();
}
