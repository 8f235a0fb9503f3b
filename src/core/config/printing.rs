use crate::core::config::data::{path_display, Config};

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.base_url {
            Some(url) => println!("  base-url: {url}"),
            None => println!("  base-url: (unset)"),
        }
        match self.auto_load_tasks() {
            true => println!("  auto-load-tasks: on"),
            false => println!("  auto-load-tasks: off"),
        }
        if let Ok(path) = Config::get_config_path() {
            println!("\nConfig file: {}", path_display(path));
        }
    }
}
