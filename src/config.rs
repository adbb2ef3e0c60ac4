mod error;
mod io;
mod model;


pub use error::{ConfigError, Result};
pub(crate) use io::project_dirs;
pub use io::{LoadedConfig, default_config_path, load_config, load_or_default, to_toml_string};
pub use model::{
    AppConfig, ControlConfig, DEFAULT_CONTROL_PORT, IdentityConfig, LoggingConfig, RenderConfig,
    RendererConfig, WatchConfig,
};
