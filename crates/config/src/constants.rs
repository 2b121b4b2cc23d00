pub const TOP_LEVEL_DOMAIN: &str = "org";
pub const AUTHOR: &str = "lucy";
pub const APP_NAME: &str = "lucy";

pub const CLI_CONFIG_FILE_NAME: &str = "cli.toml";
