pub mod constants;

pub use etcetera::AppStrategy;
use etcetera::{AppStrategyArgs, choose_app_strategy};

use std::path::PathBuf;

pub fn create_strategy() -> std::result::Result<impl AppStrategy, etcetera::HomeDirError> {
    choose_app_strategy(AppStrategyArgs {
        top_level_domain: constants::TOP_LEVEL_DOMAIN.to_string(),
        author: constants::AUTHOR.to_string(),
        app_name: constants::APP_NAME.to_string(),
    })
}

/// Path of the CLI configuration file inside the platform config directory.
pub fn cli_config_path<S: AppStrategy>(strategy: &S) -> PathBuf {
    strategy.config_dir().join(constants::CLI_CONFIG_FILE_NAME)
}

#[cfg(test)]
mod test {
    use super::*;
    use etcetera::app_strategy::Xdg;

    fn xdg() -> Xdg {
        Xdg::new(AppStrategyArgs {
            top_level_domain: constants::TOP_LEVEL_DOMAIN.to_string(),
            author: constants::AUTHOR.to_string(),
            app_name: constants::APP_NAME.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_cli_config_path_file_name() {
        let path = cli_config_path(&xdg());
        assert_eq!(path.file_name().unwrap(), constants::CLI_CONFIG_FILE_NAME);
    }
}
