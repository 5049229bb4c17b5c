use std::io;
use std::process::ExitCode;

use cash::core::config::ShellConfig;
use cash::core::env::EnvVarManager;
use cash::shell::Shell;

fn main() -> ExitCode {
    let config = ShellConfig::from_env();
    if let Err(e) = cash::logging::init(config.log_level) {
        eprintln!("cash: {}", e);
    }

    log::debug!("starting with {:?}", config);
    let env = EnvVarManager::new();
    log::debug!("adopted {} environment variables", env.len());
    let mut shell = Shell::new(config, io::stdin().lock(), io::stdout(), env);

    match shell.run() {
        Ok(reason) => {
            log::debug!("session ended: {:?}", reason);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("cash: {}", e);
            ExitCode::FAILURE
        }
    }
}
