use std::env;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use nicelicense::catalog::DATA_ENV_VAR;
use nicelicense::fetch::FetchConfig;
use nicelicense::prompt::TerminalPrompter;
use nicelicense::report::Console;
use nicelicense::{App, AppConfig, Cli};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let cwd = match env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            eprintln!("Failed to read working directory: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = AppConfig {
        cwd,
        data_env: env::var(DATA_ENV_VAR).ok(),
        fetch: FetchConfig {
            timeout: Duration::from_secs(cli.timeout),
            ..FetchConfig::default()
        },
        non_interactive: cli.json && !io::stdin().is_terminal(),
        defaults: None,
    };

    let mut prompter = TerminalPrompter::stdio();
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr();

    let code = {
        let console = Console::new(&mut stdout, &mut stderr, cli.json);
        App::new(config, &mut prompter, console).execute(&cli)
    };
    let flushed = stdout.flush();

    ExitCode::from(exit_status(code, flushed))
}

/// Process status for an app result. Output that never reached stdout is a
/// failure even when the command itself succeeded.
fn exit_status(code: i32, flushed: io::Result<()>) -> u8 {
    if let Err(e) = flushed {
        log::warn!("Failed to flush stdout: {}", e);
        return 1;
    }
    if code == 0 { 0 } else { 1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_follows_app_code() {
        assert_eq!(exit_status(0, Ok(())), 0);
        assert_eq!(exit_status(1, Ok(())), 1);
    }

    #[test]
    fn test_exit_status_fails_on_unflushed_output() {
        let broken = io::Error::new(io::ErrorKind::BrokenPipe, "closed");
        assert_eq!(exit_status(0, Err(broken)), 1);
    }
}
