use crate::{
    cli::{actions::Action, commands},
    gymbook::FileStore,
};
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use std::{path::PathBuf, time::Duration};

/// Map parsed arguments to the [`Action`] the binary runs.
///
/// # Errors
/// Returns an error if no subcommand was given or no storage path can be resolved.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let storage_path = matches
        .get_one::<String>(commands::ARG_STORAGE_PATH)
        .map(PathBuf::from)
        .or_else(FileStore::default_path)
        .context("unable to determine a storage path, use --storage-path")?;

    match matches.subcommand() {
        Some((commands::CMD_LOGIN, sub_m)) => Ok(Action::Login {
            api_url: matches
                .get_one::<String>(commands::ARG_API_URL)
                .cloned()
                .ok_or_else(|| anyhow!("missing required argument: --api-url"))?,
            timeout: matches
                .get_one::<u64>(commands::ARG_TIMEOUT)
                .copied()
                .map(Duration::from_secs)
                .ok_or_else(|| anyhow!("missing required argument: --timeout"))?,
            storage_path,
            email: sub_m.get_one::<String>(commands::ARG_EMAIL).cloned(),
            password: sub_m
                .get_one::<String>(commands::ARG_PASSWORD)
                .cloned()
                .map(SecretString::from),
            require_valid: sub_m.get_flag(commands::ARG_REQUIRE_VALID),
        }),
        Some((commands::CMD_TOKEN, _)) => Ok(Action::Token { storage_path }),
        _ => Err(anyhow!("missing subcommand")),
    }
}
