pub mod logging;

use crate::gymbook::{client::DEFAULT_TIMEOUT, DEFAULT_API_URL};
use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ColorChoice, Command,
};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_STORAGE_PATH: &str = "storage-path";
pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_REQUIRE_VALID: &str = "require-valid";

pub const CMD_LOGIN: &str = "login";
pub const CMD_TOKEN: &str = "token";

fn login() -> Command {
    Command::new(CMD_LOGIN)
        .about("Sign in to your account")
        .arg(
            Arg::new(ARG_EMAIL)
                .short('e')
                .long("email")
                .help("Email address; prompted for when omitted")
                .env("GYMBOOK_EMAIL"),
        )
        .arg(
            Arg::new(ARG_PASSWORD)
                .long("password")
                .help("Password; prompted for (masked) when omitted")
                .env("GYMBOOK_PASSWORD")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_REQUIRE_VALID)
                .long("require-valid")
                .help("Do not send the request while a field has a validation error")
                .action(ArgAction::SetTrue),
        )
}

fn token() -> Command {
    Command::new(CMD_TOKEN).about("Print the stored access token")
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let default_timeout: &'static str =
        Box::leak(DEFAULT_TIMEOUT.as_secs().to_string().into_boxed_str());

    let command = Command::new("gymbook")
        .about("GymBook sign-in client")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_API_URL)
                .long("api-url")
                .help("Base URL of the GymBook API")
                .default_value(DEFAULT_API_URL)
                .env("GYMBOOK_API_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long("timeout")
                .help("HTTP request timeout in seconds")
                .default_value(default_timeout)
                .env("GYMBOOK_HTTP_TIMEOUT")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_STORAGE_PATH)
                .long("storage-path")
                .help("File holding the stored access token (default: <data dir>/gymbook/storage.json)")
                .env("GYMBOOK_STORAGE_PATH")
                .global(true),
        )
        .subcommand(login())
        .subcommand(token());

    logging::with_args(command)
}
