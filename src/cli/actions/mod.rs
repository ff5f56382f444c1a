pub mod login;
pub mod token;

use secrecy::SecretString;
use std::{path::PathBuf, time::Duration};

#[derive(Debug)]
pub enum Action {
    Login {
        api_url: String,
        timeout: Duration,
        storage_path: PathBuf,
        email: Option<String>,
        password: Option<SecretString>,
        require_valid: bool,
    },
    Token {
        storage_path: PathBuf,
    },
}
