//! GymBook sign-in client.
//!
//! The [`gymbook`] module holds the login form controller and the capabilities it
//! is wired to (auth API, key-value storage, navigation). The [`cli`] module is the
//! terminal front end used by the `gymbook` binary.

pub mod cli;
pub mod gymbook;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
