use crate::cli::actions::Action;
use crate::gymbook::{
    storage::{get_local_storage, StorageKey},
    FileStore,
};
use anyhow::{bail, Result};

/// Handle the token action
pub fn handle(action: &Action) -> Result<()> {
    let Action::Token { storage_path } = action else {
        bail!("expected a token action");
    };

    let store = FileStore::new(storage_path);
    match get_local_storage(&store, StorageKey::AccessToken)? {
        Some(token) => println!("{token}"),
        None => bail!("no access token stored in {}", storage_path.display()),
    }

    Ok(())
}
