use anyhow::Result;
use gymbook::cli::{actions, actions::Action, start};

#[tokio::main]
async fn main() -> Result<()> {
    let action = start()?;

    match action {
        Action::Login { .. } => actions::login::handle(action).await?,
        Action::Token { .. } => actions::token::handle(&action)?,
    }

    Ok(())
}
