use crate::cli::actions::Action;
use crate::gymbook::{
    screen::LOGIN_SCREEN, AuthApi, Field, FileStore, HistoryNavigator, HttpAuthClient,
    KeyValueStore, LoginForm, Navigator, SubmitOutcome, SubmitPolicy,
};
use anyhow::{bail, Result};
use dialoguer::{Input, Password};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

/// Handle the login action
pub async fn handle(action: Action) -> Result<()> {
    let Action::Login {
        api_url,
        timeout,
        storage_path,
        email,
        password,
        require_valid,
    } = action
    else {
        bail!("expected a login action");
    };

    let client = HttpAuthClient::new(&api_url, timeout)?;
    debug!("login endpoint: {}", client.login_url());

    let policy = if require_valid {
        SubmitPolicy::RequireValid
    } else {
        SubmitPolicy::Unconditional
    };

    let form = LoginForm::new(client, FileStore::new(&storage_path), HistoryNavigator::new())
        .with_policy(policy);

    let screen = LOGIN_SCREEN;
    debug!("showing sign-in screen at {}", screen.route);
    eprintln!("{}\n{}\n", screen.title, screen.heading);

    let email = match email {
        Some(email) => email,
        None => Input::<String>::new()
            .with_prompt(screen.field(Field::Email).label)
            .allow_empty(true)
            .interact_text()?,
    };
    enter_field(&form, Field::Email, &email);

    let password = match password {
        Some(password) => password,
        None => SecretString::from(
            Password::new()
                .with_prompt(screen.field(Field::Password).label)
                .allow_empty_password(true)
                .interact()?,
        ),
    };
    enter_field(&form, Field::Password, password.expose_secret());

    match form.submit().await? {
        SubmitOutcome::Succeeded { route } => {
            println!("Signed in, access token stored in {}", storage_path.display());
            println!("Continue at {route}");
        }
        // The form stays as it was; any API error message has already been logged.
        SubmitOutcome::Failed | SubmitOutcome::Blocked => {
            eprintln!("\n{}", screen.render(&form.snapshot()));
        }
    }

    Ok(())
}

/// Types a value into a field and leaves it, printing the inline error if any.
fn enter_field<A, S, N>(form: &LoginForm<A, S, N>, field: Field, value: &str)
where
    A: AuthApi,
    S: KeyValueStore,
    N: Navigator,
{
    form.set_field_value(field, value);
    form.set_field_touched(field, true);
    if let Some(error) = form.field_meta(field).visible_error() {
        eprintln!("  ! {error}");
    }
}
