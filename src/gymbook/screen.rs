//! Declarative description of the sign-in screen and its terminal rendering.

use super::{form::FormSnapshot, routes, validation::Field};
use std::fmt::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextField {
    pub field: Field,
    pub label: &'static str,
    pub masked: bool,
    pub autofocus: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
    pub prompt: &'static str,
    pub text: &'static str,
    pub to: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoginScreen {
    /// Route the screen is mounted at.
    pub route: &'static str,
    pub title: &'static str,
    pub heading: &'static str,
    pub fields: [TextField; 2],
    pub submit_label: &'static str,
    pub sign_up: Link,
}

pub const LOGIN_SCREEN: LoginScreen = LoginScreen {
    route: routes::SIGN_IN,
    title: "GymBook",
    heading: "Sign in to your account",
    fields: [
        TextField {
            field: Field::Email,
            label: "Email Address",
            masked: false,
            autofocus: true,
        },
        TextField {
            field: Field::Password,
            label: "Password",
            masked: true,
            autofocus: false,
        },
    ],
    submit_label: "Sign In",
    sign_up: Link {
        prompt: "Create a new account?",
        text: "Sign up",
        to: routes::SIGN_UP,
    },
};

impl LoginScreen {
    #[must_use]
    pub fn field(&self, field: Field) -> &TextField {
        match field {
            Field::Email => &self.fields[0],
            Field::Password => &self.fields[1],
        }
    }

    /// Renders one input line plus its helper text, if the field shows an error.
    #[must_use]
    pub fn render_field(&self, field: Field, snapshot: &FormSnapshot) -> String {
        let input = self.field(field);
        let value = snapshot.value(field);
        let shown = if input.masked {
            "*".repeat(value.chars().count())
        } else {
            value.to_string()
        };

        let mut out = format!("{}: {}", input.label, shown);
        if let Some(error) = snapshot.meta(field).visible_error() {
            let _ = write!(out, "\n  ! {error}");
        }
        out
    }

    #[must_use]
    pub fn render(&self, snapshot: &FormSnapshot) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        let _ = writeln!(out, "{}", self.heading);
        let _ = writeln!(out);
        for input in &self.fields {
            let _ = writeln!(out, "{}", self.render_field(input.field, snapshot));
        }
        let submit = if snapshot.is_submitting {
            format!("[ {} ... ]", self.submit_label)
        } else {
            format!("[ {} ]", self.submit_label)
        };
        let _ = writeln!(out, "{submit}");
        let _ = writeln!(out);
        let _ = write!(
            out,
            "{} {} ({})",
            self.sign_up.prompt, self.sign_up.text, self.sign_up.to
        );
        out
    }
}
