//! Simulated sign-in and sign-up. There is no account store: a filled-in
//! form always succeeds and the role is derived from the form itself.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    AdminDashboard,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Dashboard => "/dashboard",
            Route::AdminDashboard => "/admin/dashboard",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountType {
    #[default]
    Business,
    Admin,
}

impl AccountType {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountType::Business => "business",
            AccountType::Admin => "admin",
        }
    }

    fn route(self) -> Route {
        match self {
            AccountType::Business => Route::Dashboard,
            AccountType::Admin => Route::AdminDashboard,
        }
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "business" => Ok(AccountType::Business),
            "admin" => Ok(AccountType::Admin),
            other => Err(format!("unknown account type '{other}' (expected business or admin)")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub account_type: AccountType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignIn {
    pub account_type: AccountType,
    pub route: Route,
}

pub fn login(form: &LoginForm) -> Result<SignIn, AuthError> {
    if form.email.is_empty() || form.password.is_empty() {
        warn!("login rejected: missing fields");
        return Err(AuthError::MissingFields);
    }
    let account_type = if form.email.contains("admin") {
        AccountType::Admin
    } else {
        AccountType::Business
    };
    info!(role = account_type.as_str(), "login accepted");
    Ok(SignIn {
        account_type,
        route: account_type.route(),
    })
}

pub fn signup(form: &SignupForm) -> Result<SignIn, AuthError> {
    if form.name.is_empty() || form.email.is_empty() || form.password.is_empty() {
        warn!("signup rejected: missing fields");
        return Err(AuthError::MissingFields);
    }
    info!(role = form.account_type.as_str(), "account created");
    Ok(SignIn {
        account_type: form.account_type,
        route: form.account_type.route(),
    })
}

/// Stand-in for the round trip to an auth service.
pub fn simulate_round_trip(delay: Duration) {
    std::thread::sleep(delay);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Success,
    Destructive,
}

/// A toast shown after a form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

impl Notification {
    pub fn for_login(result: &Result<SignIn, AuthError>) -> Self {
        match result {
            Ok(sign_in) => {
                let who = match sign_in.account_type {
                    AccountType::Admin => "Admin",
                    AccountType::Business => "Business",
                };
                Self::success("Login successful", format!("Welcome back, {who} user!"))
            }
            Err(e) => Self::failure("Login failed", e),
        }
    }

    pub fn for_signup(result: &Result<SignIn, AuthError>) -> Self {
        match result {
            Ok(sign_in) => Self::success(
                "Account created",
                format!(
                    "Your {} account has been created successfully!",
                    sign_in.account_type.as_str()
                ),
            ),
            Err(e) => Self::failure("Sign up failed", e),
        }
    }

    fn success(title: &str, description: String) -> Self {
        Self {
            title: title.to_string(),
            description,
            variant: Variant::Success,
        }
    }

    fn failure(title: &str, err: &AuthError) -> Self {
        Self {
            title: title.to_string(),
            description: err.to_string(),
            variant: Variant::Destructive,
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_form(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn test_login_routes_by_email() {
        let admin = login(&login_form("admin@acmeinc.com", "pw")).unwrap();
        assert_eq!(admin.route, Route::AdminDashboard);
        assert_eq!(admin.route.path(), "/admin/dashboard");

        let business = login(&login_form("owner@shop.com", "pw")).unwrap();
        assert_eq!(business.route, Route::Dashboard);
    }

    #[test]
    fn test_login_requires_fields() {
        let result = login(&login_form("owner@shop.com", ""));
        assert_eq!(result, Err(AuthError::MissingFields));

        let toast = Notification::for_login(&result);
        assert_eq!(toast.title, "Login failed");
        assert_eq!(toast.description, "Please fill in all fields");
        assert_eq!(toast.variant, Variant::Destructive);
    }

    #[test]
    fn test_login_toast() {
        let toast = Notification::for_login(&login(&login_form("admin@x.io", "pw")));
        assert_eq!(toast.to_string(), "Login successful: Welcome back, Admin user!");
    }

    #[test]
    fn test_signup_routes_by_account_type() {
        let mut form = SignupForm {
            name: "Ada".into(),
            email: "admin@shop.com".into(),
            password: "pw".into(),
            account_type: AccountType::Business,
        };
        // the email is irrelevant for signup
        let result = signup(&form);
        assert_eq!(result.as_ref().unwrap().route, Route::Dashboard);
        assert_eq!(
            Notification::for_signup(&result).description,
            "Your business account has been created successfully!"
        );

        form.account_type = AccountType::Admin;
        assert_eq!(signup(&form).unwrap().route, Route::AdminDashboard);

        form.name.clear();
        assert_eq!(signup(&form), Err(AuthError::MissingFields));
    }

    #[test]
    fn test_account_type_parse() {
        assert_eq!("admin".parse::<AccountType>(), Ok(AccountType::Admin));
        assert!("owner".parse::<AccountType>().is_err());
    }
}
