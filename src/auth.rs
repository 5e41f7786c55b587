use thiserror::Error;

// Placeholder credentials; there is no account store behind this check.
const USERNAME: &str = "cc";
const PASSWORD: &str = "password";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("Please enter both username and password.")]
    MissingFields,
    #[error("Invalid username or password.")]
    InvalidCredentials,
    #[error("Login failed. Please try again later.")]
    Unavailable,
}

pub fn attempt_login(username: &str, password: &str) -> Result<(), LoginError> {
    if username.is_empty() || password.is_empty() {
        return Err(LoginError::MissingFields);
    }
    if username == USERNAME && password == PASSWORD {
        Ok(())
    } else {
        Err(LoginError::InvalidCredentials)
    }
}

/// Who is signed in to this server instance, if anyone.
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<String>,
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn sign_in(&mut self, username: &str) {
        self.user = Some(username.to_string());
    }

    pub fn sign_out(&mut self) {
        self.user = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_credentials_are_accepted() {
        assert_eq!(attempt_login("cc", "password"), Ok(()));
    }

    #[test]
    fn blank_fields_are_reported_first() {
        assert_eq!(attempt_login("", "password"), Err(LoginError::MissingFields));
        assert_eq!(attempt_login("cc", ""), Err(LoginError::MissingFields));
    }

    #[test]
    fn wrong_pair_is_rejected() {
        assert_eq!(
            attempt_login("cc", "hunter2"),
            Err(LoginError::InvalidCredentials)
        );
        assert_eq!(
            LoginError::InvalidCredentials.to_string(),
            "Invalid username or password."
        );
    }

    #[test]
    fn session_tracks_sign_in() {
        let mut session = Session::default();
        assert!(!session.is_logged_in());
        session.sign_in("cc");
        assert!(session.is_logged_in());
        session.sign_out();
        assert!(!session.is_logged_in());
    }
}
