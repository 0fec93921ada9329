use crate::error::{AppError, CliError};
use rpassword::prompt_password;
use serde_json::{Value, json};
use std::io::{self, Write};

/// Interactive login input for the CLI
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

impl LoginInput {
    /// Prompt for whatever is missing. The password is always read without echo.
    pub fn collect(username: Option<&str>) -> Result<Self, AppError> {
        let username = match username {
            Some(username) => username.to_string(),
            None => {
                print!("Username: ");
                io::stdout().flush().map_err(|e| {
                    CliError::InvalidArguments(format!("Failed to flush stdout: {}", e))
                })?;

                let mut username = String::new();
                io::stdin().read_line(&mut username).map_err(|e| {
                    CliError::InvalidArguments(format!("Failed to read username: {}", e))
                })?;
                username.trim().to_string()
            }
        };

        let password = prompt_password("Password: ")
            .map_err(|e| CliError::InvalidArguments(format!("Failed to read password: {}", e)))?;

        Ok(Self {
            username,
            password: password.trim_end_matches(['\r', '\n']).to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.username.is_empty() {
            return Err(CliError::InvalidArguments("Username cannot be empty".to_string()).into());
        }
        if self.password.is_empty() {
            return Err(CliError::InvalidArguments("Password cannot be empty".to_string()).into());
        }
        Ok(())
    }

    /// Credentials payload sent to `auth/login`
    pub fn into_credentials(self) -> Value {
        json!({
            "username": self.username,
            "password": self.password,
        })
    }
}
