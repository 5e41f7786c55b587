//! The one piece of state that outlives the process: the username saved by
//! "remember me".

use crate::errors::AppError;
use crate::models::RememberedUser;
use std::path::Path;
use tokio::fs;
use tracing::{error, warn};

pub async fn load_remembered(path: &Path) -> Option<RememberedUser> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<RememberedUser>(&bytes) {
            Ok(user) if !user.username.is_empty() => Some(user),
            Ok(_) => None,
            Err(err) => {
                warn!("discarding unreadable remembered user: {err}");
                if let Err(err) = fs::remove_file(path).await {
                    error!("failed to remove remembered user file: {err}");
                }
                None
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            error!("failed to read remembered user file: {err}");
            None
        }
    }
}

pub async fn remember_user(path: &Path, username: &str) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(&RememberedUser {
        username: username.to_string(),
    })
    .map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

pub async fn forget_user(path: &Path) -> Result<(), AppError> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(AppError::internal(err)),
    }
}
