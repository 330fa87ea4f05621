pub mod fields;
pub mod handlers;

use crate::errors::{check_index, AppError};
use crate::models::user::{Profile, User};

/// Index of the profile a request targets: the explicit one when given,
/// otherwise the stored default. Both are bounds-checked before use.
pub fn resolve_profile_index(user: &User, explicit: Option<i64>) -> Result<usize, AppError> {
    match explicit {
        Some(index) => check_index(index, user.profiles.len(), "profile"),
        None if user.profiles.is_empty() => {
            Err(AppError::NoRecords("No profile available".to_string()))
        }
        None => check_index(
            user.default_profile as i64,
            user.profiles.len(),
            "default profile",
        ),
    }
}

/// Rejects `name` when another profile (any index but `except`) already
/// uses it. Blank names are never compared.
pub fn ensure_unique_name(
    profiles: &[Profile],
    name: &str,
    except: Option<usize>,
) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Ok(());
    }
    let taken = profiles
        .iter()
        .enumerate()
        .any(|(i, p)| Some(i) != except && p.profile_name == name);
    if taken {
        return Err(AppError::Conflict(format!(
            "Profile name already exists: {name}"
        )));
    }
    Ok(())
}
