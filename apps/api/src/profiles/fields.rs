//! Allow-listed field routing for profile updates.
//!
//! Each incoming key is looked up in a fixed table: profile keys first, then
//! account keys. Unknown keys reject the whole request before anything is
//! written.

use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::models::user::{Profile, User};

type ProfileSetter = fn(&mut Profile, &Value) -> Result<(), String>;
type AccountSetter = fn(&mut User, &Value) -> Result<(), String>;

const PROFILE_FIELDS: &[(&str, ProfileSetter)] = &[
    ("profileName", set_profile_name),
    ("skills", set_skills),
    ("job_levels", set_job_levels),
    ("locations", set_locations),
    ("institution", set_institution),
    ("phone_number", set_phone_number),
    ("address", set_address),
];

const ACCOUNT_FIELDS: &[(&str, AccountSetter)] = &[
    ("fullName", set_full_name),
    ("email", set_email),
];

fn set_profile_name(p: &mut Profile, v: &Value) -> Result<(), String> {
    set_string(&mut p.profile_name, v)
}

fn set_skills(p: &mut Profile, v: &Value) -> Result<(), String> {
    set_list(&mut p.skills, v)
}

fn set_job_levels(p: &mut Profile, v: &Value) -> Result<(), String> {
    set_list(&mut p.job_levels, v)
}

fn set_locations(p: &mut Profile, v: &Value) -> Result<(), String> {
    set_list(&mut p.locations, v)
}

fn set_institution(p: &mut Profile, v: &Value) -> Result<(), String> {
    set_string(&mut p.institution, v)
}

fn set_phone_number(p: &mut Profile, v: &Value) -> Result<(), String> {
    set_string(&mut p.phone_number, v)
}

fn set_address(p: &mut Profile, v: &Value) -> Result<(), String> {
    set_string(&mut p.address, v)
}

fn set_full_name(u: &mut User, v: &Value) -> Result<(), String> {
    set_string(&mut u.full_name, v)
}

fn set_email(u: &mut User, v: &Value) -> Result<(), String> {
    set_string(&mut u.email, v)
}

enum Target {
    Profile(ProfileSetter),
    Account(AccountSetter),
}

fn profile_setter(name: &str) -> Option<ProfileSetter> {
    PROFILE_FIELDS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, setter)| *setter)
}

fn account_setter(name: &str) -> Option<AccountSetter> {
    ACCOUNT_FIELDS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, setter)| *setter)
}

fn invalid_field(name: &str) -> AppError {
    AppError::Validation(format!("Invalid field: {name}"))
}

fn invalid_value(name: &str, reason: String) -> AppError {
    AppError::Validation(format!("Invalid value for field {name}: {reason}"))
}

/// Routes every field to `user.profiles[profile_index]` or to the account.
///
/// All keys are resolved before any setter runs; callers persist `user` only
/// on `Ok`, so a rejected request leaves the stored document untouched.
pub fn apply_profile_update(
    user: &mut User,
    profile_index: usize,
    fields: &Map<String, Value>,
) -> Result<(), AppError> {
    let mut plan = Vec::with_capacity(fields.len());
    for (name, value) in fields {
        let target = profile_setter(name)
            .map(Target::Profile)
            .or_else(|| account_setter(name).map(Target::Account))
            .ok_or_else(|| invalid_field(name))?;
        plan.push((name, target, value));
    }

    for (name, target, value) in plan {
        let result = match target {
            Target::Profile(set) => match user.profiles.get_mut(profile_index) {
                Some(profile) => set(profile, value),
                None => {
                    return Err(AppError::InvalidIndex(format!(
                        "Invalid profile index: {profile_index}"
                    )))
                }
            },
            Target::Account(set) => set(user, value),
        };
        result.map_err(|reason| invalid_value(name, reason))?;
    }
    Ok(())
}

/// Builds a new profile from profile-only fields.
pub fn build_profile(fields: &Map<String, Value>) -> Result<Profile, AppError> {
    let mut profile = Profile::default();
    for (name, value) in fields {
        let set = profile_setter(name).ok_or_else(|| invalid_field(name))?;
        set(&mut profile, value).map_err(|reason| invalid_value(name, reason))?;
    }
    Ok(profile)
}

fn set_string(slot: &mut String, value: &Value) -> Result<(), String> {
    match value {
        Value::String(s) => *slot = s.clone(),
        Value::Null => slot.clear(),
        other => return Err(format!("expected a string, got {other}")),
    }
    Ok(())
}

/// Lists accept plain strings or `{"value": "..."}` select-box entries.
fn set_list(slot: &mut Vec<String>, value: &Value) -> Result<(), String> {
    let Value::Array(items) = value else {
        return Err("expected a list".to_string());
    };
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(s) => out.push(s.clone()),
            Value::Object(obj) => match obj.get("value") {
                Some(Value::String(s)) => out.push(s.clone()),
                _ => return Err("list entries need a string `value`".to_string()),
            },
            other => return Err(format!("unexpected list entry {other}")),
        }
    }
    *slot = out;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn user() -> User {
        User {
            id: 1,
            full_name: "Old Name".into(),
            profiles: vec![Profile::named("Default")],
            ..User::default()
        }
    }

    #[test]
    fn test_routes_profile_and_account_fields() {
        let mut user = user();
        apply_profile_update(
            &mut user,
            0,
            &fields(json!({"skills": ["Rust"], "email": "new@example.com", "fullName": "New"})),
        )
        .unwrap();
        assert_eq!(user.profiles[0].skills, vec!["Rust"]);
        assert_eq!(user.email, "new@example.com");
        assert_eq!(user.full_name, "New");
    }

    #[test]
    fn test_unknown_field_rejects_everything() {
        let mut user = user();
        let err = apply_profile_update(
            &mut user,
            0,
            &fields(json!({"address": "1 Main St", "invalid_field": 1})),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Invalid field: invalid_field"));
        assert_eq!(user.profiles[0].address, "");
    }

    #[test]
    fn test_list_accepts_select_entries() {
        let mut user = user();
        apply_profile_update(
            &mut user,
            0,
            &fields(json!({"locations": [{"value": "Raleigh", "label": "Raleigh"}, "Austin"]})),
        )
        .unwrap();
        assert_eq!(user.profiles[0].locations, vec!["Raleigh", "Austin"]);
    }

    #[test]
    fn test_wrong_value_type() {
        let mut user = user();
        assert!(apply_profile_update(&mut user, 0, &fields(json!({"skills": "Rust"}))).is_err());
    }

    #[test]
    fn test_build_profile_refuses_account_fields() {
        let err = build_profile(&fields(json!({"email": "x@y.z"}))).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Invalid field: email"));
    }

    #[test]
    fn test_build_profile_leaves_unset_fields_blank() {
        let profile =
            build_profile(&fields(json!({"profileName": "New", "skills": ["Java"]}))).unwrap();
        assert_eq!(profile.profile_name, "New");
        assert_eq!(profile.skills, vec!["Java"]);
        assert!(profile.locations.is_empty());
        assert_eq!(profile.institution, "");
    }
}
