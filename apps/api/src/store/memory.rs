use std::collections::BTreeMap;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::UserStore;
use crate::models::user::User;

/// In-process `UserStore` with the same field-overwrite semantics as Postgres.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<BTreeMap<i64, User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn next_user_id(&self) -> Result<i64> {
        let users = self.users.read().await;
        Ok(users.keys().next_back().map_or(1, |max| max + 1))
    }

    async fn insert(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            bail!("user {} already exists", user.id);
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get(&self, id: i64) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.username.as_deref() == Some(username))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn save(&self, user: &User) -> Result<()> {
        self.users.write().await.insert(user.id, user.clone());
        Ok(())
    }

    async fn replace_fields(&self, id: i64, fields: Map<String, Value>) -> Result<()> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(());
        };
        let mut doc = serde_json::to_value(&*user)?;
        if let Value::Object(map) = &mut doc {
            map.extend(fields);
        }
        *user = serde_json::from_value(doc)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Profile;
    use crate::store::{replace, UserField};

    #[tokio::test]
    async fn test_next_user_id_is_max_plus_one() {
        let store = MemoryUserStore::default();
        assert_eq!(store.next_user_id().await.unwrap(), 1);
        store.insert(&User::new(4, "A", "d".into())).await.unwrap();
        store.insert(&User::new(2, "B", "d".into())).await.unwrap();
        assert_eq!(store.next_user_id().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_replace_overwrites_only_named_fields() {
        let store = MemoryUserStore::default();
        let mut user = User::new(1, "A", "d".into());
        user.email = "a@example.com".into();
        store.insert(&user).await.unwrap();

        let profiles = vec![Profile::named("one"), Profile::named("two")];
        replace(&store, 1, &[UserField::Profiles(&profiles), UserField::DefaultProfile(1)])
            .await
            .unwrap();

        let stored = store.get(1).await.unwrap().unwrap();
        assert_eq!(stored.profiles, profiles);
        assert_eq!(stored.default_profile, 1);
        assert_eq!(stored.email, "a@example.com");
    }
}
