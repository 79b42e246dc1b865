//! `UserRepository` backed by a shared map.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{UserAccount, UserPersistenceError, UserRepository};
use crate::domain::{BloodType, Location, PasswordHash, Role, User, UserId, Username};

/// Users keyed by id. Username uniqueness is checked under the write lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    accounts: Arc<RwLock<HashMap<UserId, UserAccount>>>,
}

impl InMemoryUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut accounts = self.accounts.write().await;
        if accounts
            .values()
            .any(|account| account.user.username() == user.username())
        {
            return Err(UserPersistenceError::duplicate_username(
                user.username().as_ref(),
            ));
        }
        accounts.insert(
            *user.id(),
            UserAccount {
                user: user.clone(),
                password_hash: password_hash.clone(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(id).map(|account| account.user.clone()))
    }

    async fn find_account(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|account| account.user.username() == username)
            .cloned())
    }

    async fn find_donors(
        &self,
        blood_type: BloodType,
        location: &Location,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let accounts = self.accounts.read().await;
        let mut donors: Vec<User> = accounts
            .values()
            .map(|account| &account.user)
            .filter(|user| {
                user.role() == Role::Donor
                    && user.blood_type() == blood_type
                    && user.location() == location
            })
            .cloned()
            .collect();
        donors.sort_by(|a, b| a.username().as_ref().cmp(b.username().as_ref()));
        Ok(donors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PasswordHasher;
    use rstest::{fixture, rstest};

    fn user(name: &str, blood_type: BloodType, location: &str, role: Role) -> User {
        User::new(
            UserId::random(),
            Username::new(name).expect("username"),
            blood_type,
            Location::new(location).expect("location"),
            role,
        )
    }

    #[fixture]
    fn hash() -> PasswordHash {
        PasswordHasher::new(1)
            .expect("hasher")
            .hash("secret")
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_usernames_are_rejected(hash: PasswordHash) {
        let repo = InMemoryUserRepository::new();
        repo.insert(&user("ada", BloodType::ONegative, "North", Role::Donor), &hash)
            .await
            .expect("first insert");

        let err = repo
            .insert(&user("ada", BloodType::APositive, "South", Role::Recipient), &hash)
            .await
            .expect_err("duplicate");
        assert_eq!(err, UserPersistenceError::duplicate_username("ada"));
    }

    #[rstest]
    #[tokio::test]
    async fn accounts_are_found_by_username_and_id(hash: PasswordHash) {
        let repo = InMemoryUserRepository::new();
        let ada = user("ada", BloodType::ONegative, "North", Role::Donor);
        repo.insert(&ada, &hash).await.expect("insert");

        let account = repo
            .find_account(ada.username())
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(account.user, ada);
        assert_eq!(account.password_hash.verify("secret"), Ok(true));
        assert_eq!(repo.find_by_id(ada.id()).await.expect("lookup"), Some(ada));
    }

    #[rstest]
    #[tokio::test]
    async fn donor_search_matches_role_type_and_location_exactly(hash: PasswordHash) {
        let repo = InMemoryUserRepository::new();
        for candidate in [
            user("zed", BloodType::BPositive, "North", Role::Donor),
            user("bea", BloodType::BPositive, "North", Role::Donor),
            user("cal", BloodType::BPositive, "North", Role::Recipient),
            user("dev", BloodType::BNegative, "North", Role::Donor),
            user("eve", BloodType::BPositive, "north", Role::Donor),
        ] {
            repo.insert(&candidate, &hash).await.expect("insert");
        }

        let donors = repo
            .find_donors(BloodType::BPositive, &Location::new("North").expect("location"))
            .await
            .expect("search");
        let names: Vec<&str> = donors.iter().map(|u| u.username().as_ref()).collect();
        assert_eq!(names, ["bea", "zed"]);
    }
}
