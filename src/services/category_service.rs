use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::database::models::{Category, NewCategory};
use crate::database::repository::{CategoryRepository, UserRepository};
use crate::services::error::{ServiceError, ServiceResult};

pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
    users: Arc<dyn UserRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { categories, users }
    }

    pub async fn create(&self, user_id: Uuid, name: &str) -> ServiceResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::validation("name", "category name must not be empty"));
        }
        if !self.users.exists(user_id).await? {
            return Err(ServiceError::OwnerNotFound);
        }

        let category = self
            .categories
            .insert(NewCategory {
                name: name.to_string(),
                user_id,
            })
            .await?;
        info!("Created category {} for user {}", category.id, user_id);
        Ok(category)
    }

    /// The caller's own categories plus the global ones
    pub async fn list(&self, user_id: Uuid) -> ServiceResult<Vec<Category>> {
        Ok(self.categories.list_for_user(user_id).await?)
    }

    pub async fn delete(&self, id: i32, user_id: Uuid) -> ServiceResult<()> {
        match self.categories.delete_owned(id, user_id).await? {
            0 => Err(ServiceError::NotFound("category")),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;

    #[tokio::test]
    async fn owner_must_exist() {
        let store = MemoryStore::new();
        let service = CategoryService::new(store.clone(), store.clone());
        let err = service.create(Uuid::new_v4(), "Groceries").await.unwrap_err();
        assert!(matches!(err, ServiceError::OwnerNotFound));
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let store = MemoryStore::new();
        let user = store.add_user("alice@example.com").await;
        let service = CategoryService::new(store.clone(), store.clone());
        let err = service.create(user, "   ").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation { field: "name", .. }));
    }

    #[tokio::test]
    async fn list_includes_globals_but_not_other_users() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice@example.com").await;
        let bob = store.add_user("bob@example.com").await;
        store.add_global_category("Utilities").await;
        let service = CategoryService::new(store.clone(), store.clone());

        service.create(alice, "Groceries").await.unwrap();
        service.create(bob, "Games").await.unwrap();

        let mut names: Vec<_> = service
            .list(alice)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["Groceries", "Utilities"]);
    }

    #[tokio::test]
    async fn delete_is_scoped_to_owner() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice@example.com").await;
        let bob = store.add_user("bob@example.com").await;
        let global = store.add_global_category("Utilities").await;
        let service = CategoryService::new(store.clone(), store.clone());

        let groceries = service.create(alice, "Groceries").await.unwrap();

        assert!(matches!(
            service.delete(groceries.id, bob).await,
            Err(ServiceError::NotFound("category"))
        ));
        assert!(matches!(
            service.delete(global.id, alice).await,
            Err(ServiceError::NotFound("category"))
        ));
        service.delete(groceries.id, alice).await.unwrap();
        assert_eq!(service.list(alice).await.unwrap().len(), 1);
    }
}
