use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;
use uuid::Uuid;

use recipesaver_core::errors::{Error, Result};
use recipesaver_core::recipes::{Recipe, RecipeDraft, RecipeRepositoryTrait, RecipeUpdate};
use recipesaver_core::search::RecipeFilter;

use super::model::{NewRecipeDB, RecipeChangesetDB, RecipeDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::recipes;

pub struct RecipeRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl RecipeRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        RecipeRepository { pool, writer }
    }

    fn list_impl(&self, owner: &str, filter: &RecipeFilter) -> Result<Vec<Recipe>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = recipes::table
            .filter(recipes::owner_id.eq(owner))
            .select(RecipeDB::as_select())
            .into_boxed();

        // SQLite LIKE folds ASCII case only; other terms are matched below.
        let sql_text = filter.text.as_deref().filter(|t| t.is_ascii());
        if let Some(text) = sql_text {
            let pattern = format!("%{}%", escape_like(text));
            query = query.filter(
                recipes::title
                    .like(pattern.clone())
                    .escape('\\')
                    .or(recipes::description.like(pattern).escape('\\')),
            );
        }
        if let Some(category) = filter.category {
            query = query.filter(recipes::category.eq(category.as_str()));
        }

        let rows = query
            .order((recipes::created_at.desc(), recipes::id.asc()))
            .load::<RecipeDB>(&mut conn)
            .map_err(StorageError::from)?;

        let mut result = rows
            .into_iter()
            .map(Recipe::try_from)
            .collect::<Result<Vec<Recipe>>>()?;
        if filter.text.is_some() && sql_text.is_none() {
            result.retain(|r| filter.matches(r));
        }
        Ok(result)
    }

    fn get_impl(&self, owner: &str, recipe_id: &str) -> Result<Recipe> {
        let mut conn = get_connection(&self.pool)?;
        let row = recipes::table
            .filter(recipes::owner_id.eq(owner))
            .filter(recipes::id.eq(recipe_id))
            .select(RecipeDB::as_select())
            .first::<RecipeDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .ok_or_else(|| Error::not_found(format!("Recipe {}", recipe_id)))?;
        Recipe::try_from(row)
    }
}

#[async_trait]
impl RecipeRepositoryTrait for RecipeRepository {
    async fn list(&self, owner_id: &str, filter: &RecipeFilter) -> Result<Vec<Recipe>> {
        self.list_impl(owner_id, filter)
    }

    async fn get(&self, owner_id: &str, recipe_id: &str) -> Result<Recipe> {
        self.get_impl(owner_id, recipe_id)
    }

    async fn insert(&self, owner_id: &str, draft: RecipeDraft) -> Result<Recipe> {
        let owner = owner_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Recipe> {
                let new_row = NewRecipeDB::from_draft(
                    Uuid::new_v4().to_string(),
                    owner,
                    draft,
                    Utc::now().naive_utc(),
                )?;
                let row = diesel::insert_into(recipes::table)
                    .values(&new_row)
                    .returning(RecipeDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                debug!("Inserted recipe {}", row.id);
                Recipe::try_from(row)
            })
            .await
    }

    async fn update(
        &self,
        owner_id: &str,
        recipe_id: &str,
        update: RecipeUpdate,
    ) -> Result<Recipe> {
        let owner = owner_id.to_string();
        let target = recipe_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Recipe> {
                let changes = RecipeChangesetDB::from_update(&update, Utc::now().naive_utc())?;
                let row = diesel::update(
                    recipes::table
                        .filter(recipes::owner_id.eq(&owner))
                        .filter(recipes::id.eq(&target)),
                )
                .set(&changes)
                .returning(RecipeDB::as_returning())
                .get_result(conn)
                .optional()
                .map_err(StorageError::from)?
                .ok_or_else(|| Error::not_found(format!("Recipe {}", target)))?;
                Recipe::try_from(row)
            })
            .await
    }
}

/// Escapes LIKE wildcards so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use crate::users::UserRepository;
    use recipesaver_core::recipes::{Category, NewRecipe};
    use recipesaver_core::search::{CategoryFilter, SearchQuery};
    use recipesaver_core::users::{NewUser, UserRepositoryTrait};
    use tempfile::tempdir;

    /// Creates a repository on a temp database with one registered owner.
    /// Returns the repository, the owner id, and the temp dir (to keep it alive).
    async fn create_test_repository() -> (RecipeRepository, String, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let db_path_str = db_path.to_string_lossy().to_string();

        let pool = create_pool(&db_path_str).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());

        let users = UserRepository::new(Arc::clone(&pool), writer.clone());
        let owner = users
            .create(NewUser {
                email: "cook@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .expect("Failed to create owner");

        (RecipeRepository::new(pool, writer), owner.id, temp_dir)
    }

    fn draft(title: &str, description: &str, category: Option<Category>) -> RecipeDraft {
        NewRecipe {
            title: title.to_string(),
            description: Some(description.to_string()),
            category,
            ..Default::default()
        }
        .into_draft()
        .unwrap()
    }

    async fn seed(repo: &RecipeRepository, owner: &str) -> Vec<Recipe> {
        let mut created = Vec::new();
        for (title, description, category) in [
            ("Chocolate cake", "Rich and dark", Some(Category::Dessert)),
            ("Banana bread", "With a hint of choc", Some(Category::Breakfast)),
            ("Lemon tart", "Zesty", Some(Category::Dessert)),
            ("Plain toast", "", None),
        ] {
            created.push(repo.insert(owner, draft(title, description, category)).await.unwrap());
            // Distinct timestamps keep the expected order stable.
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        created
    }

    fn titles(recipes: &[Recipe]) -> Vec<&str> {
        recipes.iter().map(|r| r.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_defaults() {
        let (repo, owner, _dir) = create_test_repository().await;
        let recipe = repo
            .insert(
                &owner,
                NewRecipe {
                    title: "Cookies".to_string(),
                    ingredients: vec![
                        "".to_string(),
                        "Flour".to_string(),
                        " ".to_string(),
                        "Sugar".to_string(),
                    ],
                    ..Default::default()
                }
                .into_draft()
                .unwrap(),
            )
            .await
            .unwrap();

        assert!(!recipe.id.is_empty());
        assert_eq!(recipe.owner_id, owner);
        assert_eq!(recipe.servings, 1);
        assert!(!recipe.is_favorite);
        assert_eq!(recipe.created_at, recipe.updated_at);

        let stored = repo.get(&owner, &recipe.id).await.unwrap();
        assert_eq!(stored.ingredients, vec!["Flour".to_string(), "Sugar".to_string()]);
    }

    #[tokio::test]
    async fn test_list_without_filter_is_newest_first() {
        let (repo, owner, _dir) = create_test_repository().await;
        seed(&repo, &owner).await;

        let all = repo.list(&owner, &RecipeFilter::all()).await.unwrap();
        assert_eq!(
            titles(&all),
            vec!["Plain toast", "Lemon tart", "Banana bread", "Chocolate cake"]
        );
    }

    #[tokio::test]
    async fn test_list_with_term_and_category() {
        let (repo, owner, _dir) = create_test_repository().await;
        seed(&repo, &owner).await;

        let filter = SearchQuery::new("CHOC", CategoryFilter::Only(Category::Dessert)).to_filter();
        let found = repo.list(&owner, &filter).await.unwrap();
        assert_eq!(titles(&found), vec!["Chocolate cake"]);

        let filter = SearchQuery::new("choc", CategoryFilter::All).to_filter();
        let found = repo.list(&owner, &filter).await.unwrap();
        assert_eq!(titles(&found), vec!["Banana bread", "Chocolate cake"]);
    }

    #[tokio::test]
    async fn test_like_wildcards_match_literally() {
        let (repo, owner, _dir) = create_test_repository().await;
        seed(&repo, &owner).await;
        repo.insert(&owner, draft("100% rye", "", None)).await.unwrap();

        let filter = SearchQuery::new("%", CategoryFilter::All).to_filter();
        let found = repo.list(&owner, &filter).await.unwrap();
        assert_eq!(titles(&found), vec!["100% rye"]);
    }

    #[tokio::test]
    async fn test_non_ascii_term_matches_case_insensitively() {
        let (repo, owner, _dir) = create_test_repository().await;
        repo.insert(&owner, draft("Crème brûlée", "", Some(Category::Dessert)))
            .await
            .unwrap();

        let filter = SearchQuery::new("BRÛLÉE", CategoryFilter::All).to_filter();
        let found = repo.list(&owner, &filter).await.unwrap();
        assert_eq!(titles(&found), vec!["Crème brûlée"]);
    }

    #[tokio::test]
    async fn test_other_owner_sees_nothing() {
        let (repo, owner, _dir) = create_test_repository().await;
        let created = seed(&repo, &owner).await;

        assert!(repo
            .list("someone-else", &RecipeFilter::all())
            .await
            .unwrap()
            .is_empty());
        let err = repo.get("someone-else", &created[0].id).await.unwrap_err();
        assert!(err.is_not_found());
        let err = repo
            .update("someone-else", &created[0].id, RecipeUpdate::favorite(true))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_favorite_and_fields() {
        let (repo, owner, _dir) = create_test_repository().await;
        let created = seed(&repo, &owner).await;
        let target = &created[0];

        let updated = repo
            .update(&owner, &target.id, RecipeUpdate::favorite(true))
            .await
            .unwrap();
        assert!(updated.is_favorite);
        assert_eq!(updated.title, target.title);
        assert_eq!(updated.created_at, target.created_at);
        assert!(updated.updated_at >= target.updated_at);

        let updated = repo
            .update(
                &owner,
                &target.id,
                RecipeUpdate {
                    title: Some("Fudge cake".to_string()),
                    image_url: Some("http://localhost:8080/images/x.png".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Fudge cake");
        assert!(updated.is_favorite);
        assert!(updated.has_photo());

        let cleared = repo
            .update(
                &owner,
                &target.id,
                RecipeUpdate {
                    image_url: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.image_url, None);
    }

    #[tokio::test]
    async fn test_update_missing_recipe_is_not_found() {
        let (repo, owner, _dir) = create_test_repository().await;
        let err = repo
            .update(&owner, "missing", RecipeUpdate::favorite(true))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
