//! Tests for recipe domain models.

#[cfg(test)]
mod tests {
    use crate::recipes::{clean_ingredients, Category, NewRecipe, Recipe, RecipeUpdate};
    use chrono::NaiveDateTime;

    fn sample_recipe(instructions: &str) -> Recipe {
        let ts = NaiveDateTime::parse_from_str("2024-03-01 12:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        Recipe {
            id: "r1".to_string(),
            owner_id: "u1".to_string(),
            title: "Pancakes".to_string(),
            description: "Fluffy".to_string(),
            ingredients: vec!["Flour".to_string()],
            instructions: instructions.to_string(),
            prep_time: 10,
            cook_time: 15,
            servings: 4,
            category: Some(Category::Breakfast),
            image_url: None,
            is_favorite: false,
            created_at: ts,
            updated_at: ts,
        }
    }

    // ==================== Category ====================

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!("dessert".parse::<Category>().unwrap(), Category::Dessert);
        assert_eq!(" Snack ".parse::<Category>().unwrap(), Category::Snack);
        assert!("All".parse::<Category>().is_err());
        assert!("Brunch".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serialization() {
        assert_eq!(
            serde_json::to_string(&Category::Dinner).unwrap(),
            "\"Dinner\""
        );
        assert_eq!(
            serde_json::from_str::<Category>("\"Lunch\"").unwrap(),
            Category::Lunch
        );
    }

    // ==================== NewRecipe ====================

    #[test]
    fn test_blank_ingredients_are_dropped() {
        let cleaned = clean_ingredients(vec![
            "".to_string(),
            "Flour".to_string(),
            " ".to_string(),
            "Sugar".to_string(),
        ]);
        assert_eq!(cleaned, vec!["Flour".to_string(), "Sugar".to_string()]);
    }

    #[test]
    fn test_ingredients_keep_order_duplicates_and_text() {
        let cleaned = clean_ingredients(vec![
            " 2 eggs".to_string(),
            "\t".to_string(),
            "Salt".to_string(),
            "Salt".to_string(),
        ]);
        assert_eq!(
            cleaned,
            vec![" 2 eggs".to_string(), "Salt".to_string(), "Salt".to_string()]
        );
    }

    #[test]
    fn test_draft_applies_defaults() {
        let draft = NewRecipe {
            title: "Toast".to_string(),
            ingredients: vec!["".to_string(), "Bread".to_string()],
            image_url: Some("".to_string()),
            ..Default::default()
        }
        .into_draft()
        .unwrap();

        assert_eq!(draft.description, "");
        assert_eq!(draft.instructions, "");
        assert_eq!(draft.prep_time, 0);
        assert_eq!(draft.cook_time, 0);
        assert_eq!(draft.servings, 1);
        assert_eq!(draft.category, None);
        assert_eq!(draft.image_url, None);
        assert_eq!(draft.ingredients, vec!["Bread".to_string()]);
    }

    #[test]
    fn test_zero_servings_falls_back_to_one() {
        let draft = NewRecipe {
            title: "Soup".to_string(),
            servings: Some(0),
            ..Default::default()
        }
        .into_draft()
        .unwrap();
        assert_eq!(draft.servings, 1);
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let result = NewRecipe {
            title: "   ".to_string(),
            ..Default::default()
        }
        .into_draft();
        assert!(matches!(result, Err(crate::Error::Validation(_))));
    }

    #[test]
    fn test_new_recipe_deserializes_with_missing_optionals() {
        let json = r#"{"title":"Cake","ingredients":["", "Eggs"],"category":"Dessert"}"#;
        let new_recipe: NewRecipe = serde_json::from_str(json).unwrap();
        let draft = new_recipe.into_draft().unwrap();
        assert_eq!(draft.category, Some(Category::Dessert));
        assert_eq!(draft.ingredients, vec!["Eggs".to_string()]);
    }

    // ==================== RecipeUpdate ====================

    #[test]
    fn test_empty_update_is_rejected() {
        assert!(RecipeUpdate::default().normalize().is_err());
    }

    #[test]
    fn test_update_cleans_ingredients_and_servings() {
        let update = RecipeUpdate {
            ingredients: Some(vec!["".to_string(), "Milk".to_string()]),
            servings: Some(0),
            ..Default::default()
        }
        .normalize()
        .unwrap();
        assert_eq!(update.ingredients, Some(vec!["Milk".to_string()]));
        assert_eq!(update.servings, Some(1));
    }

    #[test]
    fn test_update_with_blank_title_is_rejected() {
        let update = RecipeUpdate {
            title: Some("".to_string()),
            ..Default::default()
        };
        assert!(update.normalize().is_err());
    }

    #[test]
    fn test_image_url_change() {
        assert_eq!(RecipeUpdate::default().image_url_change(), None);
        let clear = RecipeUpdate {
            image_url: Some(" ".to_string()),
            ..Default::default()
        };
        assert_eq!(clear.image_url_change(), Some(None));
        let set = RecipeUpdate {
            image_url: Some("http://x/images/a.png".to_string()),
            ..Default::default()
        };
        assert_eq!(
            set.image_url_change(),
            Some(Some("http://x/images/a.png".to_string()))
        );
    }

    // ==================== Recipe ====================

    #[test]
    fn test_total_time() {
        assert_eq!(sample_recipe("").total_time(), 25);
    }

    #[test]
    fn test_instruction_paragraphs_skip_blank_lines() {
        let recipe = sample_recipe("Mix.\n\n  \nBake.\n");
        assert_eq!(recipe.instruction_paragraphs(), vec!["Mix.", "Bake."]);
    }

    #[test]
    fn test_recipe_serializes_camel_case() {
        let json = serde_json::to_value(sample_recipe("Mix.")).unwrap();
        assert_eq!(json["isFavorite"], false);
        assert_eq!(json["prepTime"], 10);
        assert_eq!(json["category"], "Breakfast");
    }
}
