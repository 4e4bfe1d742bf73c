mod model;
mod repository;

pub use model::{NewRecipeDB, RecipeChangesetDB, RecipeDB};
pub use repository::RecipeRepository;
