//! Users module - account models, identity context and repository trait.

mod users_model;
mod users_traits;

pub use users_model::{Credentials, Identity, NewUser, User};
pub use users_traits::UserRepositoryTrait;
