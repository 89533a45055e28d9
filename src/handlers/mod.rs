pub mod auth;
pub mod health;
pub mod posts;
pub mod users;

pub use auth::{login, register};
pub use health::health_check_handler;
pub use posts::{create_post, get_feed_posts, get_user_posts, like_post};
pub use users::{add_remove_friend, get_user, get_user_friends};
