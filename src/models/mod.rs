pub mod post;
pub mod user;

pub use post::{LikePostRequest, Post, PostError, PostResponse};
pub use user::{FriendResponse, LoginRequest, NewUser, User, UserError, UserResponse};
