mod handler;
mod model;

pub use handler::{login, login_post, logout_post, signup, signup_post};
pub use model::{UserLoginForm, UserSignupForm};
