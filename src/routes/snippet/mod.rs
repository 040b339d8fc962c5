mod handler;
mod model;

pub use handler::{create, create_post, home, view};
pub use model::SnippetCreateForm;
