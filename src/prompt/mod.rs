mod compose;
mod science;

pub use compose::compose;
pub use science::{article_context, science_prompt};
