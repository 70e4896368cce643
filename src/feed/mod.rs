pub mod continuation;
pub mod extract;
pub mod post;
pub mod renderer;
pub mod transport;
pub mod walker;

pub use post::Post;
pub use walker::Scraper;
