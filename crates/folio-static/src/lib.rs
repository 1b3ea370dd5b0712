//! Blog index and static site generator for folio.
//!
//! Builds the blog index from a directory of MDX posts and writes a static
//! site with one page per visible post.

pub mod assets;
pub mod builder;
pub mod index;
pub mod listing;
pub mod posts;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder, RECENT_POSTS};
pub use index::{
    entry_path, enumerate_entries, load_blog_index, BlogEntry, FsMetaLoader, IndexBuilder,
    IndexError, LoadError, MetaLoader, BLOG_ROUTE,
};
pub use listing::{arrange, display_date, listing_items, ListingItem, ListingOptions, Mode};
pub use posts::{render_post, PostError, RenderedPost};
pub use templates::{HomePage, IndexPage, PostPage, SiteContext, TemplateEngine};
