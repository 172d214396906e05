pub mod add;
pub mod common;
pub mod completions;
pub mod config;
pub mod dupe;
pub mod edit;
pub mod list;
pub mod media;
pub mod notetype;
pub mod show;
pub mod tag;
