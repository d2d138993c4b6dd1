//! # Repository Layer
//!
//! Server actions over the SeaORM entities. Content entities share
//! [`ContentRepository`]; singleton settings share [`SettingsRepository`];
//! products add link management in [`ProductRepository`].

pub mod content;
pub mod notice;
pub mod product;
pub mod settings;

pub use content::{ContentRepository, ContentSchema, Id};
pub use product::{ProductDetail, ProductRecord, ProductRepository};
pub use settings::{SINGLETON_ID, SettingsRepository, SettingsSchema};
