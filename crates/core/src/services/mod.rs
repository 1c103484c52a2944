//! Business-logic services.

pub mod account;
pub mod action;
pub mod contact;
pub mod image;

pub use account::{AccountService, EditProfileInput, RegisterInput};
pub use action::{ActionService, FeedActor, FeedItem, FeedTarget};
pub use contact::ContactService;
pub use image::{CreateImageInput, ImagePage, ImageService};
