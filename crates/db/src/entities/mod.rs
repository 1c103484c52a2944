//! Database entities.

#![allow(missing_docs)]

pub mod action;
pub mod contact;
pub mod image;
pub mod image_like;
pub mod user;
pub mod user_profile;

pub use action::Entity as Action;
pub use contact::Entity as Contact;
pub use image::Entity as Image;
pub use image_like::Entity as ImageLike;
pub use user::Entity as User;
pub use user_profile::Entity as UserProfile;
