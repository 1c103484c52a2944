//! Database repositories.

mod action;
mod contact;
mod image;
mod user;
mod user_profile;

pub use action::ActionRepository;
pub use contact::ContactRepository;
pub use image::ImageRepository;
pub use user::UserRepository;
pub use user_profile::UserProfileRepository;
