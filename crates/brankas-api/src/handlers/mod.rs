pub mod home;
pub mod token;
pub mod upload;
