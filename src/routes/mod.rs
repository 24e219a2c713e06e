pub mod excuse;
pub mod home;
