pub mod cashback;
pub mod common;
pub mod home;
pub mod spending;

pub use common::SaveTarget;
