//! Page components

mod claim_detail;
mod dashboard;
mod home;
mod login;
mod register;
mod upload;

pub use claim_detail::ClaimDetail;
pub use dashboard::Dashboard;
pub use home::Home;
pub use login::Login;
pub use register::Register;
pub use upload::Upload;
