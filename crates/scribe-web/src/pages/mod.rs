//! Page Components

mod consult;
mod home;
mod login;
mod outcome;
mod upgrade;

pub use consult::ConsultPage;
pub use home::HomePage;
pub use login::LoginPage;
pub use outcome::{CancelledPage, SuccessPage};
pub use upgrade::UpgradePage;
