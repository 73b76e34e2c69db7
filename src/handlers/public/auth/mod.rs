// Session lifecycle: the login form, credential submission and logout.
pub mod session;

pub use session::{login, login_form, logout};
