mod dashboard;
pub use dashboard::Dashboard;

mod login;
pub use login::Login;
