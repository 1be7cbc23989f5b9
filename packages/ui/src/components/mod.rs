mod login_form;
mod navbar;
mod pagination;
mod search_bar;
mod spinner;
mod toast;
mod user_form;
mod user_table;

pub use login_form::LoginForm;
pub use navbar::{LogoutButton, Navbar};
pub use pagination::PaginationBar;
pub use search_bar::SearchBar;
pub use spinner::LoadingSpinner;
pub use toast::NotificationToast;
pub use user_form::UserForm;
pub use user_table::UserTable;
