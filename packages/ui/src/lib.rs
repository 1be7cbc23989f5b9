//! This crate contains all shared UI for the admin client.

use dioxus::prelude::*;

pub mod components;
pub use components::{
    LoadingSpinner, LoginForm, LogoutButton, Navbar, NotificationToast, PaginationBar, SearchBar,
    UserForm, UserTable,
};

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

mod platform;
pub use platform::{make_directory, AppDirectory, BrowserConfirm, PlatformStore, PlatformTimer};

mod provider;
pub use provider::{
    use_directory, use_directory_ready, use_directory_view, DirectoryContext, DirectoryProvider,
};

pub const ADMIN_CSS: Asset = asset!("/assets/styling/admin.css");
