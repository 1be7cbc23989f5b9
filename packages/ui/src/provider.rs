//! Directory context and hooks for the UI.

use directory::DirectoryView;
use dioxus::prelude::*;
use store::AdminConfig;

use crate::platform::{make_directory, AppDirectory};

/// Controller handle plus a signal mirroring its latest snapshot.
#[derive(Clone)]
pub struct DirectoryContext {
    pub directory: AppDirectory,
    pub view: Signal<DirectoryView>,
    /// Set once the stored session has been looked at.
    pub ready: Signal<bool>,
}

/// Get the shared controller.
pub fn use_directory() -> AppDirectory {
    use_context::<DirectoryContext>().directory
}

/// Get the current snapshot. Re-renders whenever the controller changes
/// state.
pub fn use_directory_view() -> Signal<DirectoryView> {
    use_context::<DirectoryContext>().view
}

/// Whether startup has finished restoring (or failing to restore) the
/// persisted session.
pub fn use_directory_ready() -> Signal<bool> {
    use_context::<DirectoryContext>().ready
}

/// Provider component that owns the directory controller.
/// Wrap your app with this component.
#[component]
pub fn DirectoryProvider(config: AdminConfig, children: Element) -> Element {
    let view = use_signal(DirectoryView::default);
    let ready = use_signal(|| false);

    let context = use_hook(move || {
        let directory = make_directory(&config);
        directory.subscribe(move |snapshot| {
            let mut view = view;
            let mut ready = ready;
            view.set(snapshot.clone());
            if !*ready.peek() {
                ready.set(true);
            }
        });
        // Restore any persisted session on mount
        let startup = directory.clone();
        spawn(async move {
            if let Err(e) = startup.initialize().await {
                tracing::warn!("startup restore failed: {}", e);
            }
        });

        DirectoryContext {
            directory,
            view,
            ready,
        }
    });

    use_context_provider(|| context);

    rsx! {
        {children}
    }
}
