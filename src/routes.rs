//! Path to page resolution. The root path renders the task page; everything
//! else falls through to the not-found page.

pub const HOME_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Tasks,
    NotFound,
}

pub fn resolve(path: &str) -> Page {
    if path == HOME_PATH {
        Page::Tasks
    } else {
        Page::NotFound
    }
}

/// Data for the not-found page; rendering is the host's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFoundView {
    pub heading: &'static str,
    pub message: &'static str,
    pub link_label: &'static str,
    pub home_path: &'static str,
}

impl Default for NotFoundView {
    fn default() -> Self {
        Self {
            heading: "404",
            message: "Oops! Page not found.",
            link_label: "Go back home",
            home_path: HOME_PATH,
        }
    }
}
