//! Route table for the storefront views. Every view has one canonical path
//! so pages are deep-linkable; unknown paths fall back to the home page.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    #[default]
    Home,
    About,
    Contact,
    Subscribe,
    Login,
    Signup,
    Cart,
}

pub const ROUTES: &[(&str, Page)] = &[
    ("/", Page::Home),
    ("/about", Page::About),
    ("/contact", Page::Contact),
    ("/subscribe", Page::Subscribe),
    ("/login", Page::Login),
    ("/signup", Page::Signup),
    ("/cart", Page::Cart),
];

impl Page {
    pub fn path(self) -> &'static str {
        ROUTES
            .iter()
            .find(|(_, page)| *page == self)
            .map(|(path, _)| *path)
            .unwrap_or("/")
    }

    /// Ignora query string, fragmento, barra final e maiúsculas
    pub fn resolve(path: &str) -> Page {
        Self::lookup(path).unwrap_or_default()
    }

    /// `None` for paths outside the table
    pub fn lookup(path: &str) -> Option<Page> {
        let path = path.split(&['?', '#'][..]).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };

        ROUTES
            .iter()
            .find(|(route, _)| route.eq_ignore_ascii_case(normalized))
            .map(|(_, page)| *page)
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::About => "About",
            Page::Contact => "Contact",
            Page::Subscribe => "Subscribe",
            Page::Login => "Log In",
            Page::Signup => "Sign Up",
            Page::Cart => "Cart",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
