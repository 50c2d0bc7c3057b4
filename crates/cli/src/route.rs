//! Paths of the FlexiGift web app.

use alloy_primitives::U256;
use std::{fmt, str::FromStr};

/// A page of the web app.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Create,
    Redeem(U256),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown route `{0}`")]
pub struct UnknownRoute(String);

impl Route {
    /// Parses a path such as `/redeem/42`. A trailing slash and a query string are ignored.
    pub fn parse(path: &str) -> Result<Self, UnknownRoute> {
        let unknown = || UnknownRoute(path.to_string());
        let trimmed = path.split(['?', '#']).next().unwrap_or_default().trim_end_matches('/');
        let mut segments = trimmed.split('/').skip_while(|segment| segment.is_empty());
        let route = match (segments.next(), segments.next()) {
            (None, _) => Self::Home,
            (Some("create"), None) => Self::Create,
            (Some("redeem"), Some(id)) => {
                Self::Redeem(U256::from_str_radix(id, 10).map_err(|_| unknown())?)
            }
            _ => return Err(unknown()),
        };
        if segments.next().is_some() {
            return Err(unknown());
        }
        Ok(route)
    }

    /// Returns the absolute link of this page under `origin`.
    pub fn link(&self, origin: &str) -> String {
        format!("{}{self}", origin.trim_end_matches('/'))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("/"),
            Self::Create => f.write_str("/create"),
            Self::Redeem(id) => write!(f, "/redeem/{id}"),
        }
    }
}

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Returns the link a recipient opens to redeem gift card `id`.
pub fn share_link(origin: &str, id: U256) -> String {
    Route::Redeem(id).link(origin)
}
