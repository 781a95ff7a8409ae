//! Route Table
//!
//! Client-side paths and the views they map to.

use std::fmt;
use std::str::FromStr;

/// Conversion tools reachable under `/tools/<tool>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Date,
    Hex,
    Base64,
    Hash,
    String,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Date,
        ToolKind::Hex,
        ToolKind::Base64,
        ToolKind::Hash,
        ToolKind::String,
    ];

    pub const fn slug(&self) -> &'static str {
        match self {
            ToolKind::Date => "date",
            ToolKind::Hex => "hex",
            ToolKind::Base64 => "base64",
            ToolKind::Hash => "hash",
            ToolKind::String => "string",
        }
    }

    fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.slug() == slug)
    }
}

/// A client-side route
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/` - article list
    Home,
    /// `/about`
    About,
    /// `/detail/:id` - article viewer
    Detail { id: String },
    /// `/editor/:id` - markdown editor
    Editor { id: String },
    /// `/tag`
    Tag,
    /// `/tools` - tool index
    Tools,
    /// `/tools/:tool`
    Tool(ToolKind),
}

impl Route {
    /// Route name, unique per variant family
    pub fn name(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::About => "about",
            Route::Detail { .. } => "detail",
            Route::Editor { .. } => "editor",
            Route::Tag => "tag",
            Route::Tools => "tools",
            Route::Tool(_) => "tool",
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::About => "/about".to_string(),
            Route::Detail { id } => format!("/detail/{id}"),
            Route::Editor { id } => format!("/editor/{id}"),
            Route::Tag => "/tag".to_string(),
            Route::Tools => "/tools".to_string(),
            Route::Tool(tool) => format!("/tools/{}", tool.slug()),
        }
    }

    /// Views that only make sense with a session
    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::Editor { .. })
    }

    /// Match a path (query string and fragment ignored)
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(Route::Home),
            ["about"] => Some(Route::About),
            ["detail", id] => Some(Route::Detail { id: id.to_string() }),
            ["editor", id] => Some(Route::Editor { id: id.to_string() }),
            ["tag"] => Some(Route::Tag),
            ["tools"] => Some(Route::Tools),
            ["tools", tool] => ToolKind::from_slug(tool).map(Route::Tool),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s).ok_or_else(|| format!("No route matches {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_routes() {
        assert_eq!(Route::parse("/"), Some(Route::Home));
        assert_eq!(Route::parse(""), Some(Route::Home));
        assert_eq!(Route::parse("/about"), Some(Route::About));
        assert_eq!(
            Route::parse("/detail/42?from=tag"),
            Some(Route::Detail { id: "42".to_string() })
        );
        assert_eq!(
            Route::parse("/editor/new/"),
            Some(Route::Editor { id: "new".to_string() })
        );
        assert_eq!(Route::parse("/tools/base64"), Some(Route::Tool(ToolKind::Base64)));
        assert_eq!(Route::parse("/tools/unknown"), None);
        assert_eq!(Route::parse("/detail"), None);
    }

    #[test]
    fn test_path_roundtrip_for_every_tool() {
        for tool in ToolKind::ALL {
            let route = Route::Tool(tool);
            assert_eq!(route.path().parse::<Route>().unwrap(), route);
        }
    }

    #[test]
    fn test_requires_auth() {
        assert!(Route::Editor { id: "1".to_string() }.requires_auth());
        assert!(!Route::Detail { id: "1".to_string() }.requires_auth());
        assert!(!Route::Home.requires_auth());
    }
}
