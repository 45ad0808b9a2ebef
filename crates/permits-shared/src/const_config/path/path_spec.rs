use reqwest::Method;

use crate::id::DbId;

const ID_PLACEHOLDER: &str = "{id}";

/// An endpoint relative to the API base url
///
/// Paths for a single record contain `{id}` which must be filled in with
/// [`PathSpec::with_id`] before use
#[derive(Debug, Clone)]
pub struct PathSpec {
    pub path: &'static str,
    pub method: Method,
}

/// A [`PathSpec`] with any placeholders filled in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub path: String,
    pub method: Method,
}

impl PathSpec {
    pub const fn get(path: &'static str) -> Self {
        Self {
            path,
            method: Method::GET,
        }
    }

    pub const fn post(path: &'static str) -> Self {
        Self {
            path,
            method: Method::POST,
        }
    }

    pub const fn patch(path: &'static str) -> Self {
        Self {
            path,
            method: Method::PATCH,
        }
    }

    pub const fn put(path: &'static str) -> Self {
        Self {
            path,
            method: Method::PUT,
        }
    }

    pub const fn delete(path: &'static str) -> Self {
        Self {
            path,
            method: Method::DELETE,
        }
    }

    pub fn has_id_placeholder(&self) -> bool {
        self.path.contains(ID_PLACEHOLDER)
    }

    pub fn with_id(&self, id: DbId) -> ResolvedPath {
        debug_assert!(
            self.has_id_placeholder(),
            "id supplied for a path without a placeholder: {}",
            self.path
        );
        ResolvedPath {
            path: self.path.replace(ID_PLACEHOLDER, &id.to_string()),
            method: self.method.clone(),
        }
    }
}

impl From<PathSpec> for ResolvedPath {
    fn from(value: PathSpec) -> Self {
        debug_assert!(
            !value.has_id_placeholder(),
            "path used without filling in the id: {}",
            value.path
        );
        Self {
            path: value.path.to_string(),
            method: value.method,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_substituted() {
        // Arrange
        let spec = PathSpec::post("/chalans/{id}/mark_as_paid/");

        // Act
        let actual = spec.with_id(42.into());

        // Assert
        assert_eq!(actual.path, "/chalans/42/mark_as_paid/");
        assert_eq!(actual.method, Method::POST);
    }

    #[test]
    fn plain_path_converts_unchanged() {
        let actual: ResolvedPath = PathSpec::get("/chalans/statistics/").into();
        assert_eq!(actual.path, "/chalans/statistics/");
        assert_eq!(actual.method, Method::GET);
    }
}
