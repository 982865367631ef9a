use super::error::FilterError;

/// Attribute/value pairs taken from a listing request.
///
/// Keys are kept exactly as the client sent them; they are checked against the
/// attribute whitelist only when the predicate is built. A key that appears more
/// than once keeps its first value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    entries: Vec<(String, String)>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw (still percent-encoded) query string such as `name=Acme&country=CY`.
    ///
    /// A parameter with no value (`?name` or `?name=`) is rejected outright.
    pub fn from_query(query: &str) -> Result<Self, FilterError> {
        let mut criteria = Self::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if value.is_empty() {
                return Err(FilterError::MissingValue(key.into_owned()));
            }
            criteria.insert(key.into_owned(), value.into_owned());
        }
        Ok(criteria)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        if !self.entries.iter().any(|(existing, _)| *existing == key) {
            self.entries.push((key, value.into()));
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FilterCriteria
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut criteria = Self::new();
        for (key, value) in iter {
            criteria.insert(key, value);
        }
        criteria
    }
}
