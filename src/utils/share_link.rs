use url::Url;

/// Shareable URL for the current player view.
///
/// Updating a query parameter only rewrites the stored URL; nothing is
/// navigated or fetched.
#[derive(Debug, Clone)]
pub struct ShareLink {
    url: Url,
}

impl ShareLink {
    pub fn new(base: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            url: Url::parse(base)?,
        })
    }

    /// Replace every `key` pair with a single `key=value`, keeping the
    /// other pairs in order.
    pub fn set(&mut self, key: &str, value: &str) -> String {
        let retained: Vec<(String, String)> = self
            .url
            .query_pairs()
            .filter(|(existing, _)| existing != key)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        {
            let mut pairs = self.url.query_pairs_mut();
            pairs.clear();
            for (k, v) in &retained {
                pairs.append_pair(k, v);
            }
            pairs.append_pair(key, value);
        }

        self.url.to_string()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.into_owned())
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_adds_parameter() {
        let mut link = ShareLink::new("https://clips.example.com/watch").unwrap();
        let url = link.set("v", "v1");

        assert_eq!(url, "https://clips.example.com/watch?v=v1");
        assert_eq!(link.get("v").as_deref(), Some("v1"));
    }

    #[test]
    fn test_set_replaces_and_keeps_others() {
        let mut link = ShareLink::new("https://clips.example.com/watch?list=top&v=old&v=older").unwrap();
        let url = link.set("v", "new");

        assert_eq!(url, "https://clips.example.com/watch?list=top&v=new");
    }

    #[test]
    fn test_value_is_encoded() {
        let mut link = ShareLink::new("http://localhost/").unwrap();
        link.set("v", "a b&c");

        assert_eq!(link.as_str(), "http://localhost/?v=a+b%26c");
        assert_eq!(link.get("v").as_deref(), Some("a b&c"));
    }

    #[test]
    fn test_invalid_base() {
        assert!(ShareLink::new("not a url").is_err());
    }
}
