use crate::config::Config;

/// A named feed origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub url: String,
}

/// The fixed set of sources, in configuration order.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    sources: Vec<Source>,
}

impl SourceRegistry {
    pub fn from_config(config: &Config) -> Self {
        let sources = config
            .feeds
            .iter()
            .map(|feed| Source {
                name: feed.name.trim().to_string(),
                url: feed.url.trim().to_string(),
            })
            .collect();

        Self { sources }
    }

    pub fn get(&self, name: &str) -> Option<&Source> {
        self.sources.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
