use super::{Property, PropertySubscriber};
use crate::config::UiConfig;
use crate::constants::{DISLIKE_PREFIX, LIKE_PREFIX, TITLE_SEPARATOR};
use crate::models::Vote;
use crate::utils::safe_text;

/// Text target that can be hidden when its value is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    pub text: String,
    pub visible: bool,
}

/// The player's view targets.
///
/// Every setter that takes caller text runs it through [`safe_text`], so
/// nothing written here can be interpreted as markup by a renderer.
/// Optional targets are `None` when the layout does not provide them and
/// writes to them are silently skipped.
#[derive(Debug, Clone)]
pub struct PlayerViewModel {
    title: Property<String>,
    description: Property<String>,
    tags: Property<Vec<String>>,
    year: Option<Property<Field>>,
    map: Option<Property<Field>>,
    status: Option<Property<String>>,
    likes: Option<Property<String>>,
    dislikes: Option<Property<String>>,
    active_vote: Property<Option<Vote>>,
    share_url: Property<String>,
}

/// Plain copy of every target, for rendering or assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub year: Option<Field>,
    pub map: Option<Field>,
    pub status: Option<String>,
    pub likes: Option<String>,
    pub dislikes: Option<String>,
    pub active_vote: Option<Vote>,
    pub share_url: String,
}

impl PlayerViewModel {
    pub fn new(layout: UiConfig) -> Self {
        Self {
            title: Property::new(String::new(), "title"),
            description: Property::new(String::new(), "description"),
            tags: Property::new(Vec::new(), "tags"),
            year: layout.year.then(|| Property::new(Field::default(), "year")),
            map: layout.map.then(|| Property::new(Field::default(), "map")),
            status: layout.status.then(|| Property::new(String::new(), "status")),
            likes: layout.voting.then(|| Property::new(String::new(), "likes")),
            dislikes: layout.voting.then(|| Property::new(String::new(), "dislikes")),
            active_vote: Property::new(None, "active_vote"),
            share_url: Property::new(String::new(), "share_url"),
        }
    }

    pub fn title(&self) -> &Property<String> {
        &self.title
    }

    pub fn description(&self) -> &Property<String> {
        &self.description
    }

    pub fn tags(&self) -> &Property<Vec<String>> {
        &self.tags
    }

    pub fn year(&self) -> Option<&Property<Field>> {
        self.year.as_ref()
    }

    pub fn map(&self) -> Option<&Property<Field>> {
        self.map.as_ref()
    }

    pub fn status(&self) -> Option<&Property<String>> {
        self.status.as_ref()
    }

    pub fn likes(&self) -> Option<&Property<String>> {
        self.likes.as_ref()
    }

    pub fn dislikes(&self) -> Option<&Property<String>> {
        self.dislikes.as_ref()
    }

    pub fn active_vote(&self) -> &Property<Option<Vote>> {
        &self.active_vote
    }

    pub fn share_url(&self) -> &Property<String> {
        &self.share_url
    }

    /// Both vote targets are present.
    pub fn has_vote_controls(&self) -> bool {
        self.likes.is_some() && self.dislikes.is_some()
    }

    pub fn subscribe_to_property(&self, property_name: &str) -> Option<PropertySubscriber> {
        match property_name {
            "title" => Some(self.title.subscribe()),
            "description" => Some(self.description.subscribe()),
            "tags" => Some(self.tags.subscribe()),
            "year" => self.year.as_ref().map(Property::subscribe),
            "map" => self.map.as_ref().map(Property::subscribe),
            "status" => self.status.as_ref().map(Property::subscribe),
            "likes" => self.likes.as_ref().map(Property::subscribe),
            "dislikes" => self.dislikes.as_ref().map(Property::subscribe),
            "active_vote" => Some(self.active_vote.subscribe()),
            "share_url" => Some(self.share_url.subscribe()),
            _ => None,
        }
    }

    /// Write `"<title> | <suffix>"`. The suffix is produced by the player
    /// itself and is not escaped.
    pub fn set_title(&self, title: &str, suffix: &str) {
        self.title
            .set(format!("{}{}{}", safe_text(title), TITLE_SEPARATOR, suffix));
    }

    pub fn set_description(&self, description: &str) {
        self.description.set(safe_text(description));
    }

    /// Replace all tag pills. An empty slice clears them.
    pub fn set_tags(&self, tags: &[String]) {
        self.tags
            .set(tags.iter().map(|tag| safe_text(tag)).collect());
    }

    pub fn set_year(&self, year: Option<&str>) {
        Self::show_optional(self.year.as_ref(), year);
    }

    pub fn set_map(&self, map: Option<&str>) {
        Self::show_optional(self.map.as_ref(), map);
    }

    /// Returns false when the layout has no status target.
    pub fn set_status(&self, message: &str) -> bool {
        match &self.status {
            Some(status) => {
                status.set(safe_text(message));
                true
            }
            None => false,
        }
    }

    pub fn set_vote_counts(&self, likes: u64, dislikes: u64) {
        if let Some(target) = &self.likes {
            target.set(format!("{} {}", LIKE_PREFIX, likes));
        }
        if let Some(target) = &self.dislikes {
            target.set(format!("{} {}", DISLIKE_PREFIX, dislikes));
        }
    }

    pub fn set_active_vote(&self, vote: Option<Vote>) {
        self.active_vote.set(vote);
    }

    pub fn set_share_url(&self, url: String) {
        self.share_url.set(url);
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            title: self.title.get(),
            description: self.description.get(),
            tags: self.tags.get(),
            year: self.year.as_ref().map(Property::get),
            map: self.map.as_ref().map(Property::get),
            status: self.status.as_ref().map(Property::get),
            likes: self.likes.as_ref().map(Property::get),
            dislikes: self.dislikes.as_ref().map(Property::get),
            active_vote: self.active_vote.get(),
            share_url: self.share_url.get(),
        }
    }

    fn show_optional(target: Option<&Property<Field>>, value: Option<&str>) {
        let Some(target) = target else {
            return;
        };
        match value {
            Some(text) => target.set(Field {
                text: safe_text(text),
                visible: true,
            }),
            None => target.set(Field::default()),
        }
    }
}
