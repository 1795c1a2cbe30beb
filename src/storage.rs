use std::collections::HashMap;
use std::fs;
use std::path::Path;

use dashmap::DashMap;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::error::Result;
use crate::models::Tag;

lazy_static! {
    static ref TAG_NAME_REGEX: Regex = Regex::new(r"^[a-z0-9_-]+$").unwrap();
}

// Normalizes the tag name. Returns None for names that can't be a tag.
pub fn normalize_tag_name(name: &str) -> Option<String> {
    let name = name.trim().to_lowercase();
    match TAG_NAME_REGEX.is_match(&name) {
        true => Some(name),
        false => None,
    }
}

#[derive(Debug, Default)]
pub struct TagStore {
    tags: DashMap<String, Tag>,
}

impl TagStore {
    pub fn new() -> Self {
        TagStore {
            tags: DashMap::new(),
        }
    }

    // Loads tags from a JSON object of `name -> {title, body}`. A missing file
    // gives an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        let store = TagStore::new();
        if !path.exists() {
            warn!("The tags file {} doesn't exist; no tags loaded.", path.display());
            return Ok(store);
        }

        let content = fs::read_to_string(path)?;
        let raw_tags: HashMap<String, Tag> = serde_json::from_str(&content)?;
        for (name, tag) in raw_tags {
            if !store.insert(&name, tag) {
                warn!("Skipping the tag with invalid name '{}'.", name);
            }
        }

        info!("Loaded {} tag(s) from {}", store.len(), path.display());
        Ok(store)
    }

    // Adds a tag. Returns false when the name isn't valid.
    pub fn insert(&self, name: &str, tag: Tag) -> bool {
        match normalize_tag_name(name) {
            Some(name) => {
                self.tags.insert(name, tag);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<Tag> {
        let name = normalize_tag_name(name)?;
        self.tags.get(&name).map(|pair| pair.value().clone())
    }

    // Returns all tag names in alphabetical order.
    pub fn names(&self) -> Vec<String> {
        let mut names = self
            .tags
            .iter()
            .map(|pair| pair.key().clone())
            .collect::<Vec<String>>();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
