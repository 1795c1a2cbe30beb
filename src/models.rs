use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub title: String,
    pub body: String,
}

impl Tag {
    pub fn new(title: &str, body: &str) -> Self {
        Tag {
            title: title.to_string(),
            body: body.to_string(),
        }
    }
}
