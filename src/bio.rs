//! A crab's bio.

use serde::{Deserialize, Serialize};

/// Free-form profile fields a crab fills in about themselves.
///
/// Every field is optional; an empty bio is all `None`. Use
/// [`Crab::bio`](crate::Crab::bio) to read one and
/// [`Crab::update_bio`](crate::Crab::update_bio) to change the authenticated
/// crab's.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bio {
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "emoji")]
    pub favorite_emoji: Option<String>,
    #[serde(default)]
    pub jam: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub obsession: Option<String>,
    #[serde(default)]
    pub pronouns: Option<String>,
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default, rename = "remember")]
    pub remember_when: Option<String>,
}

impl Bio {
    /// Wire-named form fields for the fields that are set.
    pub(crate) fn to_form_fields(&self) -> Vec<(String, String)> {
        [
            ("age", &self.age),
            ("description", &self.description),
            ("emoji", &self.favorite_emoji),
            ("jam", &self.jam),
            ("location", &self.location),
            ("obsession", &self.obsession),
            ("pronouns", &self.pronouns),
            ("quote", &self.quote),
            ("remember", &self.remember_when),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| (key.to_string(), v.clone())))
        .collect()
    }
}

/// What a crab knows about its bio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BioState {
    /// Not embedded in the crab record and not requested yet.
    NotFetched,
    /// Embedded or fetched.
    Fetched(Bio),
    /// The server has no bio for this crab.
    Absent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_names() {
        let bio: Bio = serde_json::from_value(json!({
            "age": "21",
            "emoji": "🖤",
            "remember": "heelys were cool?",
            "location": null
        }))
        .unwrap();

        assert_eq!(bio.age.as_deref(), Some("21"));
        assert_eq!(bio.favorite_emoji.as_deref(), Some("🖤"));
        assert_eq!(bio.remember_when.as_deref(), Some("heelys were cool?"));
        assert_eq!(bio.location, None);
    }

    #[test]
    fn test_form_fields_skip_unset() {
        let bio = Bio {
            location: Some("In a computer!".to_string()),
            favorite_emoji: Some("🦀".to_string()),
            ..Bio::default()
        };
        assert_eq!(
            bio.to_form_fields(),
            vec![
                ("emoji".to_string(), "🦀".to_string()),
                ("location".to_string(), "In a computer!".to_string()),
            ]
        );
    }
}
