use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Columns of the `game_ideas` table that the UI knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Title,
    Genre,
    Mechanics,
    Story,
    ArtStyle,
    Audience,
    Usp,
    Platforms,
    Scope,
    Monetization,
    Inspirations,
    Notes,
}

impl FieldKey {
    /// Column name on the wire.
    pub fn column(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Genre => "genre",
            Self::Mechanics => "mechanics",
            Self::Story => "story",
            Self::ArtStyle => "art_style",
            Self::Audience => "audience",
            Self::Usp => "usp",
            Self::Platforms => "platforms",
            Self::Scope => "scope",
            Self::Monetization => "monetization",
            Self::Inspirations => "inspirations",
            Self::Notes => "notes",
        }
    }

    /// Position in [`FIELDS`].
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One row of the field schema shared by the form, the detail view and inserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: FieldKey,
    pub label: &'static str,
    pub required: bool,
    pub multiline: bool,
}

impl FieldSpec {
    const fn new(key: FieldKey, label: &'static str, required: bool, multiline: bool) -> Self {
        Self {
            key,
            label,
            required,
            multiline,
        }
    }

    pub fn placeholder(&self) -> String {
        format!("Enter {}", self.key.column().replace('_', " "))
    }
}

pub const FIELD_COUNT: usize = 12;

/// Ordered field schema. Order here is display order everywhere.
pub static FIELDS: [FieldSpec; FIELD_COUNT] = [
    FieldSpec::new(FieldKey::Title, "Title", true, false),
    FieldSpec::new(FieldKey::Genre, "Genre", false, false),
    FieldSpec::new(FieldKey::Mechanics, "Mechanics", false, true),
    FieldSpec::new(FieldKey::Story, "Story", false, true),
    FieldSpec::new(FieldKey::ArtStyle, "Art Style", false, false),
    FieldSpec::new(FieldKey::Audience, "Audience", false, false),
    FieldSpec::new(FieldKey::Usp, "USP", false, false),
    FieldSpec::new(FieldKey::Platforms, "Platforms", false, false),
    FieldSpec::new(FieldKey::Scope, "Scope", false, false),
    FieldSpec::new(FieldKey::Monetization, "Monetization", false, false),
    FieldSpec::new(FieldKey::Inspirations, "Inspirations", false, false),
    FieldSpec::new(FieldKey::Notes, "Notes", false, true),
];

/// Placeholder shown for absent optional fields.
pub const NONE_PROVIDED: &str = "None provided";

/// A stored game idea as returned by the table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Idea {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub mechanics: Option<String>,
    #[serde(default)]
    pub story: Option<String>,
    #[serde(default)]
    pub art_style: Option<String>,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub usp: Option<String>,
    #[serde(default)]
    pub platforms: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub monetization: Option<String>,
    #[serde(default)]
    pub inspirations: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Idea {
    /// Raw value of a field, `None` when the column is absent.
    pub fn value(&self, key: FieldKey) -> Option<&str> {
        let slot = match key {
            FieldKey::Title => return Some(self.title.as_str()),
            FieldKey::Genre => &self.genre,
            FieldKey::Mechanics => &self.mechanics,
            FieldKey::Story => &self.story,
            FieldKey::ArtStyle => &self.art_style,
            FieldKey::Audience => &self.audience,
            FieldKey::Usp => &self.usp,
            FieldKey::Platforms => &self.platforms,
            FieldKey::Scope => &self.scope,
            FieldKey::Monetization => &self.monetization,
            FieldKey::Inspirations => &self.inspirations,
            FieldKey::Notes => &self.notes,
        };
        slot.as_deref()
    }

    /// Value for display: blank and absent fields collapse to [`NONE_PROVIDED`].
    pub fn display_value(&self, key: FieldKey) -> Option<&str> {
        self.value(key).filter(|v| !v.trim().is_empty())
    }

    pub fn set(&mut self, key: FieldKey, value: Option<String>) {
        let slot = match key {
            FieldKey::Title => {
                self.title = value.unwrap_or_default();
                return;
            }
            FieldKey::Genre => &mut self.genre,
            FieldKey::Mechanics => &mut self.mechanics,
            FieldKey::Story => &mut self.story,
            FieldKey::ArtStyle => &mut self.art_style,
            FieldKey::Audience => &mut self.audience,
            FieldKey::Usp => &mut self.usp,
            FieldKey::Platforms => &mut self.platforms,
            FieldKey::Scope => &mut self.scope,
            FieldKey::Monetization => &mut self.monetization,
            FieldKey::Inspirations => &mut self.inspirations,
            FieldKey::Notes => &mut self.notes,
        };
        *slot = value;
    }
}

/// Field values typed into the submission form, one string per schema field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdeaDraft {
    values: [String; FIELD_COUNT],
}

impl IdeaDraft {
    pub fn get(&self, key: FieldKey) -> &str {
        &self.values[key.index()]
    }

    pub fn get_mut(&mut self, key: FieldKey) -> &mut String {
        &mut self.values[key.index()]
    }

    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) {
        self.values[key.index()] = value.into();
    }

    pub fn title_is_blank(&self) -> bool {
        self.get(FieldKey::Title).trim().is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(String::is_empty)
    }

    /// Insert payload. Blank optional columns are left out so they read back as absent.
    pub fn to_row(&self) -> Value {
        let mut row = Map::new();
        for spec in &FIELDS {
            let value = self.get(spec.key);
            if spec.required || !value.trim().is_empty() {
                row.insert(spec.key.column().to_string(), Value::String(value.to_string()));
            }
        }
        Value::Object(row)
    }

    /// Combine the submitted values with the identity the store assigned.
    pub fn into_idea(self, id: i64, created_at: Option<DateTime<Utc>>) -> Idea {
        let mut idea = Idea {
            id,
            created_at,
            ..Idea::default()
        };
        for (spec, value) in FIELDS.iter().zip(self.values) {
            let value = if spec.required || !value.trim().is_empty() {
                Some(value)
            } else {
                None
            };
            idea.set(spec.key, value);
        }
        idea
    }
}
