use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SpaceType,
    pub capacity: i32,
}

/// Space payload without a persisted identity; the repository assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpaceDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SpaceType,
    pub capacity: i32,
}

impl SpaceDraft {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("space name must not be empty".to_string());
        }
        if self.capacity < 1 {
            return Err("capacity must be a positive integer".to_string());
        }
        Ok(())
    }

    pub fn into_space(self, id: String) -> Space {
        Space {
            id,
            name: self.name,
            kind: self.kind,
            capacity: self.capacity,
        }
    }
}

/// Open-ended category tag. Tags we don't recognize are kept verbatim so
/// they survive a round-trip through storage and the API unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpaceType {
    Massage,
    Sauna,
    Pool,
    Relax,
    Hammam,
    Spa,
    Other(String),
}

impl SpaceType {
    pub fn as_str(&self) -> &str {
        match self {
            SpaceType::Massage => "MASSAGE",
            SpaceType::Sauna => "SAUNA",
            SpaceType::Pool => "POOL",
            SpaceType::Relax => "RELAX",
            SpaceType::Hammam => "HAMMAM",
            SpaceType::Spa => "SPA",
            SpaceType::Other(tag) => tag,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "MASSAGE" => SpaceType::Massage,
            "SAUNA" => SpaceType::Sauna,
            "POOL" => SpaceType::Pool,
            "RELAX" => SpaceType::Relax,
            "HAMMAM" => SpaceType::Hammam,
            "SPA" => SpaceType::Spa,
            _ => SpaceType::Other(s.to_string()),
        }
    }
}

impl Serialize for SpaceType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SpaceType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(SpaceType::parse(&tag))
    }
}
