//! Polymorphic references (comment targets, favorites) as a tagged kind + id.

use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MorphKind {
    Trip,
    TripDiary,
    ItineraryItem,
    MapCheckpoint,
    CheckpointImage,
    Place,
}

/// Kinds a comment may attach to.
pub const COMMENTABLE: &[MorphKind] = &[
    MorphKind::Trip,
    MorphKind::TripDiary,
    MorphKind::ItineraryItem,
    MorphKind::MapCheckpoint,
    MorphKind::CheckpointImage,
];

/// Kinds a user may favorite.
pub const FAVORITABLE: &[MorphKind] = &[
    MorphKind::Trip,
    MorphKind::Place,
    MorphKind::ItineraryItem,
    MorphKind::MapCheckpoint,
];

impl MorphKind {
    pub const ALL: [MorphKind; 6] = [
        MorphKind::Trip,
        MorphKind::TripDiary,
        MorphKind::ItineraryItem,
        MorphKind::MapCheckpoint,
        MorphKind::CheckpointImage,
        MorphKind::Place,
    ];

    /// Value stored in the `*_type` column.
    pub fn alias(self) -> &'static str {
        match self {
            MorphKind::Trip => "trip",
            MorphKind::TripDiary => "trip_diary",
            MorphKind::ItineraryItem => "itinerary_item",
            MorphKind::MapCheckpoint => "map_checkpoint",
            MorphKind::CheckpointImage => "checkpoint_image",
            MorphKind::Place => "place",
        }
    }

    pub fn model(self) -> &'static str {
        match self {
            MorphKind::Trip => "Trip",
            MorphKind::TripDiary => "TripDiary",
            MorphKind::ItineraryItem => "ItineraryItem",
            MorphKind::MapCheckpoint => "MapCheckpoint",
            MorphKind::CheckpointImage => "CheckpointImage",
            MorphKind::Place => "Place",
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            MorphKind::Trip => "trips",
            MorphKind::TripDiary => "trip_diaries",
            MorphKind::ItineraryItem => "itinerary_items",
            MorphKind::MapCheckpoint => "map_checkpoints",
            MorphKind::CheckpointImage => "checkpoint_images",
            MorphKind::Place => "places",
        }
    }

    /// Accepts the alias (`trip_diary`), the model name (`TripDiary`) or a
    /// namespaced class name (`App\Models\TripDiary`).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let last = s.rsplit('\\').next().unwrap_or(s);
        MorphKind::ALL
            .into_iter()
            .find(|k| k.alias() == last || k.model().eq_ignore_ascii_case(last))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MorphRef {
    pub kind: MorphKind,
    pub id: i64,
}

impl MorphRef {
    /// Build from the raw type/id values of a form, restricted to `allowed` kinds.
    pub fn from_values(type_value: &Value, id_value: &Value, allowed: &[MorphKind]) -> Result<Self, MorphError> {
        let raw = type_value.as_str().ok_or(MorphError::MissingType)?;
        let kind = MorphKind::parse(raw).ok_or_else(|| MorphError::UnknownType(raw.to_string()))?;
        if !allowed.contains(&kind) {
            return Err(MorphError::NotAllowed(kind));
        }
        let id = match id_value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .filter(|id| *id > 0)
        .ok_or(MorphError::InvalidId)?;
        Ok(MorphRef { kind, id })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MorphError {
    #[error("a target type is required")]
    MissingType,
    #[error("unknown target type '{0}'")]
    UnknownType(String),
    #[error("{} records cannot be targeted here", .0.model())]
    NotAllowed(MorphKind),
    #[error("the target id must be a positive integer")]
    InvalidId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_alias_model_and_class_name() {
        assert_eq!(MorphKind::parse("trip_diary"), Some(MorphKind::TripDiary));
        assert_eq!(MorphKind::parse("MapCheckpoint"), Some(MorphKind::MapCheckpoint));
        assert_eq!(MorphKind::parse("App\\Models\\Place"), Some(MorphKind::Place));
        assert_eq!(MorphKind::parse("App\\Models\\User"), None);
    }

    #[test]
    fn morph_ref_from_form_values() {
        let r = MorphRef::from_values(&json!("App\\Models\\Trip"), &json!("12"), COMMENTABLE).unwrap();
        assert_eq!(r, MorphRef { kind: MorphKind::Trip, id: 12 });
    }

    #[test]
    fn morph_ref_rejects_disallowed_kind() {
        let err = MorphRef::from_values(&json!("checkpoint_image"), &json!(3), FAVORITABLE).unwrap_err();
        assert_eq!(err, MorphError::NotAllowed(MorphKind::CheckpointImage));
        assert_eq!(err.to_string(), "CheckpointImage records cannot be targeted here");
    }

    #[test]
    fn morph_ref_rejects_bad_ids() {
        assert_eq!(
            MorphRef::from_values(&json!("trip"), &json!("abc"), COMMENTABLE),
            Err(MorphError::InvalidId)
        );
        assert_eq!(
            MorphRef::from_values(&json!("trip"), &json!(0), COMMENTABLE),
            Err(MorphError::InvalidId)
        );
        assert_eq!(
            MorphRef::from_values(&json!(null), &json!(1), COMMENTABLE),
            Err(MorphError::MissingType)
        );
    }
}
