//! Name derivation for resources: model name -> table and slug, field name -> label.

/// Convert a model or field identifier to snake_case.
/// e.g. "TripDiary" -> "trip_diary", "isCompleted" -> "is_completed"
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else if c == '-' || c == ' ' {
            out.push('_');
        } else {
            out.push(c);
        }
    }
    out
}

/// English plural of a lower-case word: "diary" -> "diaries", "box" -> "boxes", "item" -> "items".
pub fn pluralize(word: &str) -> String {
    let ends_with_consonant_y = word.ends_with('y')
        && word
            .chars()
            .rev()
            .nth(1)
            .map(|c| !"aeiou".contains(c))
            .unwrap_or(false);
    if ends_with_consonant_y {
        format!("{}ies", &word[..word.len() - 1])
    } else if ["s", "x", "z", "ch", "sh"].iter().any(|suffix| word.ends_with(suffix)) {
        format!("{}es", word)
    } else {
        format!("{}s", word)
    }
}

/// Table name for a model: snake_case with the last word pluralized.
/// e.g. "ChecklistItem" -> "checklist_items"
pub fn table_for_model(model: &str) -> String {
    let snake = to_snake_case(model);
    match snake.rsplit_once('_') {
        Some((head, last)) => format!("{}_{}", head, pluralize(last)),
        None => pluralize(&snake),
    }
}

/// URL slug for a model: the table name with dashes.
/// e.g. "TripParticipant" -> "trip-participants"
pub fn slug_for_model(model: &str) -> String {
    table_for_model(model).replace('_', "-")
}

/// Human label for a field: words split on underscores, each capitalized.
/// e.g. "is_completed" -> "Is Completed", "lat" -> "Lat"
pub fn headline(s: &str) -> String {
    to_snake_case(s)
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_names_map_to_tables_and_slugs() {
        assert_eq!(table_for_model("ChecklistItem"), "checklist_items");
        assert_eq!(table_for_model("TripDiary"), "trip_diaries");
        assert_eq!(table_for_model("Place"), "places");
        assert_eq!(slug_for_model("TripParticipant"), "trip-participants");
        assert_eq!(slug_for_model("MapCheckpoint"), "map-checkpoints");
    }

    #[test]
    fn plural_rules() {
        assert_eq!(pluralize("diary"), "diaries");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("share"), "shares");
    }

    #[test]
    fn headline_splits_words() {
        assert_eq!(headline("is_completed"), "Is Completed");
        assert_eq!(headline("lat"), "Lat");
        assert_eq!(headline("favoritable_type"), "Favoritable Type");
        assert_eq!(headline("checkedInAt"), "Checked In At");
    }
}
