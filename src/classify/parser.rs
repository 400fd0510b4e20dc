use crate::dataset::Category;
use regex::Regex;

/// Strip quoting, list markers and trailing punctuation the model tends to
/// wrap the label in.
fn sanitize_reply(reply: &str) -> String {
    let re = Regex::new(r#"^[\s「『"'\-*]+|[\s」』"'。、:：]+$"#).unwrap();
    re.replace_all(reply, "").to_string()
}

/// Map the free-text completion back onto the closed label set. The service
/// is asked for the bare name, but replies show up wrapped in quotes,
/// brackets or short sentences, so matching is lenient: exact match after
/// trimming decoration, then a unique-substring match, then give up.
pub fn parse_category(reply: &str) -> Option<Category> {
    let trimmed = sanitize_reply(reply);
    let trimmed = trimmed.as_str();
    if trimmed.is_empty() {
        return None;
    }

    for label in Category::LABELS {
        if trimmed == label.as_str() {
            return Some(label);
        }
    }

    let mut hit = None;
    for label in Category::LABELS {
        if trimmed.contains(label.as_str()) {
            if hit.is_some() {
                // Ambiguous reply naming several labels.
                return None;
            }
            hit = Some(label);
        }
    }
    hit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_label() {
        assert_eq!(parse_category("モチベ系"), Some(Category::Motivation));
    }

    #[test]
    fn quoted_label() {
        assert_eq!(parse_category("「記録系」"), Some(Category::TrainingLog));
        assert_eq!(parse_category("  食事・栄養系。 "), Some(Category::Nutrition));
    }

    #[test]
    fn label_inside_sentence() {
        assert_eq!(
            parse_category("このツイートは情報系に分類されます"),
            Some(Category::Information)
        );
    }

    #[test]
    fn ambiguous_or_unknown_is_none() {
        assert_eq!(parse_category("モチベ系または雑談系"), None);
        assert_eq!(parse_category("スポーツ系"), None);
        assert_eq!(parse_category(""), None);
    }
}
