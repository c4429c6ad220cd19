//! String normalisation applied to user input before it is stored.

use unicode_segmentation::UnicodeSegmentation;

/// Capitalise the first letter of every word and lowercase the rest.
///
/// Word boundaries follow Unicode word segmentation, so "fast-food" becomes
/// "Fast-Food" and "eating out" becomes "Eating Out".
pub fn title_case(text: &str) -> String {
    text.split_word_bounds()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Trim `text`, mapping an empty result to `None`.
pub(crate) fn trim_optional(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_owned)
}
