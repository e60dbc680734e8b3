//! Keyword heuristics for new items: guess a category from the embed
//! snippet and suggest tags from the title.

const VIDEO_MARKERS: &[&str] = &["youtube", "vimeo", "dailymotion", "video", ".mp4", ".webm"];
const IMAGE_MARKERS: &[&str] = &["image", ".jpg", ".png", ".gif", ".jpeg", ".webp", "photo"];
const DOCUMENT_MARKERS: &[&str] = &["document", ".pdf", "docs.google", ".doc"];
const PRESENTATION_MARKERS: &[&str] = &["presentation", "slides.google", ".ppt", "slideshare"];

const TAG_KEYWORDS: &[(&str, &[&str])] = &[
    ("tutorial", &["learning", "education", "how-to"]),
    ("marketing", &["business", "promotion", "advertising"]),
    ("presentation", &["slides", "meeting", "pitch"]),
    ("demo", &["showcase", "example", "sample"]),
    ("report", &["analysis", "data", "statistics"]),
    ("training", &["course", "workshop", "seminar"]),
];

const MAX_SUGGESTED_TAGS: usize = 3;

pub fn detect_category(embed: &str) -> &'static str {
    let code = embed.to_lowercase();
    if VIDEO_MARKERS.iter().any(|x| code.contains(x)) {
        return "video";
    }
    if IMAGE_MARKERS.iter().any(|x| code.contains(x)) {
        return "image";
    }
    if DOCUMENT_MARKERS.iter().any(|x| code.contains(x)) {
        return "document";
    }
    if PRESENTATION_MARKERS.iter().any(|x| code.contains(x)) {
        return "presentation";
    }
    "other"
}

/// At most three suggestions, comma-joined ready for the tags field.
/// Returns an empty string when no keyword matches.
pub fn suggest_tags(title: &str) -> String {
    let title = title.to_lowercase();
    let mut suggestions: Vec<&str> = Vec::new();
    for (keyword, tags) in TAG_KEYWORDS {
        if title.contains(keyword) {
            suggestions.extend_from_slice(tags);
        }
    }
    suggestions.truncate(MAX_SUGGESTED_TAGS);
    suggestions.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_category_from_markers() {
        assert_eq!(detect_category("<iframe src=\"https://www.youtube.com/embed/x\">"), "video");
        assert_eq!(detect_category("<img src=\"cat.PNG\">"), "image");
        assert_eq!(detect_category("https://docs.google.com/document/d/x"), "document");
        assert_eq!(detect_category("https://slideshare.net/deck"), "presentation");
        assert_eq!(detect_category("<iframe src=\"https://example.com\">"), "other");
    }

    #[test]
    fn video_markers_win_over_later_groups() {
        // "slides.google" also matches presentation markers, "video" wins
        assert_eq!(detect_category("video of slides.google walkthrough"), "video");
    }

    #[test]
    fn suggests_at_most_three_tags() {
        assert_eq!(suggest_tags("Rust Tutorial"), "learning, education, how-to");
        assert_eq!(suggest_tags("Marketing demo"), "business, promotion, advertising");
        assert_eq!(suggest_tags("Plain title"), "");
    }
}
