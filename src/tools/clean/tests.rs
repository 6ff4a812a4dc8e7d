#![cfg(test)]
mod tests {
    use crate::tools::clean::*;

    #[test]
    fn test_field_name_examples() {
        assert_eq!(
            normalize_field_name("Full Filming Location:"),
            "full_filming_location"
        );
        assert_eq!(normalize_field_name("Color / Tone"), "color_tone");
    }

    #[test]
    fn test_field_name_hyphens_and_case() {
        assert_eq!(normalize_field_name("Shot Type"), "shot_type");
        assert_eq!(normalize_field_name("Frame-Size:"), "frame_size");
        assert_eq!(normalize_field_name("  LENS  SIZE  "), "lens_size");
        assert_eq!(normalize_field_name("Int / Ext"), "int_ext");
    }

    #[test]
    fn test_field_name_handles_newlines_inside_label() {
        assert_eq!(normalize_field_name("Time\nOf Day:"), "time_of_day");
    }

    #[test]
    fn test_field_name_empty_input() {
        assert_eq!(normalize_field_name(""), "");
        assert_eq!(normalize_field_name(" : "), "");
    }

    #[test]
    fn test_get_text_collapses_newlines() {
        assert_eq!(get_text("Director:\n   Denis   Villeneuve"), "Director: Denis Villeneuve");
        assert_eq!(get_text("   "), "");
    }

    #[test]
    fn test_clean_cell_matches_whitespace_normalization() {
        assert_eq!(clean_cell("line one \n line two"), "line one line two");
        assert_eq!(clean_cell("a\r\nb"), "a b");
        assert_eq!(clean_cell("untouched"), "untouched");
    }

    #[test]
    fn test_join_text_flattens_fragments() {
        let parts = vec!["  Blade ", "\n", "Runner  "];
        assert_eq!(join_text(parts), "Blade Runner");
    }

    #[test]
    fn test_resolve_url_keeps_absolute_and_empty() {
        let page = url::Url::parse("https://shotdeck.com/browse/stills").unwrap();
        assert_eq!(
            resolve_url(&page, "https://cdn.example.com/a.webp?x=1"),
            "https://cdn.example.com/a.webp?x=1"
        );
        assert_eq!(resolve_url(&page, "  "), "");
        assert_eq!(
            resolve_url(&page, "thumb/a.jpg"),
            "https://shotdeck.com/browse/thumb/a.jpg"
        );
    }
}
