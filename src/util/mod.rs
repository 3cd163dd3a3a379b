/// Strip HTML tags from rich-text note content.
///
/// Rules (matching what the rich-text widget emits):
/// - `<...>` spans are removed; an unclosed `<` is kept as plain text.
/// - `&nbsp;` decodes to a space; `&amp;`/`&lt;`/`&gt;` decode to their
///   characters. Unknown entities pass through unchanged.
pub(crate) fn strip_html_tags(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'<' {
            // Find closing `>`
            let mut j = i + 1;
            let mut end = None;
            while j < bytes.len() {
                if bytes[j] == b'>' {
                    end = Some(j);
                    break;
                }
                j += 1;
            }

            match end {
                Some(close) => {
                    i = close + 1;
                    continue;
                }
                None => {
                    // Unclosed tag: treat the rest as text.
                    out.push_str(&input[i..]);
                    break;
                }
            }
        }

        if bytes[i] == b'&' {
            let rest = &input[i..];
            let replaced = [
                ("&nbsp;", " "),
                ("&amp;", "&"),
                ("&lt;", "<"),
                ("&gt;", ">"),
            ]
            .iter()
            .find_map(|&(entity, ch)| rest.starts_with(entity).then_some((entity.len(), ch)));

            if let Some((skip, ch)) = replaced {
                out.push_str(ch);
                i += skip;
                continue;
            }
        }

        // Advance one full char (content may be multi-byte).
        let ch_len = input[i..]
            .chars()
            .next()
            .map(|c| c.len_utf8())
            .unwrap_or(1);
        out.push_str(&input[i..i + ch_len]);
        i += ch_len;
    }

    out
}

/// Whether note content is empty once markup is stripped.
///
/// Editors emit placeholder markup like `<p><br></p>` for an empty note;
/// such content must never be sent to the backend.
pub(crate) fn note_is_blank(content: &str) -> bool {
    strip_html_tags(content).trim().is_empty()
}

/// Render an ISO-8601 timestamp (`2024-03-01T18:22:09.000Z`) as a short
/// `YYYY/MM/DD HH:MM` display string. Falls back to the raw input when the
/// shape is unexpected; the client never does date arithmetic.
pub(crate) fn format_timestamp(iso: &str) -> String {
    let date = iso.get(0..10);
    let time = iso.get(11..16);

    match (date, time) {
        (Some(d), Some(t)) if d.len() == 10 => format!("{} {}", d.replace('-', "/"), t),
        (Some(d), None) if d.len() == 10 => d.replace('-', "/"),
        _ => iso.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html_tags_removes_markup() {
        assert_eq!(strip_html_tags("<p>Cherry and plum</p>"), "Cherry and plum");
        assert_eq!(
            strip_html_tags("<p><strong>bold</strong> finish</p>"),
            "bold finish"
        );
    }

    #[test]
    fn test_strip_html_tags_keeps_unclosed_angle_as_text() {
        assert_eq!(strip_html_tags("acidity < tannin"), "acidity < tannin");
    }

    #[test]
    fn test_strip_html_tags_decodes_common_entities() {
        assert_eq!(strip_html_tags("a&nbsp;&amp;&nbsp;b"), "a & b");
        assert_eq!(strip_html_tags("&lt;cellar&gt;"), "<cellar>");
    }

    #[test]
    fn test_note_is_blank_on_editor_placeholder() {
        assert!(note_is_blank(""));
        assert!(note_is_blank("<p><br></p>"));
        assert!(note_is_blank("<p>&nbsp;</p>"));
        assert!(!note_is_blank("<p>long finish</p>"));
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp("2024-03-01T18:22:09.000Z"),
            "2024/03/01 18:22"
        );
        assert_eq!(format_timestamp("2024-03-01"), "2024/03/01");
        assert_eq!(format_timestamp("whenever"), "whenever");
    }
}
