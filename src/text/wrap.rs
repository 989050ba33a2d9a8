use crate::foundation::error::PosterResult;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WrapStyle {
    None,
    #[default]
    Word,
    Char,
}

impl WrapStyle {
    /// Unknown names fall back to [`WrapStyle::None`] with a warning.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "word" => Self::Word,
            "char" => Self::Char,
            "none" | "" => Self::None,
            other => {
                tracing::warn!(wrap_style = other, "unknown wrap style, not wrapping");
                Self::None
            }
        }
    }
}

/// Break `text` into lines no wider than `max_width`.
///
/// Explicit newlines always split. Within a paragraph tokens (words or characters) are added
/// greedily while `measure` of the candidate line stays within `max_width`; a line always takes
/// at least one token, so a single over-long token gets a line of its own. Without a
/// `max_width`, or with [`WrapStyle::None`], only the newlines split.
pub fn wrap_text(
    text: &str,
    style: WrapStyle,
    max_width: Option<f32>,
    mut measure: impl FnMut(&str) -> PosterResult<f32>,
) -> PosterResult<Vec<String>> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
        let Some(max_width) = max_width.filter(|_| style != WrapStyle::None) else {
            lines.push(paragraph.to_owned());
            continue;
        };

        let (tokens, joiner): (Vec<&str>, &str) = match style {
            WrapStyle::Word => (paragraph.split_whitespace().collect(), " "),
            _ => (
                paragraph
                    .char_indices()
                    .map(|(i, c)| &paragraph[i..i + c.len_utf8()])
                    .collect(),
                "",
            ),
        };
        if tokens.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        for token in tokens {
            if current.is_empty() {
                current.push_str(token);
                continue;
            }
            let candidate = format!("{current}{joiner}{token}");
            if measure(&candidate)? <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, token.to_owned()));
            }
        }
        lines.push(current);
    }
    Ok(lines)
}
