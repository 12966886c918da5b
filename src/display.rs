use std::fmt::Write;

use unicode_width::UnicodeWidthStr;

use crate::sentence::SentenceContext;

/// One labelled span under the token line. `start` and `end` are inclusive
/// token positions in the sentence.
struct Label {
    start: usize,
    end: usize,
    text: String,
}

/// Text rendering of a sentence with annotations drawn under its tokens.
///
/// ```text
/// Er  sah  sie  .
///          ╰─╯animate#127 PersPron
/// ╰╯animate#127 PersPron
/// ╰╯SubjA/agent[1]
/// ```
pub struct SentenceDisplay<'a> {
    sentence: &'a SentenceContext,
    labels: Vec<Label>,
}

// Er  sah  sie  .      - token text
// 0,  4,   9,   14     - start display columns
// 2,  7,   12,  15     - end display columns
impl<'a> std::fmt::Display for SentenceDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const SPACE_PADDING: usize = 2;
        let mut starts = Vec::with_capacity(self.sentence.tokens.len());
        let mut ends = Vec::with_capacity(self.sentence.tokens.len());

        let mut opening_line = String::new();
        for (i, token) in self.sentence.tokens.iter().enumerate() {
            if i > 0 {
                opening_line.extend(std::iter::repeat(' ').take(SPACE_PADDING));
            }
            starts.push(UnicodeWidthStr::width(&*opening_line));
            opening_line.push_str(&token.text);
            ends.push(UnicodeWidthStr::width(&*opening_line));
        }
        f.write_str(&opening_line)?;

        for label in &self.labels {
            let (start, end) = match (starts.get(label.start), ends.get(label.end)) {
                (Some(start), Some(end)) if end > start => (*start, *end),
                _ => continue,
            };
            f.write_char('\n')?;
            for _ in 0..start {
                f.write_char(' ')?;
            }
            f.write_char('╰')?;
            for _ in (start + 1)..end.saturating_sub(1) {
                f.write_char('─')?;
            }
            if end - start > 1 {
                f.write_char('╯')?;
            }
            f.write_str(&label.text)?;
        }
        Ok(())
    }
}

impl<'a> SentenceDisplay<'a> {
    pub fn new(sentence: &'a SentenceContext) -> Self {
        Self {
            sentence,
            labels: Vec::new(),
        }
    }

    /// Label a token range by position; `end` is inclusive.
    pub fn annotate(mut self, start: usize, end: usize, label: impl Into<String>) -> Self {
        self.labels.push(Label {
            start,
            end,
            text: label.into(),
        });
        self
    }

    /// One line per coreference pointer, last token first.
    pub fn include_pointers(mut self) -> Self {
        for (pos, token) in self.sentence.tokens.iter().enumerate().rev() {
            for pointer in &token.pointers {
                let mut text = format!("{}#{}", pointer.layer, pointer.chain);
                if let Some(link) = pointer.link {
                    write!(text, "-{}", link).ok();
                }
                if let Some(dp_type) = &pointer.dp_type {
                    write!(text, " {}", dp_type).ok();
                }
                self.labels.push(Label {
                    start: pos,
                    end: pos,
                    text,
                });
            }
        }
        self
    }

    /// One line per role slot, last token first.
    pub fn include_roles(mut self) -> Self {
        for (pos, token) in self.sentence.tokens.iter().enumerate().rev() {
            for role in &token.roles {
                let mut text = format!(
                    "{}/{}",
                    role.grammatical.as_deref().unwrap_or("_"),
                    role.thematic.as_deref().unwrap_or("_")
                );
                if let Some(clause) = role.clause {
                    write!(text, "[{}]", clause).ok();
                }
                self.labels.push(Label {
                    start: pos,
                    end: pos,
                    text,
                });
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{CharSpan, CorefLayer, CorefPointer, RoleSlot, Token, TokenId};

    fn token(index: usize, text: &str) -> Token {
        Token {
            id: TokenId::new(1, index),
            global_index: index - 1,
            char_span: CharSpan { start: 0, end: 0 },
            text: text.to_string(),
            roles: Vec::new(),
            pointers: Vec::new(),
            morphology: Vec::new(),
        }
    }

    #[test]
    fn draws_spans_under_tokens() {
        let mut sentence = SentenceContext::new(1, 1, "Er sah sie .");
        sentence.tokens = vec![token(1, "Er"), token(2, "sah"), token(3, "sie"), token(4, ".")];
        sentence.tokens[2].pointers.push(CorefPointer {
            layer: CorefLayer::Animate,
            chain: 127,
            link: Some(4),
            target: None,
            dp_type: Some("PersPron".to_string()),
        });
        sentence.tokens[0].roles.push(RoleSlot {
            grammatical: Some("SubjA".to_string()),
            thematic: Some("agent".to_string()),
            clause: Some(1),
        });

        let rendered = SentenceDisplay::new(&sentence)
            .include_pointers()
            .include_roles()
            .annotate(1, 2, "clause mate")
            .to_string();

        assert_eq!(
            rendered,
            [
                "Er  sah  sie  .",
                "         ╰─╯animate#127-4 PersPron",
                "╰╯SubjA/agent[1]",
                "    ╰──────╯clause mate",
            ]
            .join("\n")
        );
    }
}
