//! Console output for query results.

use crate::article::Article;
use std::io::{self, Write};

/// Width of the line printed after each result block.
pub const SEPARATOR_WIDTH: usize = 40;

/// The line printed after each result block.
pub fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

/// Write one line per article text, then the separator.
///
/// Line breaks inside a text are flattened to spaces so that every article
/// occupies exactly one line.
pub fn write_results<W: Write>(out: &mut W, articles: &[Article]) -> io::Result<()> {
    for article in articles {
        writeln!(out, "{}", single_line(&article.article_text))?;
    }
    writeln!(out, "{}", separator())?;
    out.flush()
}

fn single_line(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn render(texts: &[&str]) -> String {
        let articles: Vec<Article> = texts
            .iter()
            .map(|t| Article::new(1, Utc::now(), *t))
            .collect();
        let mut out = Vec::new();
        write_results(&mut out, &articles).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_empty_result_prints_only_separator() {
        assert_eq!(render(&[]), format!("{}\n", "-".repeat(40)));
    }

    #[test]
    fn test_one_line_per_article() {
        let output = render(&["first", "second"]);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines, vec!["first", "second", "----------------------------------------"]);
    }

    #[test]
    fn test_multiline_text_is_flattened() {
        let output = render(&["line one\nline two"]);
        assert_eq!(output.lines().count(), 2);
        assert!(output.starts_with("line one line two\n"));
    }
}
