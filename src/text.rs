// Copyright 2025 The NoteQ Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use pulldown_cmark::Parser;
use pulldown_cmark::html::push_html;

/// Normalize line endings to LF, collapse runs of blank lines to a single
/// blank line, and trim surrounding whitespace. Used before a note's content
/// is stored.
pub fn clean_text_content(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut out: Vec<&str> = Vec::new();
    let mut blank_run = 0;
    for line in text.lines() {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
            out.push("");
        } else {
            blank_run = 0;
            out.push(line);
        }
    }
    out.join("\n").trim().to_string()
}

pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut html_output = String::new();
    push_html(&mut html_output, parser);
    html_output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_content_line_endings() {
        assert_eq!(clean_text_content("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_clean_text_content_collapses_blank_runs() {
        assert_eq!(clean_text_content("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(clean_text_content("a\n \n\t\nb"), "a\n\nb");
    }

    #[test]
    fn test_clean_text_content_keeps_single_blank_line() {
        assert_eq!(clean_text_content("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_clean_text_content_trims() {
        assert_eq!(clean_text_content("  \n a \n"), "a");
    }

    #[test]
    fn test_markdown_to_html() {
        let html = markdown_to_html("# Heading\n\n- item");
        assert!(html.contains("<h1>Heading</h1>"));
        assert!(html.contains("<li>item</li>"));
    }
}
