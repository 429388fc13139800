//! Drag-and-drop onto a terminal.
//!
//! Terminals deliver a dropped file as a pasted path; this turns such a
//! paste back into paths.

use reqwest::Url;
use std::path::PathBuf;

/// Split a pasted drop into paths.
///
/// Handles single and double quotes, backslash-escaped characters and
/// `file://` URIs, which is what common terminals paste when a file is
/// dragged onto them.
pub fn parse_dropped_paths(line: &str) -> Vec<PathBuf> {
    split_shell_words(line.trim())
        .into_iter()
        .map(|word| {
            if word.starts_with("file://") {
                if let Some(path) = Url::parse(&word).ok().and_then(|u| u.to_file_path().ok()) {
                    return path;
                }
            }
            PathBuf::from(word)
        })
        .collect()
}

fn split_shell_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_word = true;
                for q in chars.by_ref() {
                    if q == '\'' {
                        break;
                    }
                    current.push(q);
                }
            }
            '"' => {
                in_word = true;
                while let Some(q) = chars.next() {
                    match q {
                        '"' => break,
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                current.push(escaped);
                            }
                        }
                        _ => current.push(q),
                    }
                }
            }
            '\\' => {
                in_word = true;
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            _ => {
                in_word = true;
                current.push(c);
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}
