//! Greedy word wrapping with hyphen/space breaks and ellipsis elision.
//!
//! Lines are emitted one at a time. A line that is too wide is trimmed back
//! to its last break point: a space (dropped) or a hyphen (kept on the line).
//! The final permitted line only breaks at spaces and carries [`ELLIPSIS`]
//! whenever text had to be cut and the marker still fits. A run with no break
//! point at all is emitted whole and overflows.

use crate::text::{measure, Font};

/// Marker appended to the last line when text was elided.
pub const ELLIPSIS: &str = "...";

fn width_of(font: &Font, chars: &[char]) -> u32 {
    let line: String = chars.iter().collect();
    measure(font, &line).size.width
}

fn width_with_ellipsis(font: &Font, chars: &[char]) -> u32 {
    let mut line: String = chars.iter().collect();
    line.push_str(ELLIPSIS);
    measure(font, &line).size.width
}

/// Wrap `text` into at most `max_lines` lines no wider than `max_width`
/// pixels, except for unbreakable runs.
pub fn wrap(font: &Font, text: &str, max_width: u32, max_lines: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut remaining: Vec<char> = text.chars().collect();

    while lines.len() < max_lines && !remaining.is_empty() {
        let final_line = lines.len() + 1 == max_lines;
        let mut line = remaining.clone();
        let mut width = width_of(font, &line);
        // Index of the last character kept from `remaining`.
        let mut end = remaining.len() as isize;
        let mut keep_hyphen: isize = 0;
        let mut elided = false;

        while width > max_width {
            if keep_hyphen == 1 {
                line.pop();
            }

            let split = if final_line {
                line.iter().rposition(|&c| c == ' ')
            } else {
                line.iter().rposition(|&c| c == ' ' || c == '-')
            };
            let Some(split) = split else {
                break;
            };

            end = split as isize;
            line.truncate(split + 1);
            if line[split] == ' ' {
                keep_hyphen = 0;
                line.pop();
                end -= 1;
            } else {
                keep_hyphen = 1;
            }

            if final_line {
                width = width_with_ellipsis(font, &line);
                elided = width <= max_width;
            } else {
                width = width_of(font, &line);
            }
        }

        let mut emitted: String = line.iter().collect();
        if elided {
            emitted.push_str(ELLIPSIS);
        }
        lines.push(emitted);

        let consumed = (end + 2 - keep_hyphen).clamp(0, remaining.len() as isize) as usize;
        remaining.drain(..consumed);
    }

    lines
}
