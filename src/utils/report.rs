use std::fmt::Display;

/// Renders at most `limit` items, followed by `overflow` when more were left out.
pub fn capped_lines<T: Display>(items: &[T], limit: usize, overflow: &str) -> Vec<String> {
    let mut lines: Vec<String> = items.iter().take(limit).map(|item| item.to_string()).collect();
    if items.len() > limit {
        lines.push(overflow.to_string());
    }
    lines
}
