//! Positional URL templates
//!
//! Listing and item URLs are described by templates with positional slots:
//! `{}` takes the next argument, `{N}` takes argument `N`, and `{{` / `}}`
//! produce literal braces. Templates are never validated against the number
//! of arguments: a slot with no matching argument is copied through verbatim
//! and surplus arguments are ignored.

use std::fmt::Display;

/// Formats `template` by substituting positional arguments
///
/// # Example
///
/// ```
/// use pagesweep::template::format_positional;
///
/// let url = format_positional("https://example.com/list?page={}&p={}&size={}", &[&3, &3, &20]);
/// assert_eq!(url, "https://example.com/list?page=3&p=3&size=20");
/// ```
pub fn format_positional(template: &str, args: &[&dyn Display]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut chars = template.char_indices().peekable();
    let mut next_auto = 0usize;

    while let Some((start, c)) = chars.next() {
        match c {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    out.push('{');
                    continue;
                }

                let Some(offset) = template[start + 1..].find('}') else {
                    out.push('{');
                    continue;
                };
                let close = start + 1 + offset;
                let slot = &template[start + 1..close];

                let index = if slot.is_empty() {
                    let index = next_auto;
                    next_auto += 1;
                    Some(index)
                } else {
                    slot.parse::<usize>().ok()
                };

                match index.and_then(|i| args.get(i)) {
                    Some(arg) => out.push_str(&arg.to_string()),
                    None => out.push_str(&template[start..=close]),
                }

                while matches!(chars.peek(), Some(&(i, _)) if i <= close) {
                    chars.next();
                }
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                }
                out.push('}');
            }
            _ => out.push(c),
        }
    }

    out
}
