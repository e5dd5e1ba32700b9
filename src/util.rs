//! Shared utility functions.

use ratatui::text::Span;
use tokio::task::spawn_blocking;

use crate::{Error, Result};

/// Run blocking file IO off the async runtime.
pub async fn blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    spawn_blocking(f)
        .await
        .map_err(|e| Error::TaskJoin(e.to_string()))?
}

/// Terminal columns taken by `s`. Wide glyphs count as two.
pub fn display_width(s: &str) -> usize {
    Span::raw(s).width()
}

/// Shorten `s` to at most `max_width` columns, marking the cut with `~`.
pub fn truncate(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    let marked = max_width > 3;
    let budget = if marked { max_width - 1 } else { max_width };

    let mut out = String::new();
    let mut used = 0;
    let mut buf = [0u8; 4];
    for c in s.chars() {
        let w = display_width(c.encode_utf8(&mut buf));
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    if marked {
        out.push('~');
    }
    out
}
