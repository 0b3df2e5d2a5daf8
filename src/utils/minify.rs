//! HTML minification, enabled by `[build] minify` or `--minify`.

use std::borrow::Cow;

/// Minify `html` when `enabled`.
///
/// Returns `Cow::Borrowed` if minify disabled, `Cow::Owned` if minified.
pub fn minify_html(html: &[u8], enabled: bool) -> Cow<'_, [u8]> {
    if !enabled {
        return Cow::Borrowed(html);
    }

    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.minify_js = true;
    cfg.remove_bangs = true;
    cfg.remove_processing_instructions = true;
    Cow::Owned(minify_html::minify(html, &cfg))
}
