//! Builders for the JavaScript payloads sent through `Runtime.evaluate`.
//!
//! The payloads mirror the heuristic implemented in [`crate::scan`] and
//! [`crate::score`]; the keyword tables and score ladder are interpolated
//! from [`crate::keywords`] so the two implementations cannot drift on
//! vocabulary. The scan payload returns a click-report object (or `null`),
//! the inspect payload returns an array of diagnostic rows.

use crate::keywords::{
    BLACKLIST, CHROME_CLASS_HINTS, DIAGNOSTIC_KEYWORDS, LABEL_MATCHES, MAX_DEPTH,
    OUTLINE_DURATION_MS,
};

/// Shared helper block prepended to both payloads.
const HELPERS: &str = r#"
  const BLACKLIST = __BLACKLIST__;
  const LABEL_MATCHES = __LABEL_MATCHES__;
  const CHROME_HINTS = __CHROME_HINTS__;
  const MAX_DEPTH = __MAX_DEPTH__;
  const norm = (s) => (s || '').replace(/\s+/g, ' ').trim().toLowerCase();
  const textOf = (el) => norm(el.innerText || el.textContent);
  const attrOf = (el, name) => (el.getAttribute && el.getAttribute(name)) || '';
  const labelOf = (el) => norm(attrOf(el, 'aria-label'));
  const titleOf = (el) => norm(attrOf(el, 'title'));
  const blacklisted = (t, l, ti) =>
    BLACKLIST.some((w) => t.includes(w) || l.includes(w) || ti.includes(w));
  const keywordScore = (t, l, ti) => {
    if (t === 'accept all') return 100;
    if (LABEL_MATCHES.includes(l) || LABEL_MATCHES.includes(ti)) return 95;
    if (t.startsWith('accept all')) return 90;
    if (t === 'accept') return 80;
    if (t === 'apply') return 75;
    if (t.includes('accept all')) return 65;
    return 0;
  };
  const isChrome = (el) => {
    const raw = el.className && el.className.baseVal !== undefined
      ? el.className.baseVal
      : el.className;
    const cls = norm(raw);
    if (CHROME_HINTS.some((h) => cls.includes(h))) return true;
    return cls.split(' ').some(
      (tok) => tok === 'tab' || tok === 'tabs' || tok.startsWith('tab-')
    );
  };
  const onScreen = (el) => {
    if (!el.getBoundingClientRect) return false;
    const r = el.getBoundingClientRect();
    return r.width > 0 && r.height > 0 && r.bottom > 0 && r.right > 0 &&
      r.top < (window.innerHeight || 0) && r.left < (window.innerWidth || 0);
  };
  const describe = (el, score) => ({
    tag: el.tagName.toLowerCase(),
    text: ((el.innerText || '').trim()).slice(0, 60),
    label: attrOf(el, 'aria-label') || null,
    title: attrOf(el, 'title') || null,
    score,
  });
"#;

/// Scan-and-click payload. Evaluates to a click-report object or `null`.
const SCAN_TEMPLATE: &str = r#"(() => {
__HELPERS__
  const evaluate = (el) => {
    if (!onScreen(el)) return null;
    const t = textOf(el), l = labelOf(el), ti = titleOf(el);
    if (blacklisted(t, l, ti)) return null;
    const score = keywordScore(t, l, ti);
    if (score === 0) return null;
    if (score >= 60) {
      let style = null;
      try { style = window.getComputedStyle(el); } catch (e) { return null; }
      if (!style) return null;
      if (style.visibility === 'hidden' || style.display === 'none' ||
          parseFloat(style.opacity) === 0) return null;
      let pointer = style.cursor === 'pointer';
      if (!pointer && el.parentElement) {
        try {
          pointer = window.getComputedStyle(el.parentElement).cursor === 'pointer';
        } catch (e) {}
      }
      const nativeButton = el.tagName === 'BUTTON' ||
        attrOf(el, 'role') === 'button';
      if (!pointer && !nativeButton && score < 90) return null;
    }
    if (isChrome(el)) return null;
    if (t.includes('accepting') || l.includes('accepting')) return null;
    return { el, report: describe(el, score) };
  };
  const walk = (root, depth) => {
    if (depth > MAX_DEPTH || !root || !root.querySelectorAll) return null;
    let best = null;
    for (const el of root.querySelectorAll('*')) {
      const c = evaluate(el);
      if (c && (!best || c.report.score > best.report.score)) best = c;
      if (el.shadowRoot) {
        const sub = walk(el.shadowRoot, depth + 1);
        if (sub && (!best || sub.report.score > best.report.score)) best = sub;
      }
      if (el.tagName === 'IFRAME' || el.tagName === 'FRAME' ||
          el.tagName === 'WEBVIEW') {
        let doc = null;
        try { doc = el.contentDocument; } catch (e) {}
        const sub = walk(doc, depth + 1);
        if (sub && (!best || sub.report.score > best.report.score)) best = sub;
      }
    }
    return best;
  };
  const best = walk(document, 0);
  if (!best) return null;
  const el = best.el;
  const opts = { bubbles: true, cancelable: true, view: window };
  el.dispatchEvent(new MouseEvent('mousedown', opts));
  el.dispatchEvent(new MouseEvent('mouseup', opts));
  el.click();
  const prev = el.style.outline;
  el.style.outline = '2px solid #2ecc40';
  setTimeout(() => { el.style.outline = prev; }, __OUTLINE_MS__);
  return best.report;
})()"#;

/// Diagnostic payload: reports every element whose text, label, or title
/// mentions an accept/apply/review keyword, regardless of score, with the
/// verdicts the scan would have reached. Clicks nothing.
const INSPECT_TEMPLATE: &str = r#"(() => {
__HELPERS__
  const KEYWORDS = __DIAG_KEYWORDS__;
  const rows = [];
  const walk = (root, depth) => {
    if (depth > MAX_DEPTH || !root || !root.querySelectorAll) return;
    for (const el of root.querySelectorAll('*')) {
      if (rows.length >= 200) return;
      const t = textOf(el), l = labelOf(el), ti = titleOf(el);
      if (KEYWORDS.some((k) => t.includes(k) || l.includes(k) || ti.includes(k))) {
        const row = describe(el, keywordScore(t, l, ti));
        row.blacklisted = blacklisted(t, l, ti);
        row.chrome = isChrome(el);
        row.visible = onScreen(el);
        rows.push(row);
      }
      if (el.shadowRoot) walk(el.shadowRoot, depth + 1);
      if (el.tagName === 'IFRAME' || el.tagName === 'FRAME' ||
          el.tagName === 'WEBVIEW') {
        let doc = null;
        try { doc = el.contentDocument; } catch (e) {}
        walk(doc, depth + 1);
      }
    }
  };
  walk(document, 0);
  return rows;
})()"#;

fn json_list(words: &[&str]) -> String {
    serde_json::to_string(words).expect("static keyword list serializes")
}

fn substitute(template: &str) -> String {
    template
        .replace("__HELPERS__", HELPERS)
        .replace("__BLACKLIST__", &json_list(BLACKLIST))
        .replace("__LABEL_MATCHES__", &json_list(LABEL_MATCHES))
        .replace("__CHROME_HINTS__", &json_list(CHROME_CLASS_HINTS))
        .replace("__DIAG_KEYWORDS__", &json_list(DIAGNOSTIC_KEYWORDS))
        .replace("__MAX_DEPTH__", &MAX_DEPTH.to_string())
        .replace("__OUTLINE_MS__", &OUTLINE_DURATION_MS.to_string())
}

/// The scan-and-click payload for one poll tick.
pub fn scan_script() -> String {
    substitute(SCAN_TEMPLATE)
}

/// The diagnostic payload for the inspect command.
pub fn inspect_script() -> String {
    substitute(INSPECT_TEMPLATE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_script_interpolates_all_placeholders() {
        let script = scan_script();
        assert!(!script.contains("__"), "unresolved placeholder in payload");
        assert!(script.contains("\"discard\""));
        assert!(script.contains("\"accept all\""));
        assert!(script.contains("const MAX_DEPTH = 20"));
        assert!(script.contains(", 500);"));
    }

    #[test]
    fn inspect_script_interpolates_all_placeholders() {
        let script = inspect_script();
        assert!(!script.contains("__"), "unresolved placeholder in payload");
        assert!(script.contains("\"review\""));
        // The diagnostic pass must not synthesize clicks.
        assert!(!script.contains("MouseEvent"));
    }

    #[test]
    fn scan_script_clicks_and_outlines() {
        let script = scan_script();
        assert!(script.contains("'mousedown'"));
        assert!(script.contains("'mouseup'"));
        assert!(script.contains("el.click()"));
        assert!(script.contains("outline"));
    }
}
