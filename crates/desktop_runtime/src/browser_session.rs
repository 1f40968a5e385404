//! Browser window history and page resolution against the virtual file store.

use crate::vfs::{FileKind, VirtualFileStore};

/// Back/forward history for one browser window.
///
/// `index` is `None` until the first navigation. Navigating from the middle of the history drops
/// every entry after the cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserHistory {
    entries: Vec<String>,
    index: Option<usize>,
}

impl BrowserHistory {
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn current(&self) -> Option<&str> {
        self.index
            .and_then(|idx| self.entries.get(idx))
            .map(String::as_str)
    }

    /// Records a visit to `source`. Blank sources are not recorded.
    pub fn navigate(&mut self, source: &str) {
        let source = source.trim();
        if source.is_empty() {
            return;
        }
        let keep = self.index.map_or(0, |idx| idx + 1);
        self.entries.truncate(keep);
        self.entries.push(source.to_string());
        self.index = Some(self.entries.len() - 1);
    }

    pub fn can_go_back(&self) -> bool {
        self.index.is_some_and(|idx| idx > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        self.index
            .is_some_and(|idx| idx + 1 < self.entries.len())
    }

    /// Moves the cursor back and returns the entry now current.
    pub fn back(&mut self) -> Option<&str> {
        if !self.can_go_back() {
            return None;
        }
        self.index = self.index.map(|idx| idx - 1);
        self.current()
    }

    pub fn forward(&mut self) -> Option<&str> {
        if !self.can_go_forward() {
            return None;
        }
        self.index = self.index.map(|idx| idx + 1);
        self.current()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Welcome,
    StoredPage,
    StoredText,
    BuiltInSite,
    Offline,
    NotFound,
}

/// Rendered result of loading a browser address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserPage {
    pub kind: PageKind,
    /// Value shown in the address bar after loading.
    pub address: String,
    pub html: String,
}

struct BuiltInSite {
    domain: &'static str,
    title: &'static str,
    html: &'static str,
}

const BUILT_IN_SITES: &[BuiltInSite] = &[
    BuiltInSite {
        domain: "apple.com",
        title: "Apple",
        html: "<div class=\"site site-apple\">\
               <section class=\"hero\"><h1>iPhone 15 Pro</h1><p>Titanium. So strong. So light. So Pro.</p></section>\
               <section class=\"products\">\
               <div class=\"product\"><h3>iPhone 15</h3><p>The next generation iPhone</p></div>\
               <div class=\"product\"><h3>MacBook Pro</h3><p>Mind-blowing. Head-turning.</p></div>\
               <div class=\"product\"><h3>iPad Pro</h3><p>The ultimate iPad experience</p></div>\
               </section>\
               <footer><p>Demonstration page only. Not affiliated with Apple Inc.</p></footer>\
               </div>",
    },
    BuiltInSite {
        domain: "google.com",
        title: "Google",
        html: "<div class=\"site site-google\">\
               <div class=\"logo\">Google</div>\
               <div class=\"search-box\"><input type=\"text\" placeholder=\"Search Google or type a URL\"/></div>\
               <div class=\"buttons\"><button>Google Search</button><button>I'm Feeling Lucky</button></div>\
               <footer><p>Demonstration page only. Searches are not sent anywhere.</p></footer>\
               </div>",
    },
    BuiltInSite {
        domain: "github.com",
        title: "GitHub",
        html: "<div class=\"site site-github\">\
               <header><strong>GitHub</strong></header>\
               <section class=\"hero\"><h1>Let's build from here</h1>\
               <p>The complete developer platform to build, scale and deliver secure software.</p></section>\
               <footer><p>Demonstration page only. Not affiliated with GitHub, Inc.</p></footer>\
               </div>",
    },
];

/// Domains with a built-in page, in display order.
pub fn built_in_sites() -> impl Iterator<Item = (&'static str, &'static str)> {
    BUILT_IN_SITES.iter().map(|site| (site.domain, site.title))
}

const WELCOME_HTML: &str = "<div class=\"browser-welcome\"><h1>Welcome to Safari</h1>\
                            <p>Enter an address or choose a file to start browsing.</p></div>";
const EMPTY_PAGE_HTML: &str = "<p>This page has no content.</p>";

/// Loads `source` from the file store, the built-in sites or a placeholder.
///
/// Stored files win over built-in sites. Plain-text files are escaped and shown preformatted.
pub fn resolve_source(store: &VirtualFileStore, source: &str) -> BrowserPage {
    let source = source.trim();
    if source.is_empty() {
        return BrowserPage {
            kind: PageKind::Welcome,
            address: String::new(),
            html: WELCOME_HTML.to_string(),
        };
    }

    if let Some(record) = store.read(source) {
        let (kind, html) = if record.kind == FileKind::Page {
            let html = match record.content_str() {
                "" => EMPTY_PAGE_HTML.to_string(),
                content => content.to_string(),
            };
            (PageKind::StoredPage, html)
        } else {
            (
                PageKind::StoredText,
                format!(
                    "<pre class=\"browser-text-viewer\">{}</pre>",
                    escape_html(record.content_str())
                ),
            )
        };
        return BrowserPage {
            kind,
            address: record.name,
            html,
        };
    }

    let domain = site_domain(source);
    if let Some(site) = BUILT_IN_SITES.iter().find(|site| site.domain == domain) {
        return BrowserPage {
            kind: PageKind::BuiltInSite,
            address: site.domain.to_string(),
            html: site.html.to_string(),
        };
    }

    if has_web_scheme(source) {
        return BrowserPage {
            kind: PageKind::Offline,
            address: source.to_string(),
            html: "<div class=\"browser-placeholder\"><h2>You are offline</h2>\
                   <p>This desktop cannot reach the internet. Save a page as a file to view it here.</p>\
                   <p>Try opening <code>safari-tips.html</code>.</p></div>"
                .to_string(),
        };
    }

    let escaped = escape_html(source);
    BrowserPage {
        kind: PageKind::NotFound,
        address: source.to_string(),
        html: format!(
            "<div class=\"browser-placeholder\"><h2>Page not found</h2>\
             <p>No file named <strong>{escaped}</strong> exists.</p>\
             <p>Create one from Terminal with <code>write {escaped} text</code>.</p></div>"
        ),
    }
}

fn has_web_scheme(source: &str) -> bool {
    let lower = source.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn site_domain(source: &str) -> String {
    let lower = source.to_ascii_lowercase();
    let without_scheme = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .unwrap_or(&lower);
    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use platform_host::{ManualClock, MemoryPrefsStore};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::vfs::FilePatch;

    fn store() -> VirtualFileStore {
        VirtualFileStore::load(
            Rc::new(MemoryPrefsStore::default()),
            Rc::new(ManualClock::new(1_000_000)),
        )
    }

    #[test]
    fn navigation_after_back_truncates_forward_entries() {
        let mut history = BrowserHistory::default();
        assert!(!history.can_go_back());
        history.navigate("a");
        history.navigate("b");
        history.navigate("c");

        assert_eq!(history.back(), Some("b"));
        assert_eq!(history.back(), Some("a"));
        assert_eq!(history.back(), None);
        assert!(history.can_go_forward());

        history.navigate("d");
        assert_eq!(history.entries(), ["a", "d"]);
        assert!(!history.can_go_forward());
        assert_eq!(history.forward(), None);
        assert_eq!(history.current(), Some("d"));
    }

    #[test]
    fn blank_navigation_is_ignored() {
        let mut history = BrowserHistory::default();
        history.navigate("   ");
        assert_eq!(history.current(), None);
        assert!(history.entries().is_empty());
    }

    #[test]
    fn stored_pages_render_as_html_and_text_is_escaped() {
        let store = store();
        let page = resolve_source(&store, " safari-tips.html ");
        assert_eq!(page.kind, PageKind::StoredPage);
        assert_eq!(page.address, "safari-tips.html");
        assert!(page.html.starts_with("<h1>Safari tips</h1>"));

        store.upsert("raw.txt", FilePatch::new().content("<b>&</b>"));
        let text = resolve_source(&store, "raw.txt");
        assert_eq!(text.kind, PageKind::StoredText);
        assert_eq!(
            text.html,
            "<pre class=\"browser-text-viewer\">&lt;b&gt;&amp;&lt;/b&gt;</pre>"
        );

        store.upsert("blank.html", FilePatch::new());
        assert_eq!(resolve_source(&store, "blank.html").html, EMPTY_PAGE_HTML);
    }

    #[test]
    fn addresses_fall_through_to_sites_offline_and_not_found() {
        let store = store();
        assert_eq!(resolve_source(&store, "").kind, PageKind::Welcome);

        let site = resolve_source(&store, "https://www.GitHub.com/explore");
        assert_eq!(site.kind, PageKind::BuiltInSite);
        assert_eq!(site.address, "github.com");

        let offline = resolve_source(&store, "https://example.org");
        assert_eq!(offline.kind, PageKind::Offline);
        assert_eq!(offline.address, "https://example.org");

        let missing = resolve_source(&store, "<nope>");
        assert_eq!(missing.kind, PageKind::NotFound);
        assert!(missing.html.contains("&lt;nope&gt;"));
    }
}
