use std::collections::BTreeMap;

use super::types::{FileKind, FileRecord};

/// Built-in sample files, stamped one second apart so recency order is stable.
pub fn default_files(now_ms: u64) -> BTreeMap<String, FileRecord> {
    let seeds = [
        (
            "welcome-note",
            FileKind::Note,
            "Welcome to Notes",
            "This is a faithful take on the desktop Notes app.\n\n\
             Things to try:\n\
             • Edits save automatically\n\
             • Files are shared with Finder, Terminal and Safari\n\
             • Everything lives in a small virtual file system",
        ),
        (
            "todo-note",
            FileKind::Note,
            "Today",
            "1. Edit this note and watch it save\n\
             2. Type `help` in Terminal to see the file commands\n\
             3. Double-click a file in Finder\n\
             4. Open the sample page in Safari",
        ),
        (
            "readme.txt",
            FileKind::Text,
            "About this desktop",
            "The desktop now has a lightweight virtual file system.\n\n\
             • Finder lists every file and opens it in the right app\n\
             • Terminal can view, create, write and remove files\n\
             • Notes edits text and saves as you type\n\
             • Safari renders stored pages and plain text",
        ),
        (
            "safari-tips.html",
            FileKind::Page,
            "Safari tips",
            "<h1>Safari tips</h1>\
             <p>This page is stored in the virtual file system and opens in Safari.</p>\
             <ul>\
             <li>Type a file name such as <code>safari-tips.html</code> in the address bar</li>\
             <li>Or pick a file from the drop-down list</li>\
             <li>The terminal command <code>open safari-tips.html</code> opens it here directly</li>\
             </ul>\
             <p>Small shared files are how the apps talk to each other.</p>",
        ),
    ];

    seeds
        .into_iter()
        .enumerate()
        .map(|(idx, (name, kind, title, content))| {
            let stamp = now_ms.saturating_sub(idx as u64 * 1_000);
            (
                name.to_string(),
                FileRecord {
                    name: name.to_string(),
                    kind,
                    title: title.to_string(),
                    content: Some(content.to_string()),
                    created_at: stamp,
                    modified_at: stamp,
                },
            )
        })
        .collect()
}
