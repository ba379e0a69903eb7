//! Built-in documentation lookup

pub const KNOWLEDGE: &[&str] = &[
    "Persian Lambda Chat is a bilingual AI assistant.",
    "It supports tools like calculator, date conversion, and translation.",
    "The app is built with React, TypeScript, and Tailwind CSS.",
    "RTL support is automatic based on the text content.",
];

pub const NOT_FOUND: &str = "هیچ سندی برای جست‌وجو پیدا نشد. (No documents found matching your query.)";

/// First entry that contains `query`, ignoring case. An empty query matches
/// the first entry.
pub fn lookup(query: &str) -> Option<&'static str> {
    let needle = query.to_lowercase();
    KNOWLEDGE
        .iter()
        .copied()
        .find(|entry| entry.to_lowercase().contains(&needle))
}

pub fn answer(query: &str) -> String {
    match lookup(query) {
        Some(entry) => format!("یافته شده در اسناد: \"{}\"", entry),
        None => NOT_FOUND.to_string(),
    }
}
