//! Structural pruning of product-page markup.
//!
//! Removes page chrome (head, header, footer) and decorative widgets
//! (recommendation rails, review lists, banners, option pickers...) before
//! image collection. Subtrees are detached from the `scraper` tree, so
//! nothing below a pruned node is reachable from the document root
//! afterwards.

use ego_tree::NodeId;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Tags whose whole subtree is page chrome
pub const PRUNED_TAGS: &[&str] = &["header", "head", "footer"];

/// Case-sensitive substrings that mark a non-product widget by its class attribute
pub const PRUNED_CLASS_MARKERS: &[&str] = &[
    "recommend",
    "relate",
    "logo",
    "together",
    "list",
    "review",
    "banner",
    "category",
    "option",
    "guide",
];

static PRUNED_TAG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(&PRUNED_TAGS.join(", "))
        .expect("PRUNED_TAG_SELECTOR: hardcoded selector is valid")
});

static CLASSED_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("[class]").expect("CLASSED_SELECTOR: hardcoded selector is valid")
});

/// Whether a raw class attribute value marks a decorative widget
#[must_use]
pub fn class_is_pruned(class_attr: &str) -> bool {
    PRUNED_CLASS_MARKERS
        .iter()
        .any(|marker| class_attr.contains(marker))
}

/// Collect every element matching a pruning predicate
///
/// A node matching several predicates appears once. Only nodes reachable
/// from the root are considered.
#[must_use]
pub fn collect_pruned(document: &Html) -> HashSet<NodeId> {
    let root = document.root_element();
    let mut pruned: HashSet<NodeId> = HashSet::new();

    // The root itself can be a match (<html class="...list...">)
    if root.value().attr("class").is_some_and(class_is_pruned) {
        pruned.insert(root.id());
    }

    for element in root.select(&PRUNED_TAG_SELECTOR) {
        pruned.insert(element.id());
    }

    for element in root.select(&CLASSED_SELECTOR) {
        if element.value().attr("class").is_some_and(class_is_pruned) {
            pruned.insert(element.id());
        }
    }

    pruned
}

/// Detach every pruned subtree from `document`
///
/// Returns the number of subtrees detached.
pub fn prune_document(document: &mut Html) -> usize {
    let pruned = collect_pruned(document);
    let count = pruned.len();

    for id in pruned {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    count
}

/// Prune `markup` and serialize what is left
#[must_use]
pub fn prune_markup(markup: &str) -> String {
    let mut document = Html::parse_document(markup);
    prune_document(&mut document);
    document.html()
}
