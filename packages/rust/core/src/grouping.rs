//! Tag bucketing and deterministic bucket ordering.

use std::collections::BTreeMap;

use feedcast_shared::ReducedDocument;

/// Ordered buckets: (tag name, documents carrying that tag).
pub type TagBuckets = Vec<(String, Vec<ReducedDocument>)>;

/// Fan documents out into one bucket per tag they carry.
///
/// Buckets are not disjoint: a document with N tags lands in N buckets.
pub fn group_by_tag(docs: &[ReducedDocument]) -> BTreeMap<String, Vec<ReducedDocument>> {
    let mut buckets: BTreeMap<String, Vec<ReducedDocument>> = BTreeMap::new();
    for doc in docs {
        for tag in &doc.tags {
            buckets.entry(tag.clone()).or_default().push(doc.clone());
        }
    }
    buckets
}

/// Drop ignored tags and order the rest: priority-list members first, in
/// list order, then everything else alphabetically.
///
/// This ordering determines the narrative order of the episode.
pub fn sort_buckets(
    buckets: BTreeMap<String, Vec<ReducedDocument>>,
    priority_tags: &[String],
    ignore_tags: &[String],
) -> TagBuckets {
    let rank = |tag: &String| {
        priority_tags
            .iter()
            .position(|p| p == tag)
            .unwrap_or(priority_tags.len())
    };

    let mut entries: TagBuckets = buckets
        .into_iter()
        .filter(|(tag, _)| !ignore_tags.contains(tag))
        .collect();

    entries.sort_by(|(a, _), (b, _)| rank(a).cmp(&rank(b)).then_with(|| a.cmp(b)));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(title: &str, tags: &[&str]) -> ReducedDocument {
        ReducedDocument {
            title: Some(title.into()),
            author: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            summary: None,
            site_name: None,
        }
    }

    fn default_priority() -> Vec<String> {
        ["Local", "Tesla", "AI", "Movies", "TV", "Games", "Technology"]
            .map(String::from)
            .to_vec()
    }

    #[test]
    fn document_appears_in_every_tag_bucket() {
        let docs = vec![doc("multi", &["AI", "Local"]), doc("single", &["AI"])];
        let buckets = group_by_tag(&docs);

        assert_eq!(buckets["AI"].len(), 2);
        assert_eq!(buckets["Local"].len(), 1);
        assert_eq!(buckets["Local"][0].title.as_deref(), Some("multi"));
    }

    #[test]
    fn untagged_documents_produce_no_buckets() {
        let docs = vec![doc("untagged", &[])];
        assert!(group_by_tag(&docs).is_empty());
    }

    #[test]
    fn priority_then_alphabetical_order() {
        let docs = vec![
            doc("a", &["Games"]),
            doc("b", &["Local"]),
            doc("c", &["Zebra"]),
        ];
        let sorted = sort_buckets(group_by_tag(&docs), &default_priority(), &[]);

        let order: Vec<&str> = sorted.iter().map(|(tag, _)| tag.as_str()).collect();
        assert_eq!(order, vec!["Local", "Games", "Zebra"]);
    }

    #[test]
    fn non_priority_tags_sort_alphabetically() {
        let docs = vec![
            doc("a", &["Cooking"]),
            doc("b", &["Birds"]),
            doc("c", &["Astronomy"]),
        ];
        let sorted = sort_buckets(group_by_tag(&docs), &default_priority(), &[]);

        let order: Vec<&str> = sorted.iter().map(|(tag, _)| tag.as_str()).collect();
        assert_eq!(order, vec!["Astronomy", "Birds", "Cooking"]);
    }

    #[test]
    fn ignored_tags_never_surface() {
        let docs = vec![
            doc("a", &["Humour"]),
            doc("b", &["Humour"]),
            doc("c", &["AI", "Summary"]),
        ];
        let ignore = ["Humour", "Summary"].map(String::from).to_vec();
        let sorted = sort_buckets(group_by_tag(&docs), &default_priority(), &ignore);

        let order: Vec<&str> = sorted.iter().map(|(tag, _)| tag.as_str()).collect();
        assert_eq!(order, vec!["AI"]);
    }
}
