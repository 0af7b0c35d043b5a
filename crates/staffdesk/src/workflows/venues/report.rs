//! Alphabetical catalog report: venues grouped by sort initial and split
//! into fixed-size pages. Presentation (pending annotations, field layout)
//! belongs to the messaging layer; order and grouping are decided here.

use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::Venue;
use crate::workflows::identity::UserId;

/// Entries per report page.
pub const REPORT_PAGE_SIZE: usize = 12;

/// Leading words dropped (exact case) before taking a venue's sort initial.
const IGNORED_LEADING_WORDS: [&str; 3] = ["The", "A", "An"];

/// One row of a catalog report page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub name: String,
    pub pending: bool,
    pub authorized_users: Vec<UserId>,
}

/// A page of at most [`REPORT_PAGE_SIZE`] entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportPage {
    pub entries: Vec<ReportEntry>,
}

/// Alphabetical venue group and its pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportBucket {
    pub label: String,
    pub pages: Vec<ReportPage>,
}

/// The initial a venue sorts under: the first character of its name after
/// dropping a single leading article, uppercased. A leading article with no
/// word after it is kept as-is.
pub(crate) fn sort_initial(name: &str) -> Option<char> {
    let mut words = name.split_whitespace();
    let first = words.next()?;
    let sort_word = if IGNORED_LEADING_WORDS.contains(&first) {
        words.next().unwrap_or(first)
    } else {
        first
    };
    sort_word.chars().next()?.to_uppercase().next()
}

fn bucket_label(initial: char) -> String {
    if matches!(initial, 'X' | 'Y' | 'Z') {
        "XYZ".to_string()
    } else {
        initial.to_string()
    }
}

/// Groups venues by sort initial, merging X, Y, and Z into one "XYZ" group,
/// and paginates each group at [`REPORT_PAGE_SIZE`]. Groups come back
/// sorted by label; a group with N venues yields ceil(N / page size) pages,
/// and groups that would be empty are not emitted. Entries keep the order
/// of the input collection.
pub fn build_report(venues: &[Venue]) -> Vec<ReportBucket> {
    let mut grouped: BTreeMap<String, Vec<ReportEntry>> = BTreeMap::new();
    for venue in venues {
        let Some(initial) = sort_initial(&venue.name) else {
            continue;
        };
        grouped
            .entry(bucket_label(initial))
            .or_default()
            .push(ReportEntry {
                name: venue.name.clone(),
                pending: venue.pending,
                authorized_users: venue.authorized_users.clone(),
            });
    }

    grouped
        .into_iter()
        .map(|(label, entries)| ReportBucket {
            label,
            pages: entries
                .chunks(REPORT_PAGE_SIZE)
                .map(|chunk| ReportPage {
                    entries: chunk.to_vec(),
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::venues::domain::VenueId;

    fn venue(index: u64, name: &str) -> Venue {
        let mut venue = Venue::new(VenueId(format!("venue-{index:04}")), name);
        venue.add_user(UserId(index));
        venue
    }

    #[test]
    fn sort_initial_drops_leading_articles() {
        assert_eq!(sort_initial("The Alpha"), Some('A'));
        assert_eq!(sort_initial("A Night Out"), Some('N'));
        assert_eq!(sort_initial("An Evening In"), Some('E'));
        assert_eq!(sort_initial("Behemoth Bar"), Some('B'));
    }

    #[test]
    fn sort_initial_keeps_lone_articles_and_exact_case() {
        assert_eq!(sort_initial("The"), Some('T'));
        assert_eq!(sort_initial("A"), Some('A'));
        // Lowercase articles are not articles for sorting purposes.
        assert_eq!(sort_initial("the alpha"), Some('T'));
        assert_eq!(sort_initial("THE Alpha"), Some('T'));
    }

    #[test]
    fn sort_initial_uppercases_and_handles_unicode() {
        assert_eq!(sort_initial("zebra club"), Some('Z'));
        assert_eq!(sort_initial("éclair"), Some('É'));
        assert_eq!(sort_initial(""), None);
        assert_eq!(sort_initial("   "), None);
    }

    #[test]
    fn fixture_buckets_match_expected_grouping() {
        let venues = vec![
            venue(1, "The Alpha"),
            venue(2, "Xanadu"),
            venue(3, "Yeti's Den"),
            venue(4, "Zebra Club"),
            venue(5, "Behemoth Bar"),
        ];

        let buckets = build_report(&venues);

        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "XYZ"]);

        for bucket in &buckets {
            assert_eq!(bucket.pages.len(), 1);
        }

        let xyz = &buckets[2];
        let names: Vec<&str> = xyz.pages[0]
            .entries
            .iter()
            .map(|entry| entry.name.as_str())
            .collect();
        assert_eq!(names, vec!["Xanadu", "Yeti's Den", "Zebra Club"]);
    }

    #[test]
    fn buckets_paginate_at_twelve_entries() {
        let venues: Vec<Venue> = (0..13).map(|i| venue(i, &format!("Bar {i}"))).collect();

        let buckets = build_report(&venues);

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].pages.len(), 2);
        assert_eq!(buckets[0].pages[0].entries.len(), REPORT_PAGE_SIZE);
        assert_eq!(buckets[0].pages[1].entries.len(), 1);
    }

    #[test]
    fn exact_page_multiples_do_not_emit_a_trailing_empty_page() {
        let venues: Vec<Venue> = (0..24).map(|i| venue(i, &format!("Bar {i}"))).collect();

        let buckets = build_report(&venues);

        assert_eq!(buckets[0].pages.len(), 2);
        assert!(buckets[0]
            .pages
            .iter()
            .all(|page| page.entries.len() == REPORT_PAGE_SIZE));
    }

    #[test]
    fn no_venues_means_no_buckets() {
        assert!(build_report(&[]).is_empty());
    }

    #[test]
    fn xyz_group_sorts_after_single_letter_labels() {
        let venues = vec![
            venue(1, "Zanzibar"),
            venue(2, "Willow Room"),
            venue(3, "Aurora Hall"),
        ];

        let buckets = build_report(&venues);

        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "W", "XYZ"]);
    }

    #[test]
    fn entries_carry_pending_state_and_roster() {
        let mut pending = venue(1, "Quiet Corner");
        pending.pending = true;
        let venues = vec![pending];

        let buckets = build_report(&venues);

        let entry = &buckets[0].pages[0].entries[0];
        assert!(entry.pending);
        assert_eq!(entry.authorized_users, vec![UserId(1)]);
    }
}
