use backoffice_core::{
    apply, paginate, CanonicalItem, FilterCriteria, ItemType, Owner, PageSpec, SortDirection,
    SortKey, SortSpec, StatusFilter, TypeFilter,
};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

fn item(id: &str, title: &str) -> CanonicalItem {
    CanonicalItem::new(id, title, ItemType::Product)
}

fn ids(items: &[CanonicalItem]) -> Vec<&str> {
    items.iter().map(|item| item.id.as_str()).collect()
}

fn numbered(count: usize) -> Vec<CanonicalItem> {
    (1..=count)
        .map(|n| item(&format!("id-{n}"), &format!("Item {n}")))
        .collect()
}

#[test]
fn search_is_case_insensitive_substring() {
    let items = vec![item("1", "Lamp"), item("2", "Desk"), item("3", "lampshade")];
    let criteria = FilterCriteria {
        search_text: "lamp".to_string(),
        ..FilterCriteria::default()
    };

    let result = apply(&items, &criteria, None);

    assert_eq!(ids(&result), vec!["1", "3"]);
}

#[test]
fn search_covers_description_category_and_owner() {
    let mut by_description = item("1", "A");
    by_description.description = "Solid OAK wood".to_string();
    let mut by_category = item("2", "B");
    by_category.category = Some("Oak furniture".to_string());
    let mut by_owner = item("3", "C");
    by_owner.owner = Some(Owner {
        name: "Mr Oakley".to_string(),
        is_professional: false,
    });
    let unrelated = item("4", "D");
    let items = vec![by_description, by_category, by_owner, unrelated];

    let criteria = FilterCriteria {
        search_text: "  oak ".to_string(),
        ..FilterCriteria::default()
    };

    assert_eq!(ids(&apply(&items, &criteria, None)), vec!["1", "2", "3"]);
}

#[test]
fn all_dimensions_must_match() {
    let mut donation = CanonicalItem::new("d", "Lamp", ItemType::Donation);
    donation.status = "published".to_string();
    let mut product = item("p", "Lamp");
    product.status = "published".to_string();
    let pending = CanonicalItem::new("q", "Lamp", ItemType::Donation);
    let items = vec![donation, product, pending];

    let criteria = FilterCriteria {
        search_text: "lamp".to_string(),
        type_filter: TypeFilter::Only(ItemType::Donation),
        status_filter: StatusFilter::Only("published".to_string()),
    };

    assert_eq!(ids(&apply(&items, &criteria, None)), vec!["d"]);
    assert!(!criteria.is_empty());
    assert!(FilterCriteria::default().is_empty());
}

#[test]
fn no_sort_keeps_input_order_and_input_untouched() {
    let items = vec![item("b", "Zeta"), item("a", "Alpha")];
    let before = items.clone();

    let result = apply(&items, &FilterCriteria::default(), None);

    assert_eq!(result, before);
    assert_eq!(items, before);
}

#[test]
fn string_sort_ignores_case() {
    let items = vec![item("1", "banana"), item("2", "Apple"), item("3", "cherry")];

    let asc = apply(&items, &FilterCriteria::default(), Some(&SortSpec::ascending(SortKey::Title)));
    let desc = apply(&items, &FilterCriteria::default(), Some(&SortSpec::descending(SortKey::Title)));

    assert_eq!(ids(&asc), vec!["2", "1", "3"]);
    assert_eq!(ids(&desc), vec!["3", "1", "2"]);
}

#[test]
fn sort_is_stable_for_equal_keys() {
    let mut items = Vec::new();
    for (id, status) in [("1", "b"), ("2", "a"), ("3", "b"), ("4", "a"), ("5", "b")] {
        let mut entry = item(id, "same");
        entry.status = status.to_string();
        items.push(entry);
    }

    let by_title = apply(&items, &FilterCriteria::default(), Some(&SortSpec::ascending(SortKey::Title)));
    assert_eq!(ids(&by_title), vec!["1", "2", "3", "4", "5"]);

    let by_status = apply(&items, &FilterCriteria::default(), Some(&SortSpec::ascending(SortKey::Status)));
    assert_eq!(ids(&by_status), vec!["2", "4", "1", "3", "5"]);

    let by_status_desc = apply(
        &items,
        &FilterCriteria::default(),
        Some(&SortSpec::descending(SortKey::Status)),
    );
    assert_eq!(ids(&by_status_desc), vec!["1", "3", "5", "2", "4"]);
}

#[test]
fn missing_values_sort_last_in_both_directions() {
    let mut cheap = item("cheap", "x");
    cheap.price = Some(5.0);
    let mut dear = item("dear", "x");
    dear.price = Some(50.0);
    let free = item("unknown", "x");
    let items = vec![free, dear, cheap];

    for (direction, expected) in [
        (SortDirection::Ascending, vec!["cheap", "dear", "unknown"]),
        (SortDirection::Descending, vec!["dear", "cheap", "unknown"]),
    ] {
        let sort = SortSpec {
            key: SortKey::Price,
            direction,
        };
        let result = apply(&items, &FilterCriteria::default(), Some(&sort));
        assert_eq!(ids(&result), expected);
    }
}

#[test]
fn timestamps_sort_chronologically() {
    let mut old = item("old", "x");
    old.created_at = Some(Utc.with_ymd_and_hms(2023, 12, 31, 23, 0, 0).unwrap());
    let mut new = item("new", "x");
    new.created_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    let undated = item("undated", "x");
    let items = vec![undated, new, old];

    let result = apply(
        &items,
        &FilterCriteria::default(),
        Some(&SortSpec::descending(SortKey::CreatedAt)),
    );

    assert_eq!(ids(&result), vec!["new", "old", "undated"]);
}

#[test]
fn applying_twice_is_idempotent() {
    let mut items = numbered(12);
    for (n, entry) in items.iter_mut().enumerate() {
        entry.status = if n % 3 == 0 { "blocked" } else { "active" }.to_string();
        entry.price = (n % 4 != 0).then_some((n * 7 % 5) as f64);
    }
    let criteria = FilterCriteria {
        search_text: "item 1".to_string(),
        status_filter: StatusFilter::Only("active".to_string()),
        ..FilterCriteria::default()
    };
    let sort = SortSpec::descending(SortKey::Price);

    let once = apply(&items, &criteria, Some(&sort));
    let twice = apply(&once, &criteria, Some(&sort));

    assert_eq!(once, twice);
}

#[test]
fn twenty_five_items_make_three_pages() {
    let items = numbered(25);

    let first = paginate(&items, PageSpec::new(1, 10));
    let third = paginate(&items, PageSpec::new(3, 10));

    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total_pages, 3);
    assert_eq!(third.items.len(), 5);
    assert_eq!(third.items[0].id, "id-21");
}

#[test]
fn pages_cover_the_list_exactly_once() {
    for (len, size) in [(0, 3), (1, 1), (7, 3), (9, 3), (25, 10), (4, 10)] {
        let items = numbered(len);
        let total = paginate(&items, PageSpec::new(1, size)).total_pages;
        let rebuilt: Vec<CanonicalItem> = (1..=total)
            .flat_map(|page| paginate(&items, PageSpec::new(page, size)).items.to_vec())
            .collect();
        assert_eq!(rebuilt, items, "len={len} size={size}");
    }
}

#[test]
fn out_of_range_pages_are_clamped() {
    let items = numbered(5);

    let beyond = paginate(&items, PageSpec::new(9, 2));
    assert_eq!(beyond.clamped_page, 3);
    assert_eq!(ids(beyond.items), vec!["id-5"]);

    let empty: Vec<CanonicalItem> = Vec::new();
    let page = paginate(&empty, PageSpec::new(4, 10));
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.clamped_page, 1);
    assert!(page.items.is_empty());
}
