use chrono::{DateTime, TimeZone, Utc};
use stagefront_core::{
    apply, QueryError, QuerySpec, SamplePack, SortOrder, Track, TrackCategory,
};

fn ts(s: &str) -> DateTime<Utc> {
    s.parse().expect("fixture timestamp")
}

fn track(id: &str, title: &str, artist: &str, category: &str, published: &str) -> Track {
    Track {
        id: id.to_string(),
        title: title.to_string(),
        slug: title.to_lowercase().replace(' ', "-"),
        artist_name: artist.to_string(),
        cover_art: None,
        category: TrackCategory::from(category.to_string()),
        track_type: None,
        genre: None,
        release_date: None,
        streaming_links: Vec::new(),
        download_link: None,
        description: None,
        featured: false,
        published_at: ts(published),
    }
}

fn pack(id: &str, name: &str, price: f64, genre: &str) -> SamplePack {
    SamplePack {
        id: id.to_string(),
        name: name.to_string(),
        slug: name.to_lowercase().replace(' ', "-"),
        cover_image: None,
        description: format!("{name} description"),
        genre: Some(genre.to_string()),
        bpm: None,
        key: None,
        sample_count: Some(50),
        pack_size: None,
        tags: vec!["drums".to_string()],
        price,
        gumroad_url: None,
        preview_audio: None,
        featured: false,
        is_active: true,
        published_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

fn flat_ids(out: &stagefront_core::QueryOutput<SamplePack>) -> Vec<String> {
    out.as_flat()
        .expect("flat output")
        .iter()
        .map(|p| p.id.clone())
        .collect()
}

#[test]
fn empty_spec_is_the_identity_filter() {
    let tracks = vec![
        track("a", "Midnight Drive", "Nova", "remixes", "2024-01-01T00:00:00Z"),
        track("b", "Dawn Patrol", "Nova", "full-mixes", "2024-02-01T00:00:00Z"),
        track("c", "Afterglow", "Vee", "remixes", "2024-03-01T00:00:00Z"),
    ];
    let out = apply(&tracks, &QuerySpec::default()).unwrap();
    let ids: Vec<&str> = out.as_flat().unwrap().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"], "original relative order kept");
}

#[test]
fn search_is_case_insensitive_substring_without_trimming() {
    let tracks = vec![track(
        "a",
        "Midnight Drive",
        "Nova",
        "remixes",
        "2024-01-01T00:00:00Z",
    )];

    let hit = apply(&tracks, &QuerySpec::default().search("MIDNIGHT")).unwrap();
    assert_eq!(hit.len(), 1);

    // Trailing space is a literal part of the term.
    let miss = apply(&tracks, &QuerySpec::default().search("drive ")).unwrap();
    assert!(miss.is_empty());

    // Whitespace-only terms are real terms, not "no filter".
    let ws = apply(&tracks, &QuerySpec::default().search("   ")).unwrap();
    assert!(ws.is_empty());
}

#[test]
fn search_matches_any_tag_element() {
    let mut p = pack("p1", "Night Kit", 20.0, "house");
    p.tags = vec!["analog".to_string(), "vinyl crackle".to_string()];
    let out = apply(&[p], &QuerySpec::default().search("CRACKLE")).unwrap();
    assert_eq!(out.len(), 1);
}

#[test]
fn equality_filter_with_empty_value_is_inert() {
    let packs = vec![pack("p1", "A", 10.0, "house"), pack("p2", "B", 20.0, "techno")];
    let all = apply(&packs, &QuerySpec::default().filter_eq("genre", "")).unwrap();
    assert_eq!(all.len(), 2);
    let house = apply(&packs, &QuerySpec::default().filter_eq("genre", "house")).unwrap();
    assert_eq!(flat_ids(&house), vec!["p1"]);
}

#[test]
fn range_bounds_are_inclusive() {
    let packs: Vec<SamplePack> = [0.0, 10.0, 25.0, 50.0, 100.0]
        .iter()
        .enumerate()
        .map(|(i, price)| pack(&format!("p{i}"), &format!("Pack {i}"), *price, "house"))
        .collect();
    let out = apply(
        &packs,
        &QuerySpec::default().range("price", Some(10.0), Some(50.0)),
    )
    .unwrap();
    let prices: Vec<f64> = out.as_flat().unwrap().iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![10.0, 25.0, 50.0]);
}

#[test]
fn inverted_range_yields_empty_not_error() {
    let packs = vec![pack("p1", "A", 25.0, "house")];
    let out = apply(
        &packs,
        &QuerySpec::default().range("price", Some(50.0), Some(10.0)),
    )
    .unwrap();
    assert!(out.is_empty());
}

#[test]
fn sort_is_stable_for_equal_keys_in_both_directions() {
    let same = "2024-06-01T00:00:00Z";
    let tracks = vec![
        track("a", "First In", "Nova", "remixes", same),
        track("b", "Second In", "Nova", "remixes", same),
    ];
    for order in [SortOrder::Ascending, SortOrder::Descending] {
        let out = apply(&tracks, &QuerySpec::sorted_by("publishedAt", order)).unwrap();
        let ids: Vec<&str> = out.as_flat().unwrap().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"], "equal keys keep input order ({order:?})");
    }
}

#[test]
fn missing_sort_value_sorts_below_present_values() {
    let mut with_genre = pack("p1", "A", 10.0, "house");
    with_genre.genre = Some("ambient".to_string());
    let mut without_genre = pack("p2", "B", 10.0, "house");
    without_genre.genre = None;

    let packs = vec![with_genre, without_genre];
    let asc = apply(&packs, &QuerySpec::sorted_by("genre", SortOrder::Ascending)).unwrap();
    assert_eq!(flat_ids(&asc), vec!["p2", "p1"]);
    let desc = apply(&packs, &QuerySpec::sorted_by("genre", SortOrder::Descending)).unwrap();
    assert_eq!(flat_ids(&desc), vec!["p1", "p2"]);
}

#[test]
fn title_sort_collates_case_insensitively() {
    let tracks = vec![
        track("a", "alpha", "Nova", "remixes", "2024-01-01T00:00:00Z"),
        track("b", "Beta", "Nova", "remixes", "2024-01-02T00:00:00Z"),
        track("c", "Zulu", "Nova", "remixes", "2024-01-03T00:00:00Z"),
    ];
    let out = apply(&tracks, &QuerySpec::sorted_by("title", SortOrder::Ascending)).unwrap();
    let titles: Vec<&str> = out
        .as_flat()
        .unwrap()
        .iter()
        .map(|t| t.title.as_str())
        .collect();
    assert_eq!(titles, vec!["alpha", "Beta", "Zulu"]);
}

#[test]
fn grouping_drops_unknown_categories_but_flat_keeps_them() {
    let tracks = vec![
        track("a", "One", "Nova", "remixes", "2024-01-01T00:00:00Z"),
        track("b", "Two", "Nova", "unlisted", "2024-01-02T00:00:00Z"),
        track("c", "Three", "Nova", "full-mixes", "2024-01-03T00:00:00Z"),
    ];

    let flat = apply(&tracks, &QuerySpec::default()).unwrap();
    assert_eq!(flat.len(), 3);

    let grouped = apply(&tracks, &QuerySpec::default().grouped_by("category")).unwrap();
    let buckets = grouped.as_grouped().unwrap();
    let names: Vec<&str> = buckets.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["remixes", "mashups-edits", "full-mixes"]);
    assert_eq!(grouped.len(), 2, "`unlisted` absent from every bucket");
    assert!(buckets.iter().all(|b| b.items.iter().all(|t| t.id != "b")));
    // Empty buckets still appear.
    assert!(buckets[1].items.is_empty());
}

#[test]
fn grouping_preserves_sorted_order_within_buckets() {
    let tracks = vec![
        track("old", "Old Mix", "Nova", "remixes", "2023-01-01T00:00:00Z"),
        track("new", "New Mix", "Nova", "remixes", "2024-01-01T00:00:00Z"),
    ];
    let spec = QuerySpec::sorted_by("publishedAt", SortOrder::Descending).grouped_by("category");
    let out = apply(&tracks, &spec).unwrap();
    let remixes = &out.as_grouped().unwrap()[0];
    let ids: Vec<&str> = remixes.items.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["new", "old"]);
}

#[test]
fn end_to_end_pack_scenario() {
    let packs = vec![
        pack("1", "Trap Kit", 0.0, "trap"),
        pack("2", "House Kit", 15.0, "house"),
        pack("3", "Techno Kit", 30.0, "techno"),
    ];
    let spec = QuerySpec::sorted_by("price", SortOrder::Descending)
        .search("kit")
        .range("price", Some(10.0), None);
    let out = apply(&packs, &spec).unwrap();
    assert_eq!(flat_ids(&out), vec!["3", "2"]);
}

#[test]
fn unknown_fields_fail_fast() {
    let packs = vec![pack("p1", "A", 10.0, "house")];

    let bad_sort = apply(&packs, &QuerySpec::sorted_by("bpmRange", SortOrder::Ascending));
    assert!(matches!(
        bad_sort,
        Err(QueryError::UnknownSortField { field, .. }) if field == "bpmRange"
    ));

    let bad_filter = apply(&packs, &QuerySpec::default().filter_eq("mood", "dark"));
    assert!(matches!(
        bad_filter,
        Err(QueryError::UnknownFilterField { field, .. }) if field == "mood"
    ));

    let bad_range = apply(&packs, &QuerySpec::default().range("tempo", Some(1.0), None));
    assert!(matches!(
        bad_range,
        Err(QueryError::UnknownRangeField { field, .. }) if field == "tempo"
    ));

    // Packs have no closed taxonomy; genre is filterable but not groupable.
    let bad_group = apply(&packs, &QuerySpec::default().grouped_by("genre"));
    assert!(matches!(
        bad_group,
        Err(QueryError::UnknownGroupField { field, .. }) if field == "genre"
    ));
}

#[test]
fn malformed_records_are_skipped_not_fatal() {
    let bad = pack("", "Ghost Pack", 5.0, "house");
    let packs = vec![pack("p1", "A", 10.0, "house"), bad];
    let out = apply(&packs, &QuerySpec::default()).unwrap();
    assert_eq!(flat_ids(&out), vec!["p1"]);
}

#[test]
fn pipeline_never_mutates_input() {
    let packs = vec![
        pack("p2", "B", 20.0, "techno"),
        pack("p1", "A", 10.0, "house"),
    ];
    let before: Vec<String> = packs.iter().map(|p| p.id.clone()).collect();
    let _ = apply(&packs, &QuerySpec::sorted_by("price", SortOrder::Ascending)).unwrap();
    let after: Vec<String> = packs.iter().map(|p| p.id.clone()).collect();
    assert_eq!(before, after);
}
