// tests/extract_properties.rs
//
// Extraction against a saved product page and against generated blocks.
use review_scrape::config::options::Alignment;
use review_scrape::specs::reviews::{Absence, DocumentError, Markers, ReviewRecord, extract, extract_with};

const PAGE: &str = include_str!("fixtures/product_page.html");

fn rec(name: &str, rating: &str, title: &str, body: &str) -> ReviewRecord {
    ReviewRecord {
        customer_name: name.into(),
        rating: rating.into(),
        review_title: title.into(),
        review_body: body.into(),
    }
}

fn block(name: &str, rating: &str, title: &str, body: &str) -> String {
    format!(
        r#"<span class="a-profile-name">{name}</span>
           <span class="a-icon-alt">{rating}</span>
           <a class="review-title-content"><span class="a-letter-space"></span><span>{title}</span></a>
           <span data-hook="review-body">{body}</span>"#
    )
}

#[test]
fn saved_page_auto_picks_containers() {
    let x = extract_with(PAGE, &Markers::default(), Alignment::Auto).unwrap();

    assert_eq!(x.stats.alignment, Alignment::Container);
    assert_eq!(x.stats.containers, 4);
    assert_eq!(x.stats.assembled, 4);
    assert_eq!(x.stats.duplicates, 1);
    assert_eq!(
        x.records,
        vec![
            rec("Jane D.", "5.0", "Best blender I've owned", "Crushes ice in seconds. Love it!"),
            rec("Amazon Customer", "1.0", "Broke in a week", "The motor died after six days. Terrible."),
            rec("Mark T.", "4.0", "", "Loud, but it works well."),
        ]
    );
    assert_eq!(x.diagnostics.len(), x.records.len());
    assert_eq!(x.diagnostics[2].review_title, Some(Absence::MarkerMissing));
    assert!(x.diagnostics[0].is_clean() && x.diagnostics[1].is_clean());
}

#[test]
fn saved_page_positional_scan_truncates_and_shifts() {
    let x = extract_with(PAGE, &Markers::default(), Alignment::Positional).unwrap();

    assert_eq!(x.stats.alignment, Alignment::Positional);
    assert_eq!((x.stats.names, x.stats.ratings, x.stats.titles, x.stats.bodies), (4, 5, 3, 4));
    assert_eq!(x.stats.truncated, 4);
    assert_eq!(x.records.len(), 3);
    // the product summary rating lands on the first reviewer
    assert_eq!(x.records[0].rating, "4.4");
    assert_eq!(x.records[2].review_title, "It's fine");
}

#[test]
fn forced_container_mode_on_a_page_without_containers_is_empty() {
    let html = format!("<body>{}</body>", block("Ann", "5.0 out of 5 stars", "T", "B"));
    let x = extract_with(&html, &Markers::default(), Alignment::Container).unwrap();
    assert!(x.records.is_empty());
    assert_eq!(extract(&html).unwrap().len(), 1);
}

#[test]
fn default_extract_is_positional_even_with_containers() {
    let recs = extract(PAGE).unwrap();
    assert_eq!(recs.len(), 3);
    assert_eq!(recs[0].rating, "4.4");
}

#[test]
fn no_rating_markers_means_no_records_even_in_containers() {
    let html = r#"<body><div data-hook="review">
          <span class="a-profile-name">Ann</span>
          <a class="review-title-content"><span class="a-letter-space"></span><span>T</span></a>
          <span data-hook="review-body">B</span>
        </div></body>"#;
    assert!(extract(html).unwrap().is_empty());
    // opting into containers keeps the record with an empty rating
    let x = extract_with(html, &Markers::default(), Alignment::Container).unwrap();
    assert_eq!(x.records, vec![rec("Ann", "", "T", "B")]);
}

#[test]
fn output_length_is_bounded_by_every_marker_count() {
    // 3 names, 2 ratings, 3 titles, 3 bodies
    let html = format!(
        "<body>{}{}<span class=\"a-profile-name\">Cy</span>\
         <a class=\"review-title-content\"><span class=\"a-letter-space\"></span><span>T3</span></a>\
         <span data-hook=\"review-body\">B3</span></body>",
        block("Ann", "5.0", "T1", "B1"),
        block("Bob", "2.0", "T2", "B2"),
    );
    let recs = extract(&html).unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[1], rec("Bob", "2.0", "T2", "B2"));
}

#[test]
fn names_are_unique_and_first_wins() {
    let html = format!(
        "<body>{}{}{}</body>",
        block("Ann", "5.0", "first", "x"),
        block("Bob", "3.0", "b", "y"),
        block("Ann", "1.0", "second", "z"),
    );
    let recs = extract(&html).unwrap();
    let names: Vec<&str> = recs.iter().map(|r| r.customer_name.as_str()).collect();
    assert_eq!(names, vec!["Ann", "Bob"]);
    assert_eq!(recs[0].review_title, "first");
}

#[test]
fn ratings_are_decimal_or_empty() {
    let html = format!(
        "<body>{}{}{}</body>",
        block("A", "4.5 out of 5 stars", "t", "b"),
        block("B", "Five stars", "t", "b"),
        block("C", "rated 3 of 5, really 3.25", "t", "b"),
    );
    let ratings: Vec<String> = extract(&html).unwrap().into_iter().map(|r| r.rating).collect();
    assert_eq!(ratings, vec!["4.5", "", "3.25"]);
}

#[test]
fn markup_free_or_empty_documents_fail() {
    assert_eq!(extract(""), Err(DocumentError::Empty));
    assert_eq!(extract("just some words, 4.5 stars"), Err(DocumentError::NoMarkup));
}

#[test]
fn repeated_runs_agree() {
    let a = extract_with(PAGE, &Markers::default(), Alignment::Auto).unwrap();
    let b = extract_with(PAGE, &Markers::default(), Alignment::Auto).unwrap();
    assert_eq!(a, b);
}

#[test]
fn container_missing_a_rating_keeps_the_record() {
    let html = r#"<body>
        <div data-hook="review">
          <span class="a-profile-name">Ann</span>
          <a class="review-title-content"><span class="a-letter-space"></span><span>No stars</span></a>
          <span data-hook="review-body">Forgot to rate</span>
        </div></body>"#;
    let x = extract_with(html, &Markers::default(), Alignment::Auto).unwrap();
    assert_eq!(x.records, vec![rec("Ann", "", "No stars", "Forgot to rate")]);
    assert_eq!(x.diagnostics[0].rating, Some(Absence::MarkerMissing));
}
