use super::*;

#[test]
fn resolve_applies_defaults() {
    let req = PageParams::default().resolve(700).unwrap();
    assert_eq!(req, PageRequest::new(700, 0));

    let req = PageParams::new(Some(2), Some(4)).resolve(50).unwrap();
    assert_eq!(req.limit, 2);
    assert_eq!(req.offset, 4);
}

#[test]
fn resolve_rejects_negative_values() {
    assert_eq!(
        PageParams::new(Some(-1), None).resolve(50),
        Err(PageError::NegativeLimit(-1))
    );
    assert_eq!(
        PageParams::new(None, Some(-3)).resolve(50),
        Err(PageError::NegativeOffset(-3))
    );
}

#[test]
fn zero_limit_is_valid_and_empty() {
    let req = PageParams::new(Some(0), None).resolve(50).unwrap();
    assert!(req.is_empty());
}

#[test]
fn empty_needle_is_no_filter() {
    assert!(TextFilter::new("").is_none());
    assert!(TextFilter::from_param(None).is_none());
    assert!(TextFilter::from_param(Some("")).is_none());
}

#[test]
fn text_filter_is_case_insensitive_substring() {
    let f = TextFilter::new("AnN").unwrap();
    assert_eq!(f.needle(), "ann");
    assert!(f.matches(Some("Ann")));
    assert!(f.matches(Some("JOANNE")));
    assert!(!f.matches(Some("Ana-Lee")));
    assert!(!f.matches(None));
}

#[test]
fn text_filter_folds_ascii_only() {
    let f = TextFilter::new("ÉMILE").unwrap();
    assert_eq!(f.needle(), "Émile");
    assert!(f.matches(Some("Émile")));
    assert!(f.matches(Some("ÉMILE ZOLA")));
    assert!(!f.matches(Some("émile")));

    let tail = TextFilter::new("MILE").unwrap();
    assert!(tail.matches(Some("Émile")));
}

#[test]
fn like_pattern_escapes_wildcards() {
    let f = TextFilter::new("50%_off\\").unwrap();
    assert_eq!(f.like_pattern('\\'), "%50\\%\\_off\\\\%");

    let plain = TextFilter::new("lee").unwrap();
    assert_eq!(plain.like_pattern('\\'), "%lee%");
}

#[test]
fn map_items_keeps_page_info() {
    let page = Page::new(
        vec![1, 2, 3],
        PageInfo {
            limit: 3,
            offset: 6,
            total: 10,
        },
    );
    let mapped = page.map_items(|n| n.to_string());
    assert_eq!(mapped.items, vec!["1", "2", "3"]);
    assert_eq!(mapped.page_info.offset, 6);
    assert_eq!(mapped.page_info.total, 10);
    assert_eq!(mapped.count(), 3);
}

#[test]
fn page_serializes_with_page_info() {
    let page: Page<u8> = Page::empty(PageRequest::new(0, 0), 5);
    let v = serde_json::to_value(&page).unwrap();
    assert_eq!(v["items"], serde_json::json!([]));
    assert_eq!(v["page_info"]["total"], 5);
}
