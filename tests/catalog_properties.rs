use std::collections::HashSet;

use opensase_catalog::domain::query::{sort_products, Page};
use opensase_catalog::domain::synthesis::synthesize;
use opensase_catalog::fallback::static_tree;
use opensase_catalog::{
    find_branch, flatten, resolve_image_url, CategoryFilter, CategoryNode, ImageFormat, ItemDescriptor, Listing, PageSize,
    PriceRange, QueryState, SortKey,
};
use serde_json::json;

const BASE: &str = "https://cdn.example";

#[test]
fn synthesizer_is_deterministic() {
    let tree = static_tree();
    for sub in tree.iter().flat_map(|c| &c.children) {
        for (i, item) in sub.children.iter().enumerate() {
            assert_eq!(synthesize(item, i, &sub.id), synthesize(item, i, &sub.id));
        }
    }
    assert_eq!(flatten(&tree, BASE), flatten(&tree, BASE));
}

#[test]
fn every_product_points_back_into_the_tree() {
    let tree = static_tree();
    for p in flatten(&tree, BASE) {
        let branch = find_branch(&tree, &p.category.sub_category_id).expect("subcategory exists");
        assert_eq!(branch.parent_category.id, p.category.parent_id);
        assert_eq!(branch.items[p.position].name, p.name);
    }
}

#[test]
fn filters_only_ever_remove_items() {
    let products = flatten(&static_tree(), BASE);
    let all_ids: HashSet<_> = products.iter().map(|p| p.id.clone()).collect();
    let listing = Listing::new(&products, PageSize::new(100).unwrap());
    let window = listing.price_window().unwrap();

    for category in ["all", "noi-that", "den-trang-tri", "khong-co"] {
        for rating in [None, Some(4.5), Some(5.5)] {
            let state = QueryState {
                category: CategoryFilter::from_param(Some(category)),
                price_range: Some(window.narrow(Some(1_500_000), None)),
                rating,
                ..Default::default()
            };
            let out = listing.run(&state);
            assert!(out.page.items.iter().all(|p| all_ids.contains(&p.id)));
            assert!(out.page.items.iter().all(|p| p.price >= 1_500_000));
        }
    }
}

#[test]
fn default_sort_keeps_order_and_price_asc_is_non_decreasing() {
    let products = flatten(&static_tree(), BASE);
    let ids = |v: &[opensase_catalog::ProductViewModel]| v.iter().map(|p| p.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&sort_products(products.clone(), SortKey::Default)), ids(&products));
    let asc = sort_products(products, SortKey::PriceAsc);
    assert!(asc.windows(2).all(|w| w[0].price <= w[1].price));
}

#[test]
fn pages_cover_the_list_exactly_once() {
    let products = flatten(&static_tree(), BASE);
    for size in [1, 3, 5, 7, 16, 20] {
        let size = PageSize::new(size).unwrap();
        let listing = Listing::new(&products, size);
        let first = listing.run(&QueryState { sort: SortKey::Popular, ..Default::default() });
        let mut seen = Vec::new();
        for page in 1..=first.page.total_pages {
            seen.extend(listing.run(&QueryState { sort: SortKey::Popular, page, ..Default::default() }).page.items);
        }
        assert_eq!(seen, sort_products(products.clone(), SortKey::Popular));
    }
}

#[test]
fn seed_from_first_character_sets_price() {
    let item = ItemDescriptor { name: "Ghế".into(), href: "/p".into(), ..Default::default() };
    assert_eq!(synthesize(&item, 0, "ghe-va-tua").price, 1_300_000);
}

#[test]
fn page_three_of_five_with_size_two() {
    let items: Vec<u32> = (0..5).collect();
    let size = PageSize::new(2).unwrap();
    let third = Page::slice(&items, 3, size);
    assert_eq!(third.items, vec![4]);
    assert_eq!(third.total_pages, 3);
    assert!(Page::slice(&items, 4, size).items.is_empty());
}

#[test]
fn medium_only_image_depends_on_call_site_chain() {
    let descriptor = json!({ "formats": { "medium": { "url": "/img/m.png" } } });
    let with_medium = [ImageFormat::Large, ImageFormat::Medium, ImageFormat::Small];
    assert_eq!(resolve_image_url(&descriptor, BASE, &with_medium), "https://cdn.example/img/m.png");
    assert_eq!(resolve_image_url(&descriptor, BASE, &[ImageFormat::Large]), "");
}

#[test]
fn observed_window_spans_every_price() {
    let products = flatten(&static_tree(), BASE);
    let window = PriceRange::observed(products.iter().map(|p| p.price)).unwrap();
    assert!(products.iter().all(|p| window.contains(p.price)));
}

#[test]
fn oversized_backend_prices_never_panic() {
    let raw = json!([{
        "id": "noi-that",
        "name": "Nội thất",
        "children": [{
            "id": "ghe-va-tua",
            "name": "Ghế",
            "items": [
                { "name": "Ghế vàng", "href": "/p/vang", "price": 18446744073709551615u64 },
                { "name": "Ghế kim cương", "href": "/p/kim-cuong", "price": 1e30 },
                { "name": "Ghế bạc", "href": "/p/bac", "price": 1000, "originalPrice": 1e30 }
            ]
        }]
    }]);
    let products = flatten(&CategoryNode::tree_from_json(&raw), BASE);
    assert_eq!(products.len(), 3);
    assert_eq!((products[0].price, products[0].original_price), (u64::MAX, None));
    assert_eq!((products[1].price, products[1].original_price), (u64::MAX, None));
    assert_eq!(products[2].original_price, Some(u64::MAX));

    let listing = Listing::new(&products, PageSize::default());
    let desc = listing.run(&QueryState { sort: SortKey::PriceDesc, ..Default::default() });
    assert_eq!(desc.page.items[2].name, "Ghế bạc");
}

#[test]
fn newest_and_popular_sort_descending() {
    let products = flatten(&static_tree(), BASE);
    let newest = sort_products(products.clone(), SortKey::Newest);
    assert!(newest.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    assert!(newest.windows(2).any(|w| w[0].created_at > w[1].created_at));

    let popular = sort_products(products.clone(), SortKey::Popular);
    assert!(popular.windows(2).all(|w| w[0].popularity >= w[1].popularity));
    assert!(popular.windows(2).any(|w| w[0].popularity > w[1].popularity));

    let rated = sort_products(products, SortKey::Rating);
    assert!(rated.windows(2).all(|w| w[0].rating >= w[1].rating));
}
