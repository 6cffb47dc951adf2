use boxbonk::*;
use proptest::prelude::*;

fn boxes() -> impl Strategy<Value = Vec<(i32, i32, u8, u8)>> {
    // some boxes poke outside the 256px tree on purpose
    prop::collection::vec((-20i32..270, -20i32..270, 1u8..60, 1u8..60), 0..80)
}

fn build(
    layout: &[(i32, i32, u8, u8)],
    depth: u32,
) -> (QuadTree, LinearIndex) {
    let mut tree = QuadTree::new(256.0, depth);
    let mut linear = LinearIndex::new();
    for (i, &(l, t, w, h)) in layout.iter().enumerate() {
        let c = Collision2D::new(
            format!("box_{i}"),
            Rect::new(l as f32, w as f32, t as f32, h as f32),
        );
        tree.add_collision(c.clone());
        linear.add_collision(c);
    }
    (tree, linear)
}

fn ids<'a>(hits: &[&'a Collision2D]) -> Vec<&'a str> {
    let mut out: Vec<_> = hits.iter().map(|c| c.id()).collect();
    out.sort_unstable();
    out
}

proptest! {
    #[test]
    fn quadtree_matches_linear_scan(
        layout in boxes(),
        depth in 1u32..7,
        probe in (-20i32..270, -20i32..270, 1u8..120, 1u8..120),
    ) {
        let (tree, linear) = build(&layout, depth);
        let query = Collision2D::new(
            "probe",
            Rect::new(probe.0 as f32, probe.2 as f32, probe.1 as f32, probe.3 as f32),
        );

        let mut from_tree = Vec::new();
        tree.check_for_collision(&query, &mut from_tree, None);
        let mut from_list = Vec::new();
        linear.check_for_collision(&query, &mut from_list, None);

        // reported once each
        let tree_ids = ids(&from_tree);
        let mut unique = tree_ids.clone();
        unique.dedup();
        prop_assert_eq!(&tree_ids, &unique);
        prop_assert_eq!(tree_ids, ids(&from_list));
    }

    #[test]
    fn quadtree_matches_linear_scan_after_edits(
        initial in boxes(),
        edits in prop::collection::vec(
            (0u8..3, 0usize..40, (-20i32..270, -20i32..270, 1u8..60, 1u8..60)),
            0..60,
        ),
        probes in prop::collection::vec((-20i32..270, -20i32..270, 1u8..120, 1u8..120), 1..8),
    ) {
        let (mut tree, mut linear) = build(&initial, 5);
        for (op, n, (l, t, w, h)) in edits {
            let id = format!("box_{n}");
            match op {
                // add a new box or move an existing one
                0 | 1 => {
                    let c = Collision2D::new(id, Rect::new(l as f32, w as f32, t as f32, h as f32));
                    tree.add_collision(c.clone());
                    linear.add_collision(c);
                }
                _ => {
                    let a = tree.remove_collision(&id).map(|c| c.id().to_owned());
                    let b = linear.remove_collision(&id).map(|c| c.id().to_owned());
                    prop_assert_eq!(a, b);
                }
            }
        }
        prop_assert_eq!(tree.len(), linear.len());

        for p in probes {
            let query = Collision2D::new(
                "probe",
                Rect::new(p.0 as f32, p.2 as f32, p.1 as f32, p.3 as f32),
            );
            let mut from_tree = Vec::new();
            tree.check_for_collision(&query, &mut from_tree, None);
            let mut from_list = Vec::new();
            linear.check_for_collision(&query, &mut from_list, None);
            prop_assert_eq!(ids(&from_tree), ids(&from_list));
        }
    }

    #[test]
    fn registered_boxes_do_not_see_themselves(layout in boxes()) {
        let (tree, _) = build(&layout, 4);
        for c in tree.iter() {
            let hits = tree.query(c, None);
            prop_assert!(hits.iter().all(|h| h.id() != c.id()));
        }
    }

    #[test]
    fn overlap_is_symmetric(
        a in (-50i32..50, -50i32..50, 1u8..40, 1u8..40),
        b in (-50i32..50, -50i32..50, 1u8..40, 1u8..40),
    ) {
        let ra = Rect::new(a.0 as f32, a.2 as f32, a.1 as f32, a.3 as f32);
        let rb = Rect::new(b.0 as f32, b.2 as f32, b.1 as f32, b.3 as f32);
        prop_assert_eq!(ra.intersects(&rb), rb.intersects(&ra));
        prop_assert_eq!(ra.touches(&rb), rb.touches(&ra));
        // open overlap implies closed contact
        prop_assert!(!ra.intersects(&rb) || ra.touches(&rb));
        prop_assert!(ra.contains(&ra));
        prop_assert!(!ra.encapsulates(&ra));
    }

    #[test]
    fn shared_edge_touches_without_overlap(
        l in -100i32..100, t in -100i32..100, w in 1u8..50, h in 1u8..50, w2 in 1u8..50,
    ) {
        let a = Rect::new(l as f32, w as f32, t as f32, h as f32);
        let b = Rect::new(a.right(), w2 as f32, t as f32, h as f32);
        prop_assert!(!a.intersects(&b));
        prop_assert!(a.touches(&b));
        prop_assert_eq!(a.edge_overlap_x(&b), 0.0);
    }
}

#[test]
fn empty_indexes_report_nothing() {
    let (tree, linear) = build(&[], 5);
    let query = Collision2D::new("probe", Rect::new(0.0, 256.0, 256.0, 256.0));
    let mut stats = QueryAnalytics::default();
    assert!(tree.query(&query, Some(&mut stats)).is_empty());
    assert_eq!(stats.intersection_tests, 0);
    let mut out = Vec::new();
    linear.check_for_collision(&query, &mut out, None);
    assert!(out.is_empty());
}
