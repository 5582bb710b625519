//! Integration test: route composition, selection, and expiry across
//! liqroute-core and liqroute-routing.

use chrono::Duration;
use liqroute_integration_tests::*;
use liqroute_routing::create_readvertisement;

// =========================================================================
// Local pairs
// =========================================================================

#[test]
fn test_local_pairs_chain_without_skipping() {
    let mut table = mark_table();
    table
        .add_local_routes(
            &[
                advert(LEDGER_B, LEDGER_C, MARK, &[(0.0, 0.0), (100.0, 200.0)]),
                advert(LEDGER_C, LEDGER_D, MARK, &[(0.0, 0.0), (100.0, 200.0)]),
            ],
            start(),
        )
        .expect("valid local routes");
    assert!(table
        .add_route(&advert(LEDGER_D, LEDGER_E, MARY, &[(0.0, 0.0), (100.0, 200.0)]), start())
        .unwrap());

    // A -> B -> C
    let quote = table
        .quote_by_source_amount(LEDGER_A, LEDGER_C, "20")
        .unwrap()
        .expect("route A -> C");
    assert_eq!(quote.connector, MARK);
    assert_eq!(quote.destination_ledger, LEDGER_B);
    assert_eq!(quote.final_amount, "20");
    assert_eq!(quote.min_message_window, 2);

    // A -> B -> C -> D -> E. A -> D is not a pair even though its legs are local.
    let quote = table
        .quote_by_source_amount(LEDGER_A, LEDGER_E, "20")
        .unwrap()
        .expect("route A -> E");
    assert_eq!(quote.connector, MARK);
    assert_eq!(quote.destination_ledger, LEDGER_B);
    assert_eq!(quote.final_amount, "80");
    assert_eq!(quote.min_message_window, 4);

    // C -> D -> E
    let quote = table
        .quote_by_source_amount(LEDGER_C, LEDGER_E, "20")
        .unwrap()
        .expect("route C -> E");
    assert_eq!(quote.connector, MARY);
    assert_eq!(quote.destination_ledger, LEDGER_D);
    assert_eq!(quote.final_amount, "80");
    assert_eq!(quote.min_message_window, 2);
}

#[test]
fn test_local_pair_is_not_overridden_by_local_detour() {
    let mut table = mark_table();
    table
        .add_local_routes(
            &[
                advert(LEDGER_A, LEDGER_C, MARK, &[(0.0, 0.0), (100.0, 999.0)]),
                advert(LEDGER_C, LEDGER_B, MARK, &[(0.0, 0.0), (100.0, 999.0)]),
            ],
            start(),
        )
        .unwrap();

    for (amount, expected) in [(100.0, 50.0), (200.0, 100.0)] {
        let best = table
            .find_best_connector_for_source_amount(LEDGER_A, LEDGER_B, amount)
            .unwrap();
        assert_eq!(best.connector, MARK);
        assert_eq!(best.amount, expected);
    }
}

// =========================================================================
// Peer advertisements
// =========================================================================

#[test]
fn test_no_route_back_to_source() {
    let table = mark_table();
    assert_eq!(table.routes_for(LEDGER_A, LEDGER_A).count(), 0);
}

#[test]
fn test_no_detour_through_peer_route() {
    let mut table = mark_table();
    // Implicitly creates A -> C.
    assert!(table
        .add_route(&advert(LEDGER_B, LEDGER_C, MARY, &[(0.0, 0.0), (50.0, 60.0)]), start())
        .unwrap());
    // A -> C is not local, so this must not create A -> C -> B.
    assert!(!table
        .add_route(&advert(LEDGER_C, LEDGER_B, MARY, &[(0.0, 0.0), (200.0, 100.0)]), start())
        .unwrap());
    assert!(table.get(LEDGER_A, LEDGER_B, MARY).is_none());
}

#[test]
fn test_peer_cannot_override_local_pair() {
    let mut table = mark_table();
    assert!(!table
        .add_route(&advert(LEDGER_A, LEDGER_B, MARY, &[(0.0, 0.0), (200.0, 9999.0)]), start())
        .unwrap());
    assert!(table.get(LEDGER_A, LEDGER_B, MARY).is_none());
}

#[test]
fn test_readvertised_peer_route_refreshes_expiry() {
    let mut table = mark_table();
    let mary = advert(LEDGER_B, LEDGER_C, MARY, &[(0.0, 0.0), (50.0, 60.0)]);
    assert!(table.add_route(&mary, start()).unwrap());

    let later = start() + Duration::seconds(30);
    assert!(table.add_route(&mary, later).unwrap());
    assert_eq!(table.remove_expired_routes(start() + Duration::milliseconds(45_001)), 0);
    assert_eq!(table.remove_expired_routes(later + Duration::milliseconds(45_001)), 1);
}

// =========================================================================
// Best hop selection
// =========================================================================

#[test]
fn test_best_hop_single_route() {
    let table = mark_table();
    for (amount, expected) in [(0.0, 0.0), (100.0, 50.0), (200.0, 100.0), (300.0, 100.0)] {
        let best = table
            .find_best_connector_for_source_amount(LEDGER_A, LEDGER_B, amount)
            .unwrap();
        assert_eq!(best.connector, MARK);
        assert_eq!(best.amount, expected, "source amount {amount}");
    }
    let best = table
        .find_best_connector_for_source_amount(LEDGER_B, LEDGER_A, 100.0)
        .unwrap();
    assert_eq!(best.amount, 200.0);
}

#[test]
fn test_best_hop_multiple_hops() {
    let mut table = mark_table();
    table
        .add_route(&advert(LEDGER_B, LEDGER_C, MARY, &[(0.0, 0.0), (200.0, 100.0)]), start())
        .unwrap();
    let best = table
        .find_best_connector_for_source_amount(LEDGER_A, LEDGER_C, 100.0)
        .unwrap();
    assert_eq!(best.connector, MARY);
    assert_eq!(best.amount, 25.0);
}

#[test]
fn test_best_hop_multiple_routes() {
    let mut table = mark_table();
    table
        .add_route(&advert(LEDGER_B, LEDGER_C, MARY, &[(0.0, 0.0), (50.0, 60.0)]), start())
        .unwrap();
    table
        .add_route(&advert(LEDGER_B, LEDGER_C, MARTIN, &[(0.0, 0.0), (100.0, 100.0)]), start())
        .unwrap();

    let cases = [(100.0, MARY, 60.0), (150.0, MARTIN, 75.0), (200.0, MARTIN, 100.0)];
    for (amount, connector, expected) in cases {
        let best = table
            .find_best_connector_for_source_amount(LEDGER_A, LEDGER_C, amount)
            .unwrap();
        assert_eq!(best.connector, connector, "source amount {amount}");
        assert_eq!(best.amount, expected);
    }
}

#[test]
fn test_best_hop_by_destination_amount() {
    let table = mark_table();
    for (amount, cost) in [(0.0, 0.0), (50.0, 100.0), (100.0, 200.0)] {
        let best = table
            .find_best_connector_for_destination_amount(LEDGER_A, LEDGER_B, amount)
            .unwrap();
        assert_eq!(best.connector, MARK);
        assert_eq!(best.amount, cost, "destination amount {amount}");
    }
    assert!(table
        .find_best_connector_for_destination_amount(LEDGER_A, LEDGER_B, 150.0)
        .is_none());
    let best = table
        .find_best_connector_for_destination_amount(LEDGER_B, LEDGER_A, 200.0)
        .unwrap();
    assert_eq!(best.amount, 100.0);
}

// =========================================================================
// Expiry and export
// =========================================================================

#[test]
fn test_expires_old_routes() {
    let mut table = mark_table();
    table
        .add_route(&advert(LEDGER_B, LEDGER_C, MARY, &[(0.0, 0.0), (50.0, 60.0)]), start())
        .unwrap();

    assert_eq!(table.export(10).len(), 3);
    table.remove_expired_routes(start());
    assert_eq!(table.export(10).len(), 3);

    table.remove_expired_routes(start() + Duration::milliseconds(45_001));
    assert_eq!(table.export(10).len(), 2);

    // Local pairs never expire.
    table.remove_expired_routes(start() + Duration::days(3650));
    assert_eq!(table.size(), 2);
}

#[test]
fn test_readvertisement_combines_connectors() {
    let mut table = mark_table();
    table
        .add_route(&advert(LEDGER_B, LEDGER_C, MARY, &[(0.0, 0.0), (50.0, 60.0)]), start())
        .unwrap();
    table
        .add_route(
            &advert(LEDGER_B, LEDGER_C, MARTIN, &[(0.0, 0.0), (100.0, 100.0)])
                .with_min_message_window(2),
            start(),
        )
        .unwrap();

    let routes = create_readvertisement(&table, 10);
    assert_eq!(routes.len(), 3);

    assert_eq!(routes[0].source_ledger, LEDGER_A);
    assert_eq!(routes[0].destination_ledger, LEDGER_B);
    assert_eq!(routes[0].source_account.as_deref(), Some(MARK_A));
    assert_eq!(routes[0].points, points(&[(0.0, 0.0), (200.0, 100.0)]));

    let combined = &routes[1];
    assert_eq!(combined.destination_ledger, LEDGER_C);
    assert_eq!(combined.connector, MARK);
    assert_eq!(combined.min_message_window, 3);
    assert_eq!(combined.source_account.as_deref(), Some(MARK_A));
    assert_eq!(
        combined.points,
        points(&[(0.0, 0.0), (100.0, 60.0), (120.0, 60.0), (200.0, 100.0)])
    );

    assert_eq!(routes[2].source_ledger, LEDGER_B);
    assert_eq!(routes[2].source_account.as_deref(), Some(MARK_B));
}

#[test]
fn test_readvertisement_crossing_into_flat_tail() {
    let mut table = mark_table();
    table
        .add_route(&advert(LEDGER_B, LEDGER_C, MARY, &[(0.0, 0.0), (100.0, 1000.0)]), start())
        .unwrap();
    table
        .add_route(&advert(LEDGER_B, LEDGER_C, MARTIN, &[(0.0, 0.0), (10.0, 500.0)]), start())
        .unwrap();

    let combined = &create_readvertisement(&table, 10)[1];
    assert_eq!(combined.min_message_window, 2);
    assert_eq!(
        combined.points,
        points(&[(0.0, 0.0), (20.0, 500.0), (100.0, 500.0), (200.0, 1000.0)])
    );
}

#[test]
fn test_readvertisement_crossing_between_sloped_segments() {
    let mut table = mark_table();
    table
        .add_route(&advert(LEDGER_B, LEDGER_C, MARY, &[(0.0, 0.0), (100.0, 1000.0)]), start())
        .unwrap();
    table
        .add_route(
            &advert(
                LEDGER_B,
                LEDGER_C,
                MARTIN,
                &[(0.0, 0.0), (100.0 / 3.0, 450.0), (200.0 / 3.0, 550.0)],
            ),
            start(),
        )
        .unwrap();

    let combined = &create_readvertisement(&table, 10)[1];
    assert_eq!(combined.min_message_window, 2);
    let expected = points(&[
        (0.0, 0.0),
        (200.0 / 3.0, 450.0),
        (100.0, 500.0),
        (400.0 / 3.0, 666.6666666666667),
        (200.0, 1000.0),
    ]);
    assert_eq!(combined.points.len(), expected.len(), "{:?}", combined.points);
    for (got, want) in combined.points.iter().zip(&expected) {
        assert!(
            (got.x - want.x).abs() < 1e-9 && (got.y - want.y).abs() < 1e-9,
            "got {got:?}, want {want:?}"
        );
    }
}
