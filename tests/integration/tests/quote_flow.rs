//! Integration test: quotes by source and destination amount, as seen by a
//! sender addressing accounts rather than ledgers.

use liqroute_integration_tests::*;
use liqroute_routing::{Quote, RoutingTable};

fn mark_with_mary() -> RoutingTable {
    let mut table = mark_table();
    table
        .add_route(
            &advert(LEDGER_B, LEDGER_C, MARY, &[(0.0, 0.0), (200.0, 100.0)])
                .with_accounts(Some(format!("{LEDGER_B}/accounts/mary")), None),
            start(),
        )
        .unwrap();
    table
}

fn remote_quote(final_address: &str) -> Quote {
    Quote {
        is_final: false,
        connector: MARY.into(),
        source_ledger: LEDGER_A.into(),
        source_amount: "100".into(),
        destination_ledger: LEDGER_B.into(),
        destination_amount: "50".into(),
        destination_credit_account: Some(format!("{LEDGER_B}/accounts/mary")),
        final_ledger: final_address.into(),
        final_amount: "25".into(),
        min_message_window: 2,
        peer_info: None,
    }
}

// =========================================================================
// By destination amount
// =========================================================================

#[test]
fn test_destination_amount_one_path() {
    let quote = mark_with_mary()
        .quote_by_destination_amount(LEDGER_A, LEDGER_C, "25")
        .unwrap();
    assert_eq!(quote, Some(remote_quote(LEDGER_C)));
}

#[test]
fn test_destination_amount_one_hop() {
    let quote = mark_table()
        .quote_by_destination_amount(&format!("{LEDGER_A}alice"), &format!("{LEDGER_B}bob"), "50")
        .unwrap();
    assert_eq!(
        quote,
        Some(Quote {
            is_final: true,
            connector: MARK.into(),
            source_ledger: LEDGER_A.into(),
            source_amount: "100".into(),
            destination_ledger: LEDGER_B.into(),
            destination_amount: "50".into(),
            destination_credit_account: None,
            final_ledger: LEDGER_B.into(),
            final_amount: "50".into(),
            min_message_window: 1,
            peer_info: Some(rate_info("0.5")),
        })
    );
}

#[test]
fn test_destination_amount_remote_subledger() {
    let quote = mark_with_mary()
        .quote_by_destination_amount(LEDGER_A, &format!("{LEDGER_C}subledger1.bob"), "25")
        .unwrap();
    assert_eq!(quote, Some(remote_quote(LEDGER_C)));
}

// =========================================================================
// By source amount
// =========================================================================

#[test]
fn test_source_amount_one_hop() {
    let quote = mark_table()
        .quote_by_source_amount(LEDGER_A, LEDGER_B, "100")
        .unwrap()
        .expect("route A -> B");
    assert!(quote.is_final);
    assert_eq!(quote.source_amount, "100");
    assert_eq!(quote.destination_amount, "50");
    assert_eq!(quote.final_amount, "50");
    assert_eq!(quote.destination_credit_account, None);
    assert_eq!(quote.peer_info, Some(rate_info("0.5")));

    let json = serde_json::to_value(&quote).unwrap();
    assert_eq!(json["isFinal"], true);
    assert_eq!(json["peerInfo"]["rate_info"], "0.5");
    assert!(json.as_object().unwrap().contains_key("destinationCreditAccount"));
    assert!(json["destinationCreditAccount"].is_null());
}

#[test]
fn test_source_amount_picks_path_that_delivers() {
    let local = [
        advert(LEDGER_A, LEDGER_B, MARK, &[(0.0, 0.0), (100.0, 100.0)]),
        advert(LEDGER_A, LEDGER_D, MARK, &[(0.0, 0.0), (100.0, 100.0)]),
    ];
    let mut table = RoutingTable::new(MARK, &local, MAX_AGE, start()).unwrap();
    for (ledger, rate) in [(LEDGER_B, 10.0), (LEDGER_D, 90.0)] {
        let ad = advert(ledger, LEDGER_C, MARY, &[(0.0, 0.0), (100.0, rate)])
            .with_accounts(Some(format!("{ledger}mary")), None);
        assert!(table.add_route(&ad, start()).unwrap());
    }

    let quote = table
        .quote_by_source_amount(LEDGER_A, LEDGER_C, "100")
        .unwrap();
    assert_eq!(
        quote,
        Some(Quote {
            is_final: false,
            connector: MARY.into(),
            source_ledger: LEDGER_A.into(),
            source_amount: "100".into(),
            destination_ledger: LEDGER_D.into(),
            destination_amount: "100".into(),
            destination_credit_account: Some(format!("{LEDGER_D}mary")),
            final_ledger: LEDGER_C.into(),
            final_amount: "90".into(),
            min_message_window: 2,
            peer_info: None,
        })
    );
}

#[test]
fn test_no_quote_for_unknown_ledger() {
    let table = mark_table();
    assert_eq!(table.quote_by_source_amount(LEDGER_A, LEDGER_E, "10").unwrap(), None);
    assert_eq!(table.quote_by_source_amount(LEDGER_E, LEDGER_A, "10").unwrap(), None);
    assert!(table.quote_by_source_amount(LEDGER_A, LEDGER_B, "ten").is_err());
}
