extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events, Ledger},
    token, vec, Address, Env, IntoVal, TryIntoVal,
};

use crate::events::{FundsReleased, ReceiptIssued, RefundIssued};
use crate::{ReceiptManager, ReceiptManagerClient};

const WINDOW_DAYS: u32 = 30;

fn setup() -> (Env, ReceiptManagerClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(ReceiptManager, ());
    let client = ReceiptManagerClient::new(&env, &contract_id);

    let seller = Address::generate(&env);
    let token = env.register_stellar_asset_contract_v2(Address::generate(&env));
    token::StellarAssetClient::new(&env, &token.address()).mint(&seller, &1_000_000);

    client.init(&seller, &token.address(), &WINDOW_DAYS);
    (env, client, seller)
}

#[test]
fn test_receipt_issued_event() {
    let (env, client, seller) = setup();
    let buyer = Address::generate(&env);
    client.issue_receipt(&seller, &buyer, &700);
    let index = client.issue_receipt(&seller, &buyer, &1_500);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("issued"), buyer)
    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![&env, symbol_short!("issued").into_val(&env), buyer.into_val(&env)];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ReceiptIssued = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(event_data, ReceiptIssued {
        buyer: buyer.clone(),
        purchase_amount: 1_500,
        receipt_index: index,
    });
    assert_eq!(event_data.receipt_index, 1);
}

#[test]
fn test_refund_issued_event() {
    let (env, client, seller) = setup();
    let buyer = Address::generate(&env);
    let index = client.issue_receipt(&seller, &buyer, &2_000);
    client.request_return(&buyer, &index);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("refunded"), buyer)
    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![&env, symbol_short!("refunded").into_val(&env), buyer.into_val(&env)];
    assert_eq!(last_event.1, expected_topics);

    let event_data: RefundIssued = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(event_data, RefundIssued {
        buyer: buyer.clone(),
        refund_amount: 2_000,
    });
}

#[test]
fn test_funds_released_event() {
    let (env, client, seller) = setup();
    let buyer = Address::generate(&env);
    let index = client.issue_receipt(&seller, &buyer, &3_000);
    env.ledger()
        .with_mut(|li| li.timestamp += WINDOW_DAYS as u64 * 86_400 + 1);
    client.release_funds(&seller, &buyer, &index);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("released"), buyer)
    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![&env, symbol_short!("released").into_val(&env), buyer.into_val(&env)];
    assert_eq!(last_event.1, expected_topics);

    let event_data: FundsReleased = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(event_data, FundsReleased {
        buyer: buyer.clone(),
        receipt_index: index,
        released_amount: 3_000,
    });
}
