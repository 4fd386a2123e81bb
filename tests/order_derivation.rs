//! Integration tests for turning completed checkouts into orders

use std::{collections::BTreeMap, str::FromStr};

use jiff::Timestamp;
use rust_decimal::Decimal;
use testresult::TestResult;

use timeart::{
    orders::{CompletedCheckout, Fulfilment, NewOrder, PostalAddress, ShippingDetails},
    photos::{PhotoUuid, PurchaseType},
};

fn completed(purchase_type: &str, amount_total: i64, rate: &str) -> CompletedCheckout {
    CompletedCheckout {
        session_id: "cs_live_abc".to_string(),
        amount_total: Some(amount_total),
        customer_email: Some("buyer@example.com".to_string()),
        customer_name: None,
        payment_intent: Some("pi_abc".to_string()),
        metadata: BTreeMap::from([
            ("photoId".to_string(), PhotoUuid::new().to_string()),
            ("type".to_string(), purchase_type.to_string()),
            ("commissionRate".to_string(), rate.to_string()),
        ]),
        shipping: None,
    }
}

#[test]
fn hundred_dollar_order_splits_seventy_thirty() -> TestResult {
    let order = NewOrder::derive(
        &completed("digital", 10_000, "70"),
        Timestamp::UNIX_EPOCH,
        "https://downloads.example.com",
        "token",
    )?;

    assert_eq!(order.order_total, Decimal::from(100));
    assert_eq!(order.split.artist_commission, Decimal::from_str("70.00")?);
    assert_eq!(order.split.platform_fee, Decimal::from_str("30.00")?);
    assert_eq!(order.customer_name, "");
    assert_eq!(order.license_label, "Personal Use");

    Ok(())
}

#[test]
fn print_order_records_the_shipping_label() -> TestResult {
    let mut checkout = completed("print", 7_500, "65");
    checkout.shipping = Some(ShippingDetails {
        name: Some("Buyer".to_string()),
        address: PostalAddress {
            line1: Some("12 Harbour Rd".to_string()),
            line2: None,
            city: Some("Hobart".to_string()),
            state: Some("TAS".to_string()),
            postal_code: Some("7000".to_string()),
            country: Some("AU".to_string()),
        },
    });

    let order = NewOrder::derive(&checkout, Timestamp::UNIX_EPOCH, "", "unused")?;

    assert_eq!(order.purchase_type, PurchaseType::Print);
    assert_eq!(
        order.fulfilment,
        Fulfilment::Ship {
            address: Some("12 Harbour Rd\nHobart, TAS 7000\nAU".to_string())
        }
    );
    assert_eq!(order.split.artist_commission, Decimal::from_str("48.75")?);
    assert_eq!(order.split.platform_fee, Decimal::from_str("26.25")?);

    Ok(())
}

#[test]
fn notes_reference_the_session() -> TestResult {
    let order = NewOrder::derive(
        &completed("digital", 2_500, "70"),
        Timestamp::UNIX_EPOCH,
        "https://downloads.example.com",
        "token",
    )?;

    assert!(order.notes.contains("cs_live_abc"));
    assert_eq!(order.payment_intent.as_deref(), Some("pi_abc"));

    Ok(())
}
