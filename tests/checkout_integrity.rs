//! Integration tests for checkout price integrity

use rust_decimal::Decimal;
use testresult::TestResult;

use timeart::{
    checkout::{CheckoutValidator, PhotoLookupError, RawPurchaseRequest, ValidationError},
    photos::{Photo, PhotoUuid, PurchaseType},
};

fn photo(price_digital: Option<i64>, price_print: Option<i64>) -> Photo {
    Photo {
        uuid: PhotoUuid::new(),
        slug: "salt-flats".to_string(),
        title: "Salt Flats".to_string(),
        description: None,
        image_url: None,
        price_digital: price_digital.map(Decimal::from),
        price_print: price_print.map(Decimal::from),
        is_active: true,
        artist: None,
        license_type: None,
        dimensions: None,
    }
}

fn request(photo: &Photo, purchase_type: &str, price: f64) -> RawPurchaseRequest {
    RawPurchaseRequest {
        photo_id: Some(photo.uuid.to_string()),
        photo_title: Some("Tampered Title".to_string()),
        purchase_type: Some(purchase_type.to_string()),
        price: Some(price.into()),
        print_size: Some("8x10".to_string()),
    }
}

async fn validate(
    photo: &Photo,
    purchase_type: &str,
    price: f64,
) -> Result<timeart::checkout::CheckoutSpec, ValidationError> {
    let resolved = photo.clone();

    CheckoutValidator::default()
        .validate(request(photo, purchase_type, price), |uuid| async move {
            if uuid == resolved.uuid {
                Ok(resolved)
            } else {
                Err(PhotoLookupError::NotFound)
            }
        })
        .await
}

#[tokio::test]
async fn digital_price_must_match_exactly() -> TestResult {
    let photo = photo(Some(25), Some(50));

    assert_eq!(
        validate(&photo, "digital", 1.0).await,
        Err(ValidationError::PriceMismatch)
    );
    assert_eq!(
        validate(&photo, "digital", 25.01).await,
        Err(ValidationError::PriceMismatch)
    );
    assert_eq!(validate(&photo, "digital", 25.0).await?.unit_amount(), 2_500);

    Ok(())
}

#[tokio::test]
async fn print_price_band_is_inclusive() -> TestResult {
    let photo = photo(Some(25), Some(50));

    assert_eq!(validate(&photo, "print", 50.0).await?.unit_amount(), 5_000);
    assert_eq!(validate(&photo, "print", 150.0).await?.unit_amount(), 15_000);
    assert_eq!(
        validate(&photo, "print", 151.0).await,
        Err(ValidationError::PriceMismatch)
    );
    assert_eq!(
        validate(&photo, "print", 49.99).await,
        Err(ValidationError::PriceMismatch)
    );

    Ok(())
}

#[tokio::test]
async fn inactive_photos_are_unavailable_at_any_price() {
    let mut photo = photo(Some(25), Some(50));
    photo.is_active = false;

    for (purchase_type, price) in [("digital", 25.0), ("print", 50.0), ("print", 1.0)] {
        assert_eq!(
            validate(&photo, purchase_type, price).await,
            Err(ValidationError::Unavailable),
            "{purchase_type} at {price} should be unavailable"
        );
    }
}

#[tokio::test]
async fn unpriced_format_is_not_offered() {
    let photo = photo(Some(25), None);

    assert_eq!(
        validate(&photo, "print", 50.0).await,
        Err(ValidationError::TypeNotOffered(PurchaseType::Print))
    );
}

#[tokio::test]
async fn shipping_is_collected_only_for_prints() -> TestResult {
    let photo = photo(Some(25), Some(50));

    assert!(!validate(&photo, "digital", 25.0).await?.collects_shipping_address());
    assert!(validate(&photo, "print", 80.0).await?.collects_shipping_address());

    Ok(())
}

#[tokio::test]
async fn product_name_uses_the_catalog_title() -> TestResult {
    let photo = photo(Some(25), Some(50));

    let spec = validate(&photo, "digital", 25.0).await?;

    assert_eq!(spec.product_name(), "Salt Flats - Digital Download");
    assert_eq!(spec.metadata().photo_title, "Tampered Title");

    Ok(())
}
