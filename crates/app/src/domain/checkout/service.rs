//! Checkout service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{info, warn};

use timeart::{
    checkout::{CheckoutValidator, PhotoLookupError, RawPurchaseRequest},
    photos::{Photo, PhotoUuid},
};

use crate::{
    domain::{checkout::errors::CheckoutServiceError, photos::PhotosRepository},
    payments::{CheckoutRedirects, CheckoutSession, PaymentGateway},
};

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Validate a purchase request and open a hosted checkout for it.
    async fn create_checkout(
        &self,
        request: RawPurchaseRequest,
    ) -> Result<CheckoutSession, CheckoutServiceError>;
}

/// Checkout over the photo catalog and a payment gateway.
#[derive(Clone)]
pub struct HostedCheckoutService {
    photos: Arc<dyn PhotosRepository>,
    gateway: Arc<dyn PaymentGateway>,
    validator: CheckoutValidator,
    public_site_url: String,
}

impl HostedCheckoutService {
    #[must_use]
    pub fn new(
        photos: Arc<dyn PhotosRepository>,
        gateway: Arc<dyn PaymentGateway>,
        validator: CheckoutValidator,
        public_site_url: String,
    ) -> Self {
        Self {
            photos,
            gateway,
            validator,
            public_site_url,
        }
    }

    async fn lookup(&self, photo: PhotoUuid) -> Result<Photo, PhotoLookupError> {
        match self.photos.find_photo_by_id(photo).await {
            Ok(Some(photo)) => Ok(photo),
            Ok(None) => Err(PhotoLookupError::NotFound),
            Err(error) => {
                warn!(photo_uuid = %photo, error = ?error, "photo lookup failed");

                Err(PhotoLookupError::Unavailable)
            }
        }
    }
}

impl std::fmt::Debug for HostedCheckoutService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedCheckoutService")
            .field("validator", &self.validator)
            .field("public_site_url", &self.public_site_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CheckoutService for HostedCheckoutService {
    async fn create_checkout(
        &self,
        request: RawPurchaseRequest,
    ) -> Result<CheckoutSession, CheckoutServiceError> {
        let spec = self
            .validator
            .validate(request, |photo| self.lookup(photo))
            .await?;

        let redirects = CheckoutRedirects::for_photo(&self.public_site_url, spec.photo_slug());

        let session = self
            .gateway
            .create_session(&spec, &redirects)
            .await
            .map_err(CheckoutServiceError::Gateway)?;

        info!(
            session_id = %session.id,
            photo_uuid = %spec.photo(),
            purchase_type = %spec.purchase_type(),
            unit_amount = spec.unit_amount(),
            "checkout session created"
        );

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use sqlx::Error;
    use testresult::TestResult;

    use timeart::checkout::ValidationError;

    use crate::{
        domain::photos::{MockPhotosRepository, PhotosRepositoryError},
        payments::{MockPaymentGateway, PaymentGatewayError},
    };

    use super::*;

    fn photo() -> Photo {
        Photo {
            uuid: PhotoUuid::new(),
            slug: "harbour".to_string(),
            title: "Harbour".to_string(),
            description: None,
            image_url: None,
            price_digital: Some(Decimal::from(25)),
            price_print: Some(Decimal::from(50)),
            is_active: true,
            artist: None,
            license_type: None,
            dimensions: None,
        }
    }

    fn request(photo: &Photo, purchase_type: &str, price: f64) -> RawPurchaseRequest {
        RawPurchaseRequest {
            photo_id: Some(photo.uuid.to_string()),
            photo_title: Some(photo.title.clone()),
            purchase_type: Some(purchase_type.to_string()),
            price: Some(price.into()),
            print_size: None,
        }
    }

    fn photos_returning(photo: Photo) -> MockPhotosRepository {
        let mut photos = MockPhotosRepository::new();

        photos
            .expect_find_photo_by_id()
            .returning(move |_| Ok(Some(photo.clone())));

        photos
    }

    fn service(photos: MockPhotosRepository, gateway: MockPaymentGateway) -> HostedCheckoutService {
        HostedCheckoutService::new(
            Arc::new(photos),
            Arc::new(gateway),
            CheckoutValidator::default(),
            "https://timeart.example".to_string(),
        )
    }

    #[tokio::test]
    async fn valid_request_opens_a_session_at_the_catalog_price() -> TestResult {
        let photo = photo();

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_session()
            .withf(|spec, redirects| {
                spec.unit_amount() == 2_500
                    && redirects.success_url == "https://timeart.example/photos/harbour?success=true"
            })
            .times(1)
            .returning(|_, _| {
                Ok(CheckoutSession {
                    id: "cs_test".to_string(),
                    url: "https://checkout.example/cs_test".to_string(),
                })
            });

        let session = service(photos_returning(photo.clone()), gateway)
            .create_checkout(request(&photo, "digital", 25.0))
            .await?;

        assert_eq!(session.id, "cs_test");

        Ok(())
    }

    #[tokio::test]
    async fn tampered_price_never_reaches_the_gateway() {
        let photo = photo();

        let mut gateway = MockPaymentGateway::new();
        gateway.expect_create_session().times(0);

        let result = service(photos_returning(photo.clone()), gateway)
            .create_checkout(request(&photo, "digital", 1.0))
            .await;

        assert!(
            matches!(
                result,
                Err(CheckoutServiceError::Rejected(ValidationError::PriceMismatch))
            ),
            "expected PriceMismatch, got {result:?}"
        );
    }

    #[tokio::test]
    async fn missing_photo_is_not_found() {
        let mut photos = MockPhotosRepository::new();
        photos.expect_find_photo_by_id().returning(|_| Ok(None));

        let result = service(photos, MockPaymentGateway::new())
            .create_checkout(request(&photo(), "digital", 25.0))
            .await;

        assert!(matches!(
            result,
            Err(CheckoutServiceError::Rejected(ValidationError::NotFound))
        ));
    }

    #[tokio::test]
    async fn storage_failure_is_upstream_unavailable() {
        let mut photos = MockPhotosRepository::new();
        photos
            .expect_find_photo_by_id()
            .returning(|_| Err(PhotosRepositoryError::Sql(Error::PoolTimedOut)));

        let result = service(photos, MockPaymentGateway::new())
            .create_checkout(request(&photo(), "digital", 25.0))
            .await;

        assert!(matches!(
            result,
            Err(CheckoutServiceError::Rejected(
                ValidationError::UpstreamUnavailable
            ))
        ));
    }

    #[tokio::test]
    async fn gateway_failure_is_reported() {
        let photo = photo();

        let mut gateway = MockPaymentGateway::new();
        gateway.expect_create_session().returning(|_, _| {
            Err(PaymentGatewayError::UnexpectedResponse(
                "status 500".to_string(),
            ))
        });

        let result = service(photos_returning(photo.clone()), gateway)
            .create_checkout(request(&photo, "print", 60.0))
            .await;

        assert!(matches!(result, Err(CheckoutServiceError::Gateway(_))));
    }
}
