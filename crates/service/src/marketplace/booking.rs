use models::book_request::{BookRequest, BookRequestCreate};
use tracing::{info, instrument};

use super::views::BookingInput;
use super::{MarketError, Marketplace};

impl Marketplace {
    /// Record a booking after both ids resolve. The stored references are
    /// the resolved records' ids.
    #[instrument(skip(self, input), fields(provider_id = %input.provider_id, service_id = %input.service_id))]
    pub async fn book(&self, input: BookingInput) -> Result<BookRequest, MarketError> {
        let providers = self.providers.get_all().await?;
        let services = self.services.get_all().await?;
        if providers.is_empty() || services.is_empty() {
            return Err(MarketError::EmptyCollection);
        }

        let service = services.iter().find(|s| s.id == input.service_id);
        let provider = providers.iter().find(|p| p.id == input.provider_id);
        let (Some(service), Some(provider)) = (service, provider) else {
            return Err(MarketError::InvalidReference);
        };

        let created = self
            .book_requests
            .create(BookRequestCreate {
                name: input.name,
                phone_number: input.phone_number,
                email: input.email,
                description: input.description,
                provider: provider.id.clone(),
                service: service.id.clone(),
            })
            .await?;
        info!(book_request_id = %created.id, "book_request_created");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{market, provider, service};
    use super::*;
    use serde_json::json;

    fn booking(provider_id: &str, service_id: &str) -> BookingInput {
        BookingInput {
            provider_id: provider_id.into(),
            service_id: service_id.into(),
            name: "Ali".into(),
            email: "ali@example.com".into(),
            phone_number: "+961 1 234".into(),
            description: None,
        }
    }

    #[tokio::test]
    async fn empty_catalog_rejects_booking() -> Result<(), anyhow::Error> {
        let m = market();
        let err = m.book(booking("p", "s")).await.unwrap_err();
        assert!(matches!(err, MarketError::EmptyCollection));
        assert_eq!(err.to_string(), "No services or providers found");
        assert!(m.book_requests.get_all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_ids_create_nothing() -> Result<(), anyhow::Error> {
        let m = market();
        let p = provider(&m, "Cedar").await;
        let s = service(&m, &p.id, json!({})).await;
        for (pid, sid) in [(p.id.as_str(), "nope"), ("nope", s.id.as_str())] {
            let err = m.book(booking(pid, sid)).await.unwrap_err();
            assert!(matches!(err, MarketError::InvalidReference));
        }
        assert!(m.book_requests.get_all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn valid_booking_stores_resolved_ids() -> Result<(), anyhow::Error> {
        let m = market();
        let p = provider(&m, "Cedar").await;
        let s = service(&m, &p.id, json!({})).await;
        let created = m.book(booking(&p.id, &s.id)).await?;
        assert_eq!(created.provider, p.id);
        assert_eq!(created.service, s.id);
        assert_eq!(m.book_requests.get_by_provider(&p.id).await?.len(), 1);
        Ok(())
    }
}
