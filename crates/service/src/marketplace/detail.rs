use std::collections::HashMap;

use tracing::instrument;

use super::views::{BookRequestView, ProviderDetail, ProviderServiceView, RelatedService, ServiceDetail};
use super::{MarketError, Marketplace};

impl Marketplace {
    /// Service page. Bumps the provider's view counter on a best-effort basis.
    #[instrument(skip(self))]
    pub async fn service_detail(&self, id: &str) -> Result<ServiceDetail, MarketError> {
        let service = self.services.get_by_id(id).await?.ok_or(MarketError::ServiceNotFound)?;
        let provider = self.providers.get_by_id(&service.provider).await?.ok_or(MarketError::ProviderNotFound)?;

        self.providers.increment_views(&provider.id).await;

        let related_services = self
            .services
            .get_by_provider(&provider.id)
            .await?
            .iter()
            .filter(|s| s.id != service.id)
            .map(|s| RelatedService::new(s, &provider.name))
            .collect();

        Ok(ServiceDetail {
            provider_name: provider.name,
            provider_about: provider.description,
            faqs_provider: provider.faqs,
            related_services,
            service,
        })
    }

    /// Provider page with its services, all reviews and its book requests.
    /// Pure read.
    #[instrument(skip(self))]
    pub async fn provider_detail(&self, id: &str) -> Result<ProviderDetail, MarketError> {
        let provider = self.providers.get_by_id(id).await?.ok_or(MarketError::ProviderNotFound)?;
        let services = self.services.get_all().await?;
        let service_names: HashMap<&str, &str> = services.iter().map(|s| (s.id.as_str(), s.name.as_str())).collect();

        let book_requests = self
            .book_requests
            .get_by_provider(id)
            .await?
            .into_iter()
            .map(|b| {
                let name = service_names.get(b.service.as_str()).map(|n| n.to_string());
                BookRequestView::new(b, name)
            })
            .collect();

        let reviews = self.reviews.get_all().await?;

        let provider_services = services
            .iter()
            .filter(|s| s.provider == id)
            .map(|s| ProviderServiceView { image: s.primary_image().map(str::to_string), service: s.clone() })
            .collect();

        Ok(ProviderDetail { provider, services: provider_services, reviews, book_requests })
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{market, provider, service};
    use super::*;
    use models::book_request::BookRequestCreate;
    use models::provider_review::ProviderReviewCreate;
    use serde_json::json;

    #[tokio::test]
    async fn unknown_service_is_not_found() {
        let m = market();
        let err = m.service_detail("missing").await.unwrap_err();
        assert!(matches!(err, MarketError::ServiceNotFound));
        assert_eq!(err.to_string(), "Service not found");
        assert!(err.is_expected());
    }

    #[tokio::test]
    async fn dangling_provider_is_reported() {
        let m = market();
        let s = service(&m, "ghost", json!({})).await;
        let err = m.service_detail(&s.id).await.unwrap_err();
        assert!(matches!(err, MarketError::ProviderNotFound));
    }

    #[tokio::test]
    async fn related_services_exclude_self_and_other_providers() -> Result<(), anyhow::Error> {
        let m = market();
        let p = provider(&m, "Cedar").await;
        let other = provider(&m, "Pine").await;
        let s1 = service(&m, &p.id, json!({"name": "one", "gallery": ["one.png"]})).await;
        let s2 = service(&m, &p.id, json!({"name": "two", "gallery": ["two.png"]})).await;
        let s3 = service(&m, &p.id, json!({"name": "three"})).await;
        service(&m, &other.id, json!({"name": "elsewhere"})).await;

        let detail = m.service_detail(&s2.id).await?;
        let related: Vec<_> = detail.related_services.iter().map(|r| r.id.clone()).collect();
        assert_eq!(related, vec![s1.id.clone(), s3.id.clone()]);
        assert_eq!(detail.related_services[0].image.as_deref(), Some("one.png"));
        assert_eq!(detail.provider_name, "Cedar");
        assert_eq!(detail.provider_about, "Cedar about");
        assert_eq!(detail.faqs_provider.len(), 1);

        let v = serde_json::to_value(&detail)?;
        assert_eq!(v["id"], s2.id.as_str());
        assert!(v["relatedServices"].is_array());
        Ok(())
    }

    #[tokio::test]
    async fn service_detail_counts_provider_views() -> Result<(), anyhow::Error> {
        let m = market();
        let p = provider(&m, "Cedar").await;
        let s = service(&m, &p.id, json!({})).await;
        m.service_detail(&s.id).await?;
        m.service_detail(&s.id).await?;
        let p = m.providers.get_by_id(&p.id).await?.expect("provider");
        assert_eq!(p.total_services_view, 2);
        Ok(())
    }

    #[tokio::test]
    async fn provider_detail_joins_services_reviews_and_bookings() -> Result<(), anyhow::Error> {
        let m = market();
        let p = provider(&m, "Cedar").await;
        let other = provider(&m, "Pine").await;
        let s = service(&m, &p.id, json!({"name": "Cleaning", "gallery": ["c.png"]})).await;
        service(&m, &other.id, json!({})).await;

        let review: ProviderReviewCreate = serde_json::from_value(json!({
            "name": "Rana", "gender": "female", "description": "Great", "provider": p.id, "rate": 5
        }))?;
        m.reviews.create(review).await?;

        for service_id in [s.id.as_str(), "deleted-service"] {
            let booking: BookRequestCreate = serde_json::from_value(json!({
                "name": "Ali", "phoneNumber": "123", "email": "a@b.c", "provider": p.id, "service": service_id
            }))?;
            m.book_requests.create(booking).await?;
        }

        let detail = m.provider_detail(&p.id).await?;
        assert_eq!(detail.services.len(), 1);
        assert_eq!(detail.services[0].image.as_deref(), Some("c.png"));
        assert_eq!(detail.book_requests.len(), 2);
        assert_eq!(detail.book_requests[0].service_name.as_deref(), Some("Cleaning"));
        assert!(detail.book_requests[1].service_name.is_none());

        // reading twice must not clear reviews
        assert_eq!(detail.reviews.len(), 1);
        assert_eq!(m.provider_detail(&p.id).await?.reviews.len(), 1);

        let v = serde_json::to_value(&detail)?;
        assert_eq!(v["name"], "Cedar");
        assert!(v["reviews"][0]["createdAt"].is_string());
        assert!(v["bookRequests"][1].get("serviceName").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_provider_detail_is_not_found() {
        let err = market().provider_detail("missing").await.unwrap_err();
        assert!(matches!(err, MarketError::ProviderNotFound));
    }
}
