use serde::Deserialize;
use tracing::instrument;

use super::views::ServiceWithProvider;
use super::{MarketError, Marketplace};
use crate::catalog::compare_prices;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    PriceAsc,
    PriceDesc,
    /// Store order.
    None,
}

impl SortOrder {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("price:asc") => SortOrder::PriceAsc,
            Some("price:desc") => SortOrder::PriceDesc,
            _ => SortOrder::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceFilter {
    HasDiscount,
    IsPackage,
    None,
}

impl ServiceFilter {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("has_discount") => ServiceFilter::HasDiscount,
            Some("is_package") => ServiceFilter::IsPackage,
            _ => ServiceFilter::None,
        }
    }

    fn keeps(self, item: &ServiceWithProvider) -> bool {
        match self {
            ServiceFilter::HasDiscount => item.service.has_discount(),
            ServiceFilter::IsPackage => item.service.is_package(),
            ServiceFilter::None => true,
        }
    }
}

/// Query string of the service listing; unknown values mean "no-op".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceQuery {
    pub keyword: Option<String>,
    pub sort: Option<String>,
    pub filter: Option<String>,
}

impl Marketplace {
    /// Keyword match, provider join, then filter, then stable sort by price.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &ServiceQuery) -> Result<Vec<ServiceWithProvider>, MarketError> {
        let services = self.services.search(query.keyword.as_deref()).await?;
        let providers = self.provider_index().await?;
        let filter = ServiceFilter::parse(query.filter.as_deref());

        let mut items: Vec<ServiceWithProvider> = services
            .into_iter()
            .filter(|s| !s.provider.is_empty())
            .filter_map(|s| {
                let provider_name = providers.get(&s.provider)?.name.clone();
                Some(ServiceWithProvider { service: s, provider_name })
            })
            .filter(|item| filter.keeps(item))
            .collect();

        match SortOrder::parse(query.sort.as_deref()) {
            SortOrder::PriceAsc => items.sort_by(|a, b| compare_prices(&a.service.price, &b.service.price)),
            SortOrder::PriceDesc => items.sort_by(|a, b| compare_prices(&b.service.price, &a.service.price)),
            SortOrder::None => {}
        }
        Ok(items)
    }
}
