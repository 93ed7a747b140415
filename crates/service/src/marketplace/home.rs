use models::provider::Provider;
use tracing::instrument;

use super::views::{HomeView, ProviderSummary, ServiceListing};
use super::{MarketError, Marketplace};

impl Marketplace {
    /// Home page snapshot. Services whose provider is unknown are left out.
    #[instrument(skip(self))]
    pub async fn home(&self) -> Result<HomeView, MarketError> {
        let providers = self.providers.get_all().await?;
        let services = self.services.get_all().await?;
        let names: std::collections::HashMap<&str, &str> =
            providers.iter().map(|p| (p.id.as_str(), p.name.as_str())).collect();

        let mut listings = Vec::with_capacity(services.len());
        let mut recommended = Vec::new();
        for s in &services {
            let Some(provider_name) = names.get(s.provider.as_str()) else { continue };
            let listing = ServiceListing::new(s, provider_name);
            if s.recommended {
                recommended.push(listing.clone());
            }
            listings.push(listing);
        }

        Ok(HomeView {
            providers: providers.iter().map(ProviderSummary::from).collect(),
            recommended_services: recommended,
            services: listings,
        })
    }

    pub async fn providers(&self) -> Result<Vec<Provider>, MarketError> {
        Ok(self.providers.get_all().await?)
    }
}
