//! Service-specific retrieval: keyword search and price handling.

use std::cmp::Ordering;

use models::service::Service;
use regex::RegexBuilder;
use tracing::instrument;

use crate::crud::ServiceService;
use crate::errors::ServiceError;
use crate::storage::Filter;

const SEARCH_FIELDS: &[&str] = &["name", "description", "price"];

/// Numeric value of a textual price: the longest leading decimal prefix,
/// `NaN` when there is none (`"50 USD"` is 50, `"free"` is NaN).
pub fn parse_price(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut has_digits = end > digits_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if has_digits || frac_end > frac_start {
            has_digits = true;
            end = frac_end;
        }
    }
    if !has_digits {
        return f64::NAN;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }
    text[..end].parse::<f64>().unwrap_or(f64::NAN)
}

/// Total order on parsed prices; unparseable prices sort above every number.
pub fn compare_prices(a: &str, b: &str) -> Ordering {
    let (a, b) = (parse_price(a), parse_price(b));
    a.is_nan().cmp(&b.is_nan()).then_with(|| a.total_cmp(&b))
}

/// Case-insensitive literal substring filter over name, description and price.
/// `None` for a blank keyword.
pub fn keyword_filter(keyword: Option<&str>) -> Result<Option<Filter>, ServiceError> {
    let Some(keyword) = keyword.map(str::trim).filter(|k| !k.is_empty()) else {
        return Ok(None);
    };
    let pattern = RegexBuilder::new(&regex::escape(keyword))
        .case_insensitive(true)
        .build()
        .map_err(|e| ServiceError::Validation(format!("invalid keyword: {e}")))?;
    Ok(Some(Filter::AnyMatch { fields: SEARCH_FIELDS, pattern }))
}

impl ServiceService {
    /// Services matching `keyword`, in store order; all services when blank.
    #[instrument(skip(self))]
    pub async fn search(&self, keyword: Option<&str>) -> Result<Vec<Service>, ServiceError> {
        match keyword_filter(keyword)? {
            Some(filter) => self.find(&filter).await,
            None => self.get_all().await,
        }
    }

    pub async fn get_by_provider(&self, provider_id: &str) -> Result<Vec<Service>, ServiceError> {
        self.find(&Filter::eq("provider", provider_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::CrudService;
    use crate::storage::JsonCollectionStore;
    use models::service::ServiceCreate;
    use serde_json::json;

    async fn catalog(rows: &[(&str, &str, &str)]) -> ServiceService {
        let svc = CrudService::<Service>::new(JsonCollectionStore::<Service>::in_memory());
        for (name, description, price) in rows {
            let input: ServiceCreate = serde_json::from_value(json!({
                "name": name, "description": description, "price": price, "provider": "p1"
            }))
            .unwrap();
            svc.create(input).await.unwrap();
        }
        svc
    }

    #[test]
    fn parses_leading_numeric_prefix() {
        assert_eq!(parse_price("120"), 120.0);
        assert_eq!(parse_price(" 50 USD"), 50.0);
        assert_eq!(parse_price("9.99"), 9.99);
        assert!(parse_price("free").is_nan());
        assert!(parse_price("").is_nan());
    }

    #[test]
    fn unparseable_prices_sort_last() {
        let mut prices = vec!["free", "50", "9", "n/a", "120"];
        prices.sort_by(|a, b| compare_prices(a, b));
        assert_eq!(&prices[..3], &["9", "50", "120"]);
    }

    #[tokio::test]
    async fn keyword_matches_price_as_substring() -> Result<(), anyhow::Error> {
        let svc = catalog(&[("Checkup", "basic", "299"), ("X-ray", "scan", "90"), ("Consult", "talk", "150")]).await;
        let names: Vec<_> = svc.search(Some("9")).await?.into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Checkup", "X-ray"]);
        Ok(())
    }

    #[tokio::test]
    async fn keyword_is_case_insensitive_and_literal() -> Result<(), anyhow::Error> {
        let svc = catalog(&[("Dental (adult)", "Cleaning", "10"), ("Eye exam", "vision", "20")]).await;
        assert_eq!(svc.search(Some("CLEAN")).await?.len(), 1);
        assert_eq!(svc.search(Some("(adult)")).await?.len(), 1);
        assert_eq!(svc.search(Some(".*")).await?.len(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn blank_keyword_returns_everything_in_order() -> Result<(), anyhow::Error> {
        let svc = catalog(&[("a", "", "1"), ("b", "", "2"), ("c", "", "3")]).await;
        let all = svc.get_all().await?;
        assert_eq!(svc.search(None).await?, all);
        assert_eq!(svc.search(Some("   ")).await?, all);
        Ok(())
    }
}
