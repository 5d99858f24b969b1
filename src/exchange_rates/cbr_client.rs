use std::str::FromStr;

use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use tracing::{debug, instrument};
use url::Url;

use super::cbr_types::ValCurs;
use super::{RateSource, RateTable};
use crate::config::Config;
use crate::errors::FetchError;

const CBR_DAILY_URL: &str = "https://www.cbr.ru/scripts/XML_daily.asp";

/// Client for the Central Bank of Russia daily rates feed.
#[derive(Debug, Clone)]
pub struct CbrClient {
    http_client: Client,
    endpoint: Url,
}

impl CbrClient {
    pub fn new(config: &Config) -> eyre::Result<Self> {
        let http_client = Client::builder().timeout(config.http_timeout).build()?;
        Ok(Self {
            http_client,
            endpoint: Url::parse(CBR_DAILY_URL)?,
        })
    }

    /// The feed wants `date_req=dd/mm/yyyy` with the slashes left as-is.
    pub fn request_url(&self, date: NaiveDate) -> Url {
        let mut url = self.endpoint.clone();
        url.set_query(Some(&format!("date_req={}", date.format("%d/%m/%Y"))));
        url
    }

    async fn fetch_xml(&self, date: NaiveDate) -> Result<String, FetchError> {
        let http_error = |source: reqwest::Error| FetchError::Http { date, source };
        let response = self
            .http_client
            .get(self.request_url(date))
            .send()
            .await
            .map_err(http_error)?
            .error_for_status()
            .map_err(http_error)?;
        response.text().await.map_err(http_error)
    }
}

impl RateSource for CbrClient {
    #[instrument(skip(self), fields(on_close = true))]
    async fn fetch_rates(&self, date: NaiveDate) -> Result<RateTable, FetchError> {
        let xml = self.fetch_xml(date).await?;
        let table = parse_daily_rates(date, &xml)?;
        debug!(currencies = table.len(), %table, "Parsed daily rates");
        Ok(table)
    }
}

/// Parses an `XML_daily.asp` document into per-unit rates.
pub fn parse_daily_rates(date: NaiveDate, xml: &str) -> Result<RateTable, FetchError> {
    let parse_error = |message: String| FetchError::Parse { date, message };

    let listing: ValCurs = quick_xml::de::from_str(xml).map_err(|e| parse_error(e.to_string()))?;
    if listing.valutes.is_empty() {
        return Err(FetchError::EmptyListing { date });
    }

    let mut table = RateTable::new(date);
    for valute in &listing.valutes {
        let code = valute.char_code.trim();
        let nominal: u32 = valute
            .nominal
            .trim()
            .parse()
            .map_err(|_| parse_error(format!("bad nominal {:?} for {code}", valute.nominal)))?;
        if nominal == 0 {
            return Err(parse_error(format!("zero nominal for {code}")));
        }
        let value = Decimal::from_str(&valute.value.trim().replace(',', "."))
            .map_err(|_| parse_error(format!("bad value {:?} for {code}", valute.value)))?;

        table.insert(code, value / Decimal::from(nominal));
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="windows-1251"?>
<ValCurs Date="14.03.2024" name="Foreign Currency Market">
    <Valute ID="R01235">
        <NumCode>840</NumCode>
        <CharCode>USD</CharCode>
        <Nominal>1</Nominal>
        <Name>US Dollar</Name>
        <Value>92,50</Value>
        <VunitRate>92,5</VunitRate>
    </Valute>
    <Valute ID="R01335">
        <NumCode>398</NumCode>
        <CharCode>KZT</CharCode>
        <Nominal>100</Nominal>
        <Name>Tenge</Name>
        <Value>20,4300</Value>
        <VunitRate>0,2043</VunitRate>
    </Valute>
</ValCurs>"#;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
    }

    #[test]
    fn parses_per_unit_rates() {
        let table = parse_daily_rates(day(), SAMPLE).unwrap();
        assert_eq!(table.get("USD"), Some(dec!(92.50)));
        assert_eq!(table.get("KZT"), Some(dec!(0.2043)));
        assert_eq!(table.get("RUR"), Some(Decimal::ONE));
        assert_eq!(table.date(), day());
    }

    #[test]
    fn empty_listing_is_an_error() {
        let xml = r#"<?xml version="1.0" encoding="windows-1251"?><ValCurs Date="14.03.2024" name="x"></ValCurs>"#;
        assert!(matches!(
            parse_daily_rates(day(), xml),
            Err(FetchError::EmptyListing { .. })
        ));
    }

    #[test]
    fn malformed_value_carries_the_date() {
        let xml = SAMPLE.replace("92,50", "n/a");
        let err = parse_daily_rates(day(), &xml).unwrap_err();
        assert_eq!(err.date(), day());
        assert!(matches!(err, FetchError::Parse { .. }));
    }

    #[test]
    fn non_rate_document_is_rejected() {
        assert!(parse_daily_rates(day(), "<html>").is_err());
    }

    #[test]
    fn request_url_uses_day_month_year() {
        let config = Config::from_lookup(|key| match key {
            "DB_HOST" | "DB_USER" | "DB_PASSWORD" | "DB_NAME" => Some("x".to_string()),
            _ => None,
        })
        .unwrap();
        let client = CbrClient::new(&config).unwrap();
        assert_eq!(
            client.request_url(day()).as_str(),
            "https://www.cbr.ru/scripts/XML_daily.asp?date_req=14/03/2024"
        );
    }
}
