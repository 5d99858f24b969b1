use serde::Deserialize;

// Central Bank of Russia XML_daily.asp response structures

#[derive(Debug, Clone, Deserialize)]
pub struct ValCurs {
    #[serde(rename = "Valute", default)]
    pub valutes: Vec<Valute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Valute {
    #[serde(rename = "CharCode")]
    pub char_code: String,
    #[serde(rename = "Nominal")]
    pub nominal: String, // lot size the value is quoted for, e.g. 100 for KZT
    #[serde(rename = "Value")]
    pub value: String, // decimal comma, e.g. "92,5000"
}
