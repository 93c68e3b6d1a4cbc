use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{TranslateError, Translator};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ResponseData {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(rename = "responseData")]
    response_data: ResponseData,
    // MyMemory sends this as a number or as a string depending on the endpoint.
    #[serde(rename = "responseStatus", default)]
    response_status: Option<Value>,
    #[serde(rename = "responseDetails", default)]
    response_details: Option<Value>,
}

pub struct MyMemoryTranslate {
    client: reqwest::Client,
    url: String,
    email: Option<String>,
}

impl MyMemoryTranslate {
    pub fn new(url: &str, email: Option<&str>) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(client, url, email))
    }

    pub fn with_client(client: reqwest::Client, url: &str, email: Option<&str>) -> Self {
        Self {
            client,
            url: url.to_string(),
            email: email.map(str::to_string),
        }
    }

}

#[async_trait]
impl Translator for MyMemoryTranslate {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslateError> {
        let langpair = format!("{}|{}", source, target);
        let mut params = vec![("q", text), ("langpair", langpair.as_str())];
        if let Some(email) = &self.email {
            params.push(("de", email.as_str()));
        }

        debug!("MyMemory sending request: {} chars, {}", text.len(), langpair);

        let body = self
            .client
            .get(&self.url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        debug!("MyMemory response: {}", body);

        parse_response(&body)
    }
}

fn parse_response(body: &str) -> Result<String, TranslateError> {
    let res = serde_json::from_str::<Response>(body)?;

    let accepted = match &res.response_status {
        None => true,
        Some(Value::Number(status)) => status.as_u64() == Some(200),
        Some(Value::String(status)) => status == "200",
        Some(_) => false,
    };
    if !accepted {
        return Err(TranslateError::Rejected {
            status: value_text(res.response_status),
            details: value_text(res.response_details),
        });
    }

    Ok(res.response_data.translated_text)
}

fn value_text(value: Option<Value>) -> String {
    match value {
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
