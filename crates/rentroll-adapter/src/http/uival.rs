/*
[INPUT]:  Business id
[OUTPUT]: UI option lists (expense account rules per business unit)
[POS]:    HTTP layer - /v1/uival option endpoints
[UPDATE]: When adding option lists or the service fixes its encoding
*/

use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::http::client::check_status;
use crate::http::{RentrollClient, RentrollError, Result};
use crate::types::ExpenseRules;

impl RentrollClient {
    /// Account rules usable on expenses, keyed by BUD
    ///
    /// GET /v1/uival/{BID}/app.ExpenseRules
    pub async fn expense_rules(&self, bid: i64) -> Result<ExpenseRules> {
        let url = self.url(&format!("v1/uival/{bid}/app.ExpenseRules"))?;
        let builder = self.request(Method::GET, url);
        let body = self.send_text(builder).await?;
        decode_option_list(&body)
    }
}

/// Decode an option-list reply.
///
/// The service sometimes sends the JSON document as a JSON string, so a
/// string value is unwrapped and parsed a second time.
pub(crate) fn decode_option_list(body: &str) -> Result<ExpenseRules> {
    let value = match serde_json::from_str::<Value>(body)? {
        Value::String(inner) => {
            debug!("option list arrived double-encoded");
            serde_json::from_str::<Value>(&inner)?
        }
        other => other,
    };
    check_status(&value)?;
    if !value.is_object() {
        return Err(RentrollError::InvalidResponse(
            "expected an object keyed by business unit".to_string(),
        ));
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ClientConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RULES: &str = r#"{"REX":[{"id":3,"text":"Repairs"},{"id":4,"text":"Utilities"}]}"#;

    #[test]
    fn decodes_plain_object() {
        let rules = decode_option_list(RULES).expect("rules");
        assert_eq!(rules.for_unit("REX").len(), 2);
    }

    #[test]
    fn decodes_double_encoded_object() {
        let encoded = serde_json::to_string(RULES).expect("encode");
        let rules = decode_option_list(&encoded).expect("rules");
        assert_eq!(rules.find("REX", 3).map(|o| o.text.as_str()), Some("Repairs"));
    }

    #[test]
    fn rejects_error_envelope() {
        let err = decode_option_list(r#"{"status":"error","message":"unknown business"}"#)
            .expect_err("should fail");
        assert!(err.is_business_error());
    }

    #[test]
    fn rejects_non_object() {
        let err = decode_option_list("[1,2,3]").expect_err("should fail");
        assert!(matches!(err, RentrollError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_expense_rules_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/uival/1/app.ExpenseRules"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                serde_json::to_string(RULES).expect("encode"),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            RentrollClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
                .expect("client init");
        let rules = client.expense_rules(1).await.expect("expense_rules failed");

        assert_eq!(rules.for_unit("REX")[1].text, "Utilities");
    }
}
