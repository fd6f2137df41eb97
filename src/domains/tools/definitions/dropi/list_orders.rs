//! Dropi order listing tool.
//!
//! Queries the account's orders by customer phone number. The query string
//! is sent in the exact parameter order the Dropi web client uses.

use chrono::{Duration as ChronoDuration, Local, NaiveDate};
use reqwest::Method;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use super::common::{authorized_request, dropi_url};
use crate::core::Secret;
use crate::domains::tools::definitions::common::{require_non_empty, require_secret};
use crate::domains::tools::{ToolContext, ToolError, UpstreamTool};

/// Days covered by the default date window, today included.
pub const DEFAULT_WINDOW_DAYS: i64 = 35;

/// Largest page the tool will request.
pub const MAX_RESULT_NUMBER: u32 = 100;

fn default_order_by() -> String {
    "id".to_string()
}

fn default_order_direction() -> String {
    "desc".to_string()
}

fn default_result_number() -> u32 {
    10
}

fn default_filter_date_by() -> String {
    "FECHA DE CREADO".to_string()
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct OrdersQuery {
    #[schemars(description = "Session token from login_dropi")]
    pub token: Secret,

    #[schemars(description = "Dropi user id")]
    pub user_id: String,

    #[schemars(description = "Customer phone number on the order")]
    pub order_phone_number: String,

    #[serde(default = "default_order_by")]
    #[schemars(description = "Sort field. Defaults to 'id'.")]
    pub order_by: String,

    #[serde(default = "default_order_direction")]
    #[schemars(description = "'asc' or 'desc'. Defaults to 'desc'.")]
    pub order_direction: String,

    #[serde(default = "default_result_number")]
    #[schemars(description = "Page size, 1 to 100. Defaults to 10.")]
    pub result_number: u32,

    #[serde(default)]
    #[schemars(description = "Offset of the first order. Defaults to 0.")]
    pub start: u32,

    #[serde(default)]
    #[schemars(description = "Order status filter. Empty means any status.")]
    pub status: String,

    #[serde(default)]
    #[schemars(description = "Start date (YYYY-MM-DD). Defaults to 34 days before today.")]
    pub from: Option<String>,

    #[serde(default)]
    #[schemars(description = "End date (YYYY-MM-DD). Defaults to today.")]
    pub until: Option<String>,

    #[serde(default)]
    #[schemars(description = "Tag id filter. Empty means any tag.")]
    pub tag_id: String,

    #[serde(default = "default_filter_date_by")]
    #[schemars(description = "Which date the window applies to. Defaults to 'FECHA DE CREADO'.")]
    pub filter_date_by: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DropiOrdersParams {
    #[schemars(description = "Authentication data and filters")]
    pub input: OrdersQuery,
}

/// Resolved `from`/`until` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub until: NaiveDate,
}

impl DateWindow {
    /// The window of [`DEFAULT_WINDOW_DAYS`] days ending on `today`.
    pub fn ending_on(today: NaiveDate) -> Self {
        Self {
            from: today - ChronoDuration::days(DEFAULT_WINDOW_DAYS - 1),
            until: today,
        }
    }

    /// Resolve optional bounds against the default window ending on `today`.
    pub fn resolve(
        from: Option<&str>,
        until: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, ToolError> {
        let until = match until {
            Some(value) => parse_date("until", value)?,
            None => today,
        };
        let from = match from {
            Some(value) => parse_date("from", value)?,
            None => Self::ending_on(until).from,
        };

        if from > until {
            return Err(ToolError::invalid_arguments(format!(
                "'from' ({from}) must not be after 'until' ({until})"
            )));
        }
        Ok(Self { from, until })
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ToolError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ToolError::invalid_arguments(format!(
            "'{field}' must be a date in YYYY-MM-DD format, got '{value}'"
        ))
    })
}

/// Build the orders query string, parameters in wire order.
pub fn orders_query(query: &OrdersQuery, window: DateWindow) -> Result<String, ToolError> {
    let from = window.from.format("%Y-%m-%d").to_string();
    let until = window.until.format("%Y-%m-%d").to_string();
    let result_number = query.result_number.to_string();
    let start = query.start.to_string();

    let pairs: [(&str, &str); 16] = [
        ("exportAs", "orderByRow"),
        ("orderBy", &query.order_by),
        ("orderDirection", &query.order_direction),
        ("result_number", &result_number),
        ("start", &start),
        ("textToSearch", &query.order_phone_number),
        ("status", &query.status),
        ("supplier_id", "false"),
        ("user_id", &query.user_id),
        ("from", &from),
        ("until", &until),
        ("haveIncidenceProcesamiento", "false"),
        ("tag_id", &query.tag_id),
        ("warranty", "false"),
        ("filter_date_by", &query.filter_date_by),
        ("invoiced", "null"),
    ];

    serde_urlencoded::to_string(pairs)
        .map_err(|e| ToolError::invalid_arguments(format!("Unencodable query: {e}")))
}

#[derive(Debug, Clone, Default)]
pub struct DropiOrdersTool;

impl DropiOrdersTool {
    fn today() -> NaiveDate {
        Local::now().date_naive()
    }
}

#[async_trait::async_trait]
impl UpstreamTool for DropiOrdersTool {
    const NAME: &'static str = "getDropiOrders";

    const DESCRIPTION: &'static str = "List Dropi orders matching a customer phone number. Searches orders created in the last 35 days unless 'from'/'until' are given. Returns the Dropi response as received.";

    type Params = DropiOrdersParams;
    type Output = Value;

    fn validate(&self, params: &DropiOrdersParams) -> Result<(), ToolError> {
        let query = &params.input;
        require_secret("token", &query.token)?;
        require_non_empty("user_id", &query.user_id)?;
        require_non_empty("order_phone_number", &query.order_phone_number)?;

        if !(1..=MAX_RESULT_NUMBER).contains(&query.result_number) {
            return Err(ToolError::invalid_arguments(format!(
                "'result_number' must be between 1 and {MAX_RESULT_NUMBER}, got {}",
                query.result_number
            )));
        }

        DateWindow::resolve(query.from.as_deref(), query.until.as_deref(), Self::today())?;
        Ok(())
    }

    async fn execute(&self, params: DropiOrdersParams, ctx: &ToolContext) -> Result<Value, ToolError> {
        let query = params.input;
        let window =
            DateWindow::resolve(query.from.as_deref(), query.until.as_deref(), Self::today())?;
        info!(
            "Listing Dropi orders for phone {} between {} and {}",
            query.order_phone_number, window.from, window.until
        );

        let url = format!(
            "{}?{}",
            dropi_url(ctx, "api/orders/myorders"),
            orders_query(&query, window)?
        );
        let request = authorized_request(ctx, Method::GET, url, &query.token);
        let orders: Value = ctx.client().call(request).await?;

        debug!("Dropi orders response received");
        Ok(orders)
    }

    fn summarize(&self, output: &Value) -> String {
        match output.get("objects").and_then(Value::as_array) {
            Some(objects) if objects.is_empty() => "No Dropi orders found.".to_string(),
            Some(objects) => format!("Found {} Dropi order(s).", objects.len()),
            None => "Dropi orders response received.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::testing::{context_for, text_of};
    use crate::domains::tools::{ErrorKind, call_envelope, run_tool};
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    fn query(extra: Value) -> OrdersQuery {
        let mut base = json!({"token": "tok", "user_id": "77", "order_phone_number": "3001112233"});
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        serde_json::from_value(base).unwrap()
    }

    #[test]
    fn test_default_window_is_35_days() {
        let window = DateWindow::resolve(None, None, date("2025-05-07")).unwrap();
        assert_eq!(window.from, date("2025-04-03"));
        assert_eq!(window.until, date("2025-05-07"));
        assert_eq!((window.until - window.from).num_days() + 1, DEFAULT_WINDOW_DAYS);
    }

    #[test]
    fn test_window_rejects_bad_dates() {
        let today = date("2025-05-07");
        assert!(DateWindow::resolve(Some("2025-13-01"), None, today).is_err());
        assert!(DateWindow::resolve(Some("07/05/2025"), None, today).is_err());
        assert!(DateWindow::resolve(Some("2025-05-08"), Some("2025-05-01"), today).is_err());
        assert_eq!(
            DateWindow::resolve(Some("2025-01-01"), Some("2025-01-31"), today).unwrap(),
            DateWindow {
                from: date("2025-01-01"),
                until: date("2025-01-31")
            }
        );
    }

    #[test]
    fn test_query_keeps_parameter_order() {
        let window = DateWindow::ending_on(date("2025-05-07"));
        let encoded = orders_query(&query(json!({})), window).unwrap();

        assert_eq!(
            encoded,
            "exportAs=orderByRow&orderBy=id&orderDirection=desc&result_number=10&start=0\
             &textToSearch=3001112233&status=&supplier_id=false&user_id=77\
             &from=2025-04-03&until=2025-05-07&haveIncidenceProcesamiento=false\
             &tag_id=&warranty=false&filter_date_by=FECHA+DE+CREADO&invoiced=null"
        );
    }

    #[tokio::test]
    async fn test_lists_orders_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/orders/myorders"))
            .and(header("x-authorization", "Bearer tok"))
            .and(query_param("textToSearch", "3001112233"))
            .and(query_param("from", "2025-01-01"))
            .and(query_param("until", "2025-01-31"))
            .and(query_param("result_number", "25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "isSuccess": true,
                "objects": [{"id": 901, "status": "PENDIENTE"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ctx = context_for(&server.uri());
        let result = run_tool(
            &DropiOrdersTool,
            json!({"input": {
                "token": "tok",
                "user_id": "77",
                "order_phone_number": "3001112233",
                "from": "2025-01-01",
                "until": "2025-01-31",
                "result_number": 25
            }}),
            &ctx,
        )
        .await;

        assert_eq!(result.is_error, Some(false));
        assert_eq!(text_of(&result), "Found 1 Dropi order(s).");
        assert_eq!(
            result.structured_content.unwrap()["payload"]["objects"][0]["id"],
            901
        );
    }

    #[tokio::test]
    async fn test_invalid_filters_rejected_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let ctx = context_for(&server.uri());

        for input in [
            json!({"token": "tok", "user_id": "77", "order_phone_number": "1", "result_number": 0}),
            json!({"token": "tok", "user_id": "77", "order_phone_number": "1", "result_number": 101}),
            json!({"token": "tok", "user_id": "77", "order_phone_number": "1", "from": "yesterday"}),
            json!({"token": "", "user_id": "77", "order_phone_number": "1"}),
            json!({"token": "tok", "user_id": "77"}),
        ] {
            let envelope = call_envelope(&DropiOrdersTool, json!({"input": input}), &ctx).await;
            assert_eq!(envelope.failure().unwrap().kind, ErrorKind::ValidationFailure);
        }
    }

    #[tokio::test]
    async fn test_expired_token_is_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let ctx = context_for(&server.uri());
        let envelope = call_envelope(
            &DropiOrdersTool,
            json!({"input": {"token": "old", "user_id": "77", "order_phone_number": "1"}}),
            &ctx,
        )
        .await;

        let failure = envelope.failure().unwrap();
        assert_eq!(failure.kind, ErrorKind::HttpStatus(401));
        assert_eq!(failure.detail.as_deref(), Some("Unauthorized"));
    }
}
