//! Dropi login tool.
//!
//! Exchanges account credentials for the session token the other Dropi
//! tools send as `X-Authorization`.

use reqwest::Method;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::common::{dropi_request, dropi_url};
use crate::core::Secret;
use crate::domains::tools::definitions::common::{require_email, require_secret};
use crate::domains::tools::{ToolContext, ToolError, UpstreamTool};

fn default_white_brand_id() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DropiCredentials {
    #[schemars(description = "Account email")]
    pub email: String,

    #[schemars(description = "Account password")]
    pub password: Secret,

    #[serde(default = "default_white_brand_id")]
    #[schemars(description = "White-label brand id. Defaults to 1.")]
    pub white_brand_id: u32,

    #[serde(default)]
    #[schemars(description = "Brand name. Defaults to empty.")]
    pub brand: String,

    #[serde(default)]
    #[schemars(description = "One-time password when the account requires it")]
    pub otp: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DropiLoginParams {
    #[schemars(description = "Credentials and access data")]
    pub input: DropiCredentials,
}

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
    white_brand_id: u32,
    brand: &'a str,
    otp: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: Secret,
}

/// Structured output: the session token.
#[derive(Debug, Clone, Serialize)]
pub struct DropiSession {
    pub token: Secret,
}

#[derive(Debug, Clone, Default)]
pub struct DropiLoginTool;

#[async_trait::async_trait]
impl UpstreamTool for DropiLoginTool {
    const NAME: &'static str = "login_dropi";

    const DESCRIPTION: &'static str = "Log in to Dropi with email and password and return the session token used by the other Dropi tools.";

    type Params = DropiLoginParams;
    type Output = DropiSession;

    fn validate(&self, params: &DropiLoginParams) -> Result<(), ToolError> {
        require_email("email", &params.input.email)?;
        require_secret("password", &params.input.password)
    }

    async fn execute(
        &self,
        params: DropiLoginParams,
        ctx: &ToolContext,
    ) -> Result<DropiSession, ToolError> {
        let credentials = &params.input;
        info!("Logging in to Dropi as {}", credentials.email);

        let body = LoginBody {
            email: &credentials.email,
            password: credentials.password.expose(),
            white_brand_id: credentials.white_brand_id,
            brand: &credentials.brand,
            otp: credentials.otp.as_deref(),
        };
        let request = dropi_request(ctx, Method::POST, dropi_url(ctx, "api/login")).json(&body)?;
        let response: LoginResponse = ctx.client().call(request).await?;

        Ok(DropiSession {
            token: response.token,
        })
    }

    fn summarize(&self, _output: &DropiSession) -> String {
        "Logged in to Dropi. The session token is in the structured result.".to_string()
    }
}
