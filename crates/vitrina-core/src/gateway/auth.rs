use async_trait::async_trait;
use reqwest::Method;

use super::ApiClient;
use crate::error::GatewayError;
use crate::model::{LoginRequest, LoginResponse};
use crate::session::LoginApi;

#[async_trait]
impl LoginApi for ApiClient {
    /// `POST /auth/login` with `{initData}`; the backend re-checks the host
    /// signature and answers with `{token, user}`.
    async fn login(&self, init_data: &str) -> Result<LoginResponse, GatewayError> {
        let body = LoginRequest { init_data };
        self.send(self.request(Method::POST, "auth/login")?.json(&body)).await
    }
}
