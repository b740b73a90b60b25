use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

// A poll should never hang longer than a couple of poll intervals
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) struct BaseClient {
    client: Client,
    address: String,
    api_key: Option<String>,
}

#[derive(Error, Debug)]
pub enum APIError {
    #[error("Unable to reach the clinic api")]
    Network,
    #[error("The clinic api responded with a body that could not be parsed")]
    MalformedResponse,
    #[error("The clinic api rejected the credentials")]
    Unauthenticated,
    #[error("The current session is not allowed to perform this request")]
    Unauthorized,
    #[error("The clinic api rejected the request data")]
    BadClientData,
    #[error("Unexpected status code: {0}")]
    UnexpectedStatusCode(StatusCode),
}
pub type APIResponse<T> = Result<T, APIError>;

impl BaseClient {
    pub fn new(address: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            address: address.trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    fn get_client(&self, method: Method, path: String) -> RequestBuilder {
        let url = format!("{}/{}", self.address, path);
        let builder = self.client.request(method, &url);

        if let Some(api_key) = &self.api_key {
            builder.header("x-api-key", api_key.clone())
        } else {
            builder
        }
    }

    fn check_status_code(
        &self,
        res: &Response,
        expected_status_code: StatusCode,
    ) -> Result<(), APIError> {
        let status = res.status();
        if status == expected_status_code {
            return Ok(());
        }
        Err(match status {
            StatusCode::UNAUTHORIZED => APIError::Unauthenticated,
            StatusCode::FORBIDDEN => APIError::Unauthorized,
            StatusCode::BAD_REQUEST => APIError::BadClientData,
            _ => APIError::UnexpectedStatusCode(status),
        })
    }

    async fn get_json_response<T: for<'de> Deserialize<'de>>(
        &self,
        res: Response,
    ) -> APIResponse<T> {
        res.json::<T>()
            .await
            .map_err(|_| APIError::MalformedResponse)
    }

    async fn handle_api_response<T: for<'de> Deserialize<'de>>(
        &self,
        res: Response,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        self.check_status_code(&res, expected_status_code)?;
        self.get_json_response(res).await
    }

    async fn send<T: for<'de> Deserialize<'de>>(
        &self,
        builder: RequestBuilder,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = match builder.send().await {
            Ok(res) => res,
            Err(_) => return Err(APIError::Network),
        };
        self.handle_api_response(res, expected_status_code).await
    }

    pub async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        self.send(self.get_client(Method::GET, path), expected_status_code)
            .await
    }

    pub async fn get_with_query<T: for<'de> Deserialize<'de>, Q: Serialize>(
        &self,
        path: String,
        query: &Q,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let builder = self.get_client(Method::GET, path).query(query);
        self.send(builder, expected_status_code).await
    }
}
