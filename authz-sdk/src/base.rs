use serde::{de::DeserializeOwned, Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

pub(crate) struct BaseClient {
    api_url: String,
}

impl BaseClient {
    pub fn new(api_url: impl ToString) -> Self {
        Self {
            api_url: api_url.to_string(),
        }
    }

    async fn handle<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, String> {
        let status = resp.status();
        if status.is_success() {
            resp.json::<T>().await.map_err(|e| format!("{e:#?}"))
        } else {
            let message = resp
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("request failed with status {status}"));
            Err(message)
        }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: String,
        headers: &[(&str, &str)],
    ) -> Result<T, String> {
        let client = reqwest::Client::new();
        let mut request_builder = client.get(format!("{}{}", self.api_url, path));
        for (name, value) in headers {
            request_builder = request_builder.header(*name, *value);
        }
        let resp = request_builder
            .send()
            .await
            .map_err(|e| format!("{e:#?}"))?;
        Self::handle(resp).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: String,
        body: &B,
    ) -> Result<T, String> {
        let client = reqwest::Client::new();
        let resp = client
            .post(format!("{}{}", self.api_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| format!("{e:#?}"))?;
        Self::handle(resp).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: String) -> Result<T, String> {
        let client = reqwest::Client::new();
        let resp = client
            .delete(format!("{}{}", self.api_url, path))
            .send()
            .await
            .map_err(|e| format!("{e:#?}"))?;
        Self::handle(resp).await
    }
}
