//! Typed wrapper over the Lockify REST API.
//!
//! Every protected call takes the [`Session`] explicitly. Non-success responses are
//! turned into [`ClientError::Api`] carrying the server's `{"error": ...}` message.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use store::{Note, NoteDraft, NotePatch, UserInfo};
use tracing::debug;

use crate::error::ClientError;
use crate::session::Session;

const TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct Message {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignupBody<'a> {
    full_name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: String,
}

impl ApiClient {
    /// `base` is the API root including its `/api` prefix, e.g. `http://127.0.0.1:5000/api`.
    pub fn new(base: &str) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(TIMEOUT).build()?;
        Ok(Self {
            http,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn authed(&self, request: RequestBuilder, session: &Session) -> RequestBuilder {
        request.bearer_auth(&session.token)
    }

    pub async fn health(&self) -> Result<Health, ClientError> {
        let response = self.http.get(self.url("/health")).send().await?;
        decode(response).await
    }

    /// Returns the server's confirmation message.
    pub async fn signup(&self, full_name: &str, email: &str, password: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/signup"))
            .json(&SignupBody {
                full_name,
                email,
                password,
            })
            .send()
            .await?;
        let body: Message = decode(response).await?;
        Ok(body.message)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&LoginBody { email, password })
            .send()
            .await?;
        let session: Session = decode(response).await?;
        debug!(user = %session.user.id, "logged in");
        Ok(session)
    }

    pub async fn me(&self, session: &Session) -> Result<UserInfo, ClientError> {
        let request = self.authed(self.http.get(self.url("/auth/me")), session);
        decode(request.send().await?).await
    }

    /// Most recently updated first.
    pub async fn list_notes(&self, session: &Session) -> Result<Vec<Note>, ClientError> {
        let request = self.authed(self.http.get(self.url("/notes/get")), session);
        decode(request.send().await?).await
    }

    /// `draft.content` must already be encrypted.
    pub async fn create_note(&self, session: &Session, draft: &NoteDraft) -> Result<Note, ClientError> {
        let request = self.authed(self.http.post(self.url("/notes/save")), session);
        decode(request.json(draft).send().await?).await
    }

    pub async fn update_note(&self, session: &Session, id: &str, patch: &NotePatch) -> Result<Note, ClientError> {
        let request = self.authed(self.http.put(self.url(&format!("/notes/{id}"))), session);
        decode(request.json(patch).send().await?).await
    }

    pub async fn delete_note(&self, session: &Session, id: &str) -> Result<(), ClientError> {
        let request = self.authed(self.http.delete(self.url(&format!("/notes/{id}"))), session);
        let _: Message = decode(request.send().await?).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        message: error_message(status, &body),
    })
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        })
}
