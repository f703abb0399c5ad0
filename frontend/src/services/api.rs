use async_trait::async_trait;
use brain_bridge_core::io::{decode_body, endpoints, ApiError, BrainBridgeApi};
use brain_bridge_core::{stored_auth_header, UserStore};
use gloo::net::http::{Request, RequestBuilder, Response};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::{
    BookingIntentRequest, BookingIntentResult, ChatMessage, Enrollment, Notification, RawCourse,
    SendMessageRequest, Session, UpdateProfileRequest, User,
};
use std::sync::Arc;

/// API client for the Brain Bridge REST API
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    users: Arc<dyn UserStore>,
}

impl ApiClient {
    /// Create a client for `base_url`; the bearer token is read from `users`
    /// on every request so login and logout take effect immediately
    pub fn new(base_url: impl Into<String>, users: Arc<dyn UserStore>) -> Self {
        Self {
            base_url: base_url.into(),
            users,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header("Accept", "application/json");
        match stored_auth_header(self.users.as_ref()) {
            Ok(Some(header)) => builder.header("Authorization", &header),
            Ok(None) => builder,
            Err(e) => {
                warn!("Could not read stored session: {:#}", e);
                builder
            }
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let builder = self.authorized(Request::get(&self.url(path)));
        let body = read_body(builder.send().await).await?;
        decode_body(&body)
    }

    async fn send_json<B, T>(&self, builder: RequestBuilder, body: &B) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let request = self
            .authorized(builder)
            .json(body)
            .map_err(|e| ApiError::Network(format!("Failed to serialize request: {}", e)))?;
        let body = read_body(request.send().await).await?;
        decode_body(&body)
    }
}

/// Body of a successful response, or the API's error message
async fn read_body(response: Result<Response, gloo::net::Error>) -> Result<String, ApiError> {
    let response = response.map_err(|e| ApiError::Network(e.to_string()))?;
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if response.ok() {
        Ok(body)
    } else {
        Err(ApiError::from_response(response.status(), &body))
    }
}

#[async_trait(?Send)]
impl BrainBridgeApi for ApiClient {
    async fn get_session(&self, slot_id: i64) -> Result<Session, ApiError> {
        self.get(&endpoints::slot(slot_id)).await
    }

    async fn create_booking_intent(
        &self,
        request: &BookingIntentRequest,
    ) -> Result<BookingIntentResult, ApiError> {
        let builder = Request::post(&self.url(endpoints::BOOKING_INTENTS));
        self.send_json(builder, request).await
    }

    async fn get_enrolled_courses(&self) -> Result<Vec<Enrollment>, ApiError> {
        self.get(endpoints::ENROLLED_COURSES).await
    }

    async fn get_public_courses(&self) -> Result<Vec<RawCourse>, ApiError> {
        self.get(endpoints::PUBLIC_COURSES).await
    }

    async fn get_public_course(&self, course_id: i64) -> Result<RawCourse, ApiError> {
        self.get(&endpoints::public_course(course_id)).await
    }

    async fn get_courses(&self) -> Result<Vec<RawCourse>, ApiError> {
        self.get(endpoints::COURSES).await
    }

    async fn delete_course(&self, course_id: i64) -> Result<(), ApiError> {
        let builder = self.authorized(Request::delete(&self.url(&endpoints::course(course_id))));
        read_body(builder.send().await).await.map(|_| ())
    }

    async fn get_me(&self) -> Result<User, ApiError> {
        self.get(endpoints::ME).await
    }

    async fn update_me(&self, request: &UpdateProfileRequest) -> Result<User, ApiError> {
        let builder = Request::put(&self.url(endpoints::ME));
        self.send_json(builder, request).await
    }

    async fn get_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.get(endpoints::NOTIFICATIONS).await
    }

    async fn get_messages(&self, other_user_id: i64) -> Result<Vec<ChatMessage>, ApiError> {
        self.get(&endpoints::conversation(other_user_id)).await
    }

    async fn send_message(&self, request: &SendMessageRequest) -> Result<ChatMessage, ApiError> {
        let builder = Request::post(&self.url(endpoints::MESSAGES));
        self.send_json(builder, request).await
    }
}
