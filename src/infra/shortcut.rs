use std::path::Path;

use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Response, StatusCode,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
    multipart::{Form, Part},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::story::{NamedEntity, ResourceId, StoryPayload, StoryRecord};
use crate::error::{AppError, AppResult};
use crate::services::StoryTrackerService;

const TOKEN_HEADER: &str = "Shortcut-Token";
const UPLOAD_CONTENT_TYPE: &str = "application-type";

pub struct ShortcutClient {
    http: Client,
    base_url: String,
    token: String,
}

impl ShortcutClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn json_request(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(CONTENT_TYPE, "application/json")
            .header(TOKEN_HEADER, &self.token)
    }

    async fn send(request: RequestBuilder) -> AppResult<Response> {
        request
            .send()
            .await
            .map_err(|err| AppError::Transport(err.to_string()))
    }

    async fn send_story(
        &self,
        request: RequestBuilder,
        payload: &StoryPayload,
        expected: StatusCode,
    ) -> AppResult<StoryRecord> {
        let response = Self::send(self.json_request(request).json(payload)).await?;
        let body = expect_status(response, &[expected]).await?;
        let raw: Value = serde_json::from_str(&body)
            .map_err(|err| AppError::MalformedResponse(format!("story body is not JSON: {err}")))?;
        StoryRecord::from_json(raw)
            .ok_or_else(|| AppError::MalformedResponse("story body has no id".to_string()))
    }

    async fn list_entities(&self, path: &str) -> AppResult<Vec<NamedEntity>> {
        let request = self.json_request(self.http.get(self.endpoint(path)));
        let response = Self::send(request).await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("Listing {path} returned {status}; no names will be resolved");
            return Ok(Vec::new());
        }

        let listed: Vec<ListedEntity> = response
            .json()
            .await
            .map_err(|err| AppError::MalformedResponse(format!("failed to parse {path}: {err}")))?;
        debug!("Fetched {} entries from {path}", listed.len());

        Ok(listed
            .into_iter()
            .filter_map(ListedEntity::into_named)
            .collect())
    }
}

/// Maps a response to its body text when the status is one of `accepted`,
/// otherwise to the error matching the status.
async fn expect_status(response: Response, accepted: &[StatusCode]) -> AppResult<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unable to read response>".to_string());

    if accepted.contains(&status) {
        return Ok(body);
    }

    debug!("Shortcut responded with {status}: {body}");
    Err(match status {
        StatusCode::UNAUTHORIZED => AppError::InvalidCredentials,
        StatusCode::BAD_REQUEST => AppError::BadRequest(body),
        StatusCode::NOT_FOUND => AppError::NotFound(body),
        StatusCode::UNPROCESSABLE_ENTITY => AppError::Unprocessable(body),
        other => AppError::UnknownStatus {
            status: other.as_u16(),
            body,
        },
    })
}

#[async_trait]
impl StoryTrackerService for ShortcutClient {
    async fn create_story(&self, payload: &StoryPayload) -> AppResult<StoryRecord> {
        info!("Creating Shortcut story");
        let request = self.http.post(self.endpoint("stories"));
        self.send_story(request, payload, StatusCode::CREATED).await
    }

    async fn update_story(&self, story_id: i64, payload: &StoryPayload) -> AppResult<StoryRecord> {
        info!("Updating Shortcut story {story_id}");
        let request = self
            .http
            .post(self.endpoint(&format!("stories/{story_id}")));
        self.send_story(request, payload, StatusCode::OK).await
    }

    async fn upload_file(&self, path: &Path) -> AppResult<ResourceId> {
        let contents = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        debug!("Uploading {} ({} bytes)", path.display(), contents.len());

        // Not a valid MIME type, so it goes in as a raw part header.
        let mut part_headers = HeaderMap::new();
        part_headers.insert(CONTENT_TYPE, HeaderValue::from_static(UPLOAD_CONTENT_TYPE));
        let part = Part::bytes(contents)
            .file_name(file_name)
            .headers(part_headers);
        let request = self
            .http
            .post(self.endpoint("files"))
            .header(TOKEN_HEADER, &self.token)
            .multipart(Form::new().part("file", part));

        let response = Self::send(request).await?;
        let body = expect_status(response, &[StatusCode::OK, StatusCode::CREATED]).await?;
        let uploaded: Vec<UploadedFile> = serde_json::from_str(&body).map_err(|err| {
            AppError::MalformedResponse(format!("failed to parse upload response: {err}"))
        })?;

        uploaded
            .into_iter()
            .next()
            .map(|file| file.id)
            .ok_or_else(|| {
                AppError::MalformedResponse(format!(
                    "upload of {} returned no files",
                    path.display()
                ))
            })
    }

    async fn list_labels(&self) -> AppResult<Vec<NamedEntity>> {
        self.list_entities("labels").await
    }

    async fn list_members(&self) -> AppResult<Vec<NamedEntity>> {
        self.list_entities("members").await
    }
}

#[derive(Deserialize)]
struct UploadedFile {
    id: ResourceId,
}

#[derive(Deserialize)]
struct ListedEntity {
    id: ResourceId,
    name: Option<String>,
    profile: Option<MemberProfile>,
}

impl ListedEntity {
    fn into_named(self) -> Option<NamedEntity> {
        let name = self
            .name
            .or_else(|| self.profile.and_then(|profile| profile.name))?;
        Some(NamedEntity { id: self.id, name })
    }
}

#[derive(Deserialize)]
struct MemberProfile {
    name: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::domain::story::StoryType;

    fn payload() -> StoryPayload {
        StoryPayload {
            name: Some("X".to_string()),
            description: Some("Y".to_string()),
            story_type: Some(StoryType::Bug),
            project_id: Some(1),
            ..StoryPayload::default()
        }
    }

    #[tokio::test]
    async fn creates_story_with_token_header() -> AppResult<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/stories"))
            .and(header("Shortcut-Token", "secret"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({
                "archived": true,
                "move_to": "first",
                "name": "X",
                "description": "Y",
                "story_type": "bug",
                "project_id": 1
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 42,
                "app_url": "https://app.shortcut.com/x/story/42"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ShortcutClient::new(mock_server.uri(), "secret");
        let record = client.create_story(&payload()).await?;

        assert_eq!(record.id, ResourceId::Number(42));
        assert_eq!(
            record.app_url.as_deref(),
            Some("https://app.shortcut.com/x/story/42")
        );
        Ok(())
    }

    #[tokio::test]
    async fn create_treats_ok_as_unexpected() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/stories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
            .mount(&mock_server)
            .await;

        let client = ShortcutClient::new(mock_server.uri(), "secret");
        let error = client.create_story(&payload()).await.unwrap_err();
        assert!(matches!(error, AppError::UnknownStatus { status: 200, .. }));
    }

    #[tokio::test]
    async fn maps_error_statuses() {
        let cases: [(u16, &str); 5] = [
            (401, "denied"),
            (400, "bad field"),
            (404, "no such story"),
            (422, "cannot process"),
            (500, "boom"),
        ];

        for (status, body) in cases {
            let mock_server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/stories/99"))
                .respond_with(ResponseTemplate::new(status).set_body_string(body))
                .mount(&mock_server)
                .await;

            let client = ShortcutClient::new(mock_server.uri(), "secret");
            let error = client
                .update_story(99, &StoryPayload::default())
                .await
                .unwrap_err();

            match (status, error) {
                (401, AppError::InvalidCredentials) => {}
                (400, AppError::BadRequest(message))
                | (404, AppError::NotFound(message))
                | (422, AppError::Unprocessable(message)) => assert_eq!(message, body),
                (500, AppError::UnknownStatus { status, body: message }) => {
                    assert_eq!(status, 500);
                    assert_eq!(message, body);
                }
                (status, error) => panic!("unexpected mapping for {status}: {error:?}"),
            }
        }
    }

    #[tokio::test]
    async fn updates_story_by_public_id() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/stories/1234"))
            .and(header("Shortcut-Token", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1234})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ShortcutClient::new(mock_server.uri(), "secret");
        let record = client
            .update_story(1234, &StoryPayload::default())
            .await
            .unwrap();
        assert_eq!(record.id.to_string(), "1234");
        assert!(record.app_url.is_none());
    }

    #[tokio::test]
    async fn uploads_file_as_multipart() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("report_a.csv");
        std::fs::write(&file_path, "a,b\n1,2\n").unwrap();

        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/files"))
            .and(header("Shortcut-Token", "secret"))
            .and(body_string_contains("name=\"file\""))
            .and(body_string_contains("filename=\"report_a.csv\""))
            .and(body_string_contains("content-type: application-type"))
            .and(body_string_contains("a,b"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!([{"id": 555, "name": "report_a.csv"}])),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ShortcutClient::new(mock_server.uri(), "secret");
        let file_id = client.upload_file(&file_path).await.unwrap();
        assert_eq!(file_id, ResourceId::Number(555));
    }

    #[tokio::test]
    async fn maps_upload_failures_like_story_requests() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("report_a.csv");
        std::fs::write(&file_path, "a,b\n").unwrap();

        let cases: [(u16, &str); 2] = [(401, "denied"), (422, "file too large")];
        for (status, body) in cases {
            let mock_server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/files"))
                .respond_with(ResponseTemplate::new(status).set_body_string(body))
                .expect(1)
                .mount(&mock_server)
                .await;

            let client = ShortcutClient::new(mock_server.uri(), "secret");
            let error = client.upload_file(&file_path).await.unwrap_err();

            match (status, error) {
                (401, AppError::InvalidCredentials) => {}
                (422, AppError::Unprocessable(message)) => assert_eq!(message, body),
                (status, error) => panic!("unexpected mapping for {status}: {error:?}"),
            }
        }
    }

    #[tokio::test]
    async fn upload_of_missing_file_is_io_error() {
        let client = ShortcutClient::new("http://127.0.0.1:9", "secret");
        let error = client
            .upload_file(Path::new("does/not/exist.csv"))
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::Io(_)));
    }

    #[tokio::test]
    async fn lists_labels_and_members() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/labels"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "L1", "name": "bug"},
                {"id": "L2", "name": "urgent"}
            ])))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/members"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "uuid-1", "profile": {"name": "Ada"}},
                {"id": "uuid-2", "name": "Grace"},
                {"id": "uuid-3", "profile": {}}
            ])))
            .mount(&mock_server)
            .await;

        let client = ShortcutClient::new(mock_server.uri(), "secret");
        let labels = client.list_labels().await.unwrap();
        assert_eq!(
            labels,
            vec![
                NamedEntity {
                    id: ResourceId::Text("L1".to_string()),
                    name: "bug".to_string()
                },
                NamedEntity {
                    id: ResourceId::Text("L2".to_string()),
                    name: "urgent".to_string()
                },
            ]
        );

        let members = client.list_members().await.unwrap();
        let names: Vec<_> = members.iter().map(|member| member.name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Grace"]);
    }

    #[tokio::test]
    async fn failed_lookup_yields_empty_list() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/labels"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = ShortcutClient::new(mock_server.uri(), "bad");
        assert!(client.list_labels().await.unwrap().is_empty());
    }
}
