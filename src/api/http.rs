use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};

use crate::config::ApiSettings;
use crate::error::{Result, SyncError};
use crate::models::{CourseId, RemoteFile, RemoteFolder};

use super::CanvasApi;

/// Blocking HTTP client for the Canvas REST API.
#[derive(Debug, Clone)]
pub struct HttpCanvasApi {
    client: Client,
    base_url: String,
    per_page: u32,
}

/// Build a client sending JSON accept and optional bearer auth on every request.
pub(crate) fn build_client(settings: &ApiSettings) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(token) = &settings.token {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| SyncError::Config(format!("invalid token: {e}")))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    let client = Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()?;
    Ok(client)
}

impl HttpCanvasApi {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        Ok(Self {
            client: build_client(settings)?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            per_page: settings.per_page,
        })
    }

    fn files_url(&self, course: CourseId) -> String {
        format!(
            "{}/courses/{course}/files?per_page={}",
            self.base_url, self.per_page
        )
    }

    fn folder_url(&self, folder_id: u64) -> String {
        format!("{}/folders/{folder_id}", self.base_url)
    }
}

impl CanvasApi for HttpCanvasApi {
    fn list_files(&self, course: CourseId) -> Result<Vec<RemoteFile>> {
        let url = self.files_url(course);
        tracing::debug!("GET {url}");
        let listing_err = |detail: String| SyncError::Listing { detail };

        let res = self
            .client
            .get(&url)
            .send()
            .map_err(|e| listing_err(e.to_string()))?;
        let status = res.status();
        if !status.is_success() {
            return Err(listing_err(format!("HTTP {status}")));
        }
        res.json().map_err(|e| listing_err(e.to_string()))
    }

    fn get_folder(&self, folder_id: u64) -> Result<RemoteFolder> {
        let url = self.folder_url(folder_id);
        tracing::debug!("GET {url}");
        let folder_err = |detail: String| SyncError::Folder { folder_id, detail };

        let res = self
            .client
            .get(&url)
            .send()
            .map_err(|e| folder_err(e.to_string()))?;
        let status = res.status();
        if !status.is_success() {
            return Err(folder_err(format!("HTTP {status}")));
        }
        res.json().map_err(|e| folder_err(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn settings(base_url: String, token: Option<&str>) -> ApiSettings {
        ApiSettings {
            base_url,
            token: token.map(String::from),
            per_page: 100,
            timeout_secs: 5,
        }
    }

    #[test]
    fn list_files_requests_single_page() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/courses/80071/files")
            .match_query(Matcher::UrlEncoded("per_page".into(), "100".into()))
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"id":1,"display_name":"a.pdf","folder_id":9,"url":"https://x/1"},
                    {"id":2,"display_name":"b.pdf","folder_id":null,"url":"https://x/2"}]"#,
            )
            .create();

        let api = HttpCanvasApi::new(&settings(server.url(), None)).unwrap();
        let files = api.list_files(CourseId(80071)).unwrap();

        mock.assert();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].folder_id, Some(9));
        assert_eq!(files[1].folder_id, None);
    }

    #[test]
    fn token_is_sent_as_bearer() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/folders/5")
            .match_header("authorization", "Bearer s3cret")
            .with_status(200)
            .with_body(r#"{"name":"Slides","parent_folder_id":null}"#)
            .create();

        let api = HttpCanvasApi::new(&settings(server.url(), Some("s3cret"))).unwrap();
        let folder = api.get_folder(5).unwrap();

        mock.assert();
        assert_eq!(folder.name, "Slides");
    }

    #[test]
    fn listing_failure_status_is_listing_error() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/courses/1/files")
            .match_query(Matcher::Any)
            .with_status(401)
            .create();

        let api = HttpCanvasApi::new(&settings(server.url(), None)).unwrap();
        let err = api.list_files(CourseId(1)).unwrap_err();
        assert!(matches!(err, SyncError::Listing { .. }));
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn folder_failure_names_the_folder() {
        let mut server = Server::new();
        let _mock = server.mock("GET", "/folders/77").with_status(404).create();

        let api = HttpCanvasApi::new(&settings(server.url(), None)).unwrap();
        let err = api.get_folder(77).unwrap_err();
        assert!(matches!(err, SyncError::Folder { folder_id: 77, .. }));
    }

    #[test]
    fn trailing_slash_in_base_url_is_ignored() {
        let api = HttpCanvasApi::new(&settings("https://c.example/api/v1/".into(), None)).unwrap();
        assert_eq!(api.folder_url(3), "https://c.example/api/v1/folders/3");
        assert_eq!(
            api.files_url(CourseId(4)),
            "https://c.example/api/v1/courses/4/files?per_page=100"
        );
    }
}
