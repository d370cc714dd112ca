//! Client for the queue-based generation API.
//!
//! Every generation endpoint (image, video, TTS, STT) goes through the same
//! submit/poll/fetch lifecycle: POST the payload to the model endpoint, poll
//! the returned status URL until the job finishes, then fetch the result
//! document.

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{GenError, GenResult};
use crate::poll::{JobStatus, PollConfig, PollState};

/// Queue API client. Cheap to clone; shares the underlying HTTP pool.
#[derive(Clone)]
pub struct QueueClient {
    http: Client,
    base_url: String,
    api_key: String,
}

/// Response to a job submission.
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    request_id: String,
    status_url: String,
    response_url: String,
}

/// Status document returned while a job is queued or running.
#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
    #[serde(default)]
    queue_position: Option<u32>,
    #[serde(default)]
    error: Option<String>,
}

/// Handle to a submitted job.
#[derive(Debug, Clone)]
pub struct SubmittedJob {
    pub request_id: String,
    status_url: String,
    response_url: String,
}

impl QueueClient {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn auth_value(&self) -> String {
        format!("Key {}", self.api_key)
    }

    /// Submit a payload to a model endpoint.
    pub async fn submit(&self, model: &str, payload: &Value) -> GenResult<SubmittedJob> {
        let url = format!("{}/{}", self.base_url, model);
        debug!(model, "submitting generation job");

        let response = self
            .http
            .post(&url)
            .header("Authorization", self.auth_value())
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenError::from_status(status, body));
        }

        let submitted: SubmitResponse = response.json().await?;
        info!(model, request_id = %submitted.request_id, "job submitted");
        Ok(SubmittedJob {
            request_id: submitted.request_id,
            status_url: submitted.status_url,
            response_url: submitted.response_url,
        })
    }

    /// Check the status of a submitted job.
    pub async fn status(&self, job: &SubmittedJob) -> GenResult<JobStatus> {
        let response = self
            .http
            .get(&job.status_url)
            .header("Authorization", self.auth_value())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenError::from_status(status, body));
        }

        let status: StatusResponse = response.json().await?;
        if let Some(pos) = status.queue_position {
            debug!(request_id = %job.request_id, queue_position = pos, "job queued");
        }

        Ok(match status.status.as_str() {
            "COMPLETED" => JobStatus::Completed,
            "FAILED" => JobStatus::Failed {
                error: status.error,
            },
            "IN_PROGRESS" => JobStatus::InProgress,
            _ => JobStatus::InQueue,
        })
    }

    /// Fetch the result document of a completed job.
    ///
    /// The provider signals content policy rejections with HTTP 422 on the
    /// result endpoint rather than a FAILED status.
    pub async fn fetch_result(&self, job: &SubmittedJob) -> GenResult<Value> {
        let response = self
            .http
            .get(&job.response_url)
            .header("Authorization", self.auth_value())
            .send()
            .await?;

        let status = response.status().as_u16();
        if status == 422 {
            let body = response.text().await.unwrap_or_default();
            warn!(request_id = %job.request_id, "result rejected by content policy");
            return Err(GenError::ContentPolicy(body));
        }
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenError::from_status(status, body));
        }

        Ok(response.json().await?)
    }

    /// Submit a payload and drive polling to completion.
    pub async fn run(
        &self,
        model: &str,
        payload: &Value,
        config: &PollConfig,
    ) -> GenResult<Value> {
        let job = self.submit(model, payload).await?;
        let mut state = PollState::Submitted;

        loop {
            tokio::time::sleep(config.delay).await;
            let status = self.status(&job).await?;
            state = state.advance(&status, config);

            match &state {
                PollState::Completed => {
                    info!(model, request_id = %job.request_id, "job completed");
                    return self.fetch_result(&job).await;
                }
                PollState::Failed { error } => {
                    warn!(model, request_id = %job.request_id, %error, "job failed");
                    return Err(GenError::JobFailed(error.clone()));
                }
                PollState::TimedOut => {
                    warn!(model, request_id = %job.request_id, "job timed out");
                    return Err(GenError::JobTimeout {
                        polls: config.max_polls,
                    });
                }
                PollState::Submitted | PollState::Polling { .. } => {}
            }
        }
    }
}

/// Poll config tuned for tests: short delays, small budgets.
#[cfg(test)]
pub(crate) fn fast_poll(max_polls: u32) -> PollConfig {
    PollConfig {
        max_polls,
        delay: std::time::Duration::from_millis(5),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> QueueClient {
        QueueClient::new(Client::new(), server.uri(), "test-key")
    }

    #[tokio::test]
    async fn runs_job_to_completion() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/fal-ai/flux/schnell"))
            .and(header("Authorization", "Key test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "request_id": "req-1",
                "status_url": format!("{}/status/req-1", server.uri()),
                "response_url": format!("{}/result/req-1", server.uri()),
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/status/req-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "COMPLETED"
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/result/req-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "images": [{"url": "https://cdn.example/img.png"}]
            })))
            .mount(&server)
            .await;

        let result = client(&server)
            .run("fal-ai/flux/schnell", &json!({"prompt": "a cat"}), &fast_poll(5))
            .await
            .unwrap();
        assert_eq!(
            result["images"][0]["url"],
            "https://cdn.example/img.png"
        );
    }

    #[tokio::test]
    async fn maps_422_result_to_content_policy() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "request_id": "req-2",
                "status_url": format!("{}/status/req-2", server.uri()),
                "response_url": format!("{}/result/req-2", server.uri()),
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/status/req-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "COMPLETED"
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/result/req-2"))
            .respond_with(ResponseTemplate::new(422).set_body_string("unsafe content"))
            .mount(&server)
            .await;

        let err = client(&server)
            .run("fal-ai/model", &json!({}), &fast_poll(5))
            .await
            .unwrap_err();
        assert!(matches!(err, GenError::ContentPolicy(_)));
    }

    #[tokio::test]
    async fn reports_failed_job() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "request_id": "req-3",
                "status_url": format!("{}/status/req-3", server.uri()),
                "response_url": format!("{}/result/req-3", server.uri()),
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/status/req-3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "FAILED",
                "error": "model crashed"
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .run("fal-ai/model", &json!({}), &fast_poll(5))
            .await
            .unwrap_err();
        match err {
            GenError::JobFailed(msg) => assert_eq!(msg, "model crashed"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn times_out_on_stuck_job() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "request_id": "req-4",
                "status_url": format!("{}/status/req-4", server.uri()),
                "response_url": format!("{}/result/req-4", server.uri()),
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/status/req-4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "IN_QUEUE",
                "queue_position": 12
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .run("fal-ai/model", &json!({}), &fast_poll(3))
            .await
            .unwrap_err();
        assert!(matches!(err, GenError::JobTimeout { polls: 3 }));
    }

    #[tokio::test]
    async fn submit_maps_auth_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let err = client(&server)
            .submit("fal-ai/model", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, GenError::Unauthorized(401)));
    }
}
