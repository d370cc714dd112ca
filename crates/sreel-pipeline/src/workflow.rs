//! End-to-end video generation workflow.
//!
//! Stages: scene prompts, then per-segment image and video generation
//! fanned out in parallel while narration is synthesized concurrently,
//! then concat, audio mux, and the session manifest.
//!
//! Each segment worker owns its inputs and returns an owned
//! [`GenerationResult`]; the stage joins them and partitions into
//! successes and failures. A run survives partial segment failure but
//! not a failed narration or zero successful segments.

use std::path::PathBuf;
use std::time::Duration;

use futures::future::join_all;
use tracing::{info, warn};

use sreel_gen::{
    resolve_reference_image, ImageClient, ProviderConfig, QueueClient, SpeechClient, TextClient,
    Transcript, TtsClient, VideoClient,
};
use sreel_media::{concat_videos, download_file, mux_audio};
use sreel_models::{AspectRatio, CostAccumulator, DurationPlan, GenerationResult, Segment};
use sreel_session::{Manifest, Session};

use crate::error::{PipelineError, PipelineResult};
use crate::retry::{retry_async, RetryConfig};

/// One run's worth of user choices.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub description: String,
    pub story: String,
    pub plan: DurationPlan,
    pub aspect: AspectRatio,
    pub voice_id: String,
    pub style_suffix: String,
    pub reference_image: Option<String>,
    pub captions: bool,
}

/// What a completed run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub final_video: PathBuf,
    pub manifest_path: PathBuf,
    pub duration: f64,
    pub succeeded: Vec<GenerationResult>,
    pub failed: Vec<GenerationResult>,
    pub cost: CostAccumulator,
}

/// Holds the provider clients for one pipeline run.
pub struct Workflow {
    http: reqwest::Client,
    provider: ProviderConfig,
    text: TextClient,
    image: ImageClient,
    video: VideoClient,
    tts: TtsClient,
    speech: SpeechClient,
}

impl Workflow {
    pub fn new(provider: ProviderConfig) -> Self {
        let http = reqwest::Client::new();
        let queue = QueueClient::new(
            http.clone(),
            provider.queue_base_url.clone(),
            provider.queue_api_key.clone(),
        );
        Self {
            text: TextClient::new(
                http.clone(),
                provider.text_base_url.clone(),
                provider.text_api_key.clone(),
                provider.text_model.clone(),
            ),
            image: ImageClient::new(queue.clone(), provider.image_model.clone()),
            video: VideoClient::new(queue.clone(), provider.video_model.clone()),
            tts: TtsClient::new(queue.clone(), provider.tts_model.clone()),
            speech: SpeechClient::new(queue, provider.stt_model.clone()),
            http,
            provider,
        }
    }

    /// Text client, shared with the interactive story step.
    pub fn text_client(&self) -> &TextClient {
        &self.text
    }

    /// Run the full pipeline in an existing session directory.
    pub async fn run(&self, session: &Session, request: &RunRequest) -> PipelineResult<RunOutcome> {
        let mut cost = CostAccumulator::default();

        // Reference image upload happens once, before the fan-out.
        let reference_url = match &request.reference_image {
            Some(reference) => Some(
                resolve_reference_image(
                    &self.http,
                    &self.provider.queue_base_url,
                    &self.provider.queue_api_key,
                    reference,
                )
                .await?,
            ),
            None => None,
        };

        let prompts = self.scene_prompts(request).await?;
        let segments: Vec<Segment> = prompts
            .iter()
            .enumerate()
            .map(|(i, p)| Segment::new(i, p, DurationPlan::SEGMENT_SECONDS))
            .collect();
        info!(segments = segments.len(), "scene prompts ready");

        let (segment_results, narration) = tokio::join!(
            self.generate_segments(session, request, &segments, reference_url.as_deref()),
            self.generate_narration(session, request),
        );
        let (audio_path, audio_url) = narration?;
        cost.add_narration_chars(request.story.chars().count() as u64);

        let (succeeded, failed) = partition_results(segment_results);
        for result in &failed {
            warn!(
                segment = result.index + 1,
                error = result.error.as_deref().unwrap_or("unknown"),
                "segment failed"
            );
        }
        if succeeded.is_empty() {
            return Err(PipelineError::AllSegmentsFailed(prompts.len()));
        }
        for _ in &succeeded {
            cost.add_image();
            cost.add_video(DurationPlan::SEGMENT_SECONDS);
        }

        let clips: Vec<PathBuf> = succeeded
            .iter()
            .filter_map(|r| r.path.clone())
            .collect();
        let merged = session.merged_video_path();
        concat_videos(&clips, &merged).await?;

        let final_video = session.final_video_path();
        mux_audio(&merged, &audio_path, &final_video).await?;
        let duration = sreel_media::get_duration(&final_video).await?;
        info!(path = %final_video.display(), duration, "final video ready");

        if request.captions {
            self.write_transcript(session, &audio_url).await;
        }

        let manifest = Manifest {
            session_id: session.session_id().to_string(),
            created_at: chrono::Utc::now(),
            description: request.description.clone(),
            story_text: request.story.clone(),
            prompts,
            video_count: succeeded.len(),
            final_video: final_video.clone(),
        };
        session.save_manifest(&manifest)?;

        Ok(RunOutcome {
            final_video,
            manifest_path: session.manifest_path(),
            duration,
            succeeded,
            failed,
            cost,
        })
    }

    async fn scene_prompts(&self, request: &RunRequest) -> PipelineResult<Vec<String>> {
        let config = RetryConfig::new("scene prompts");
        retry_async(&config, || {
            self.text.scene_prompts(
                &request.story,
                request.plan.segment_count,
                &request.style_suffix,
            )
        })
        .await
        .map_err(PipelineError::from)
    }

    /// Fan out all segments and collect owned results in index order.
    ///
    /// Always returns one result per input segment, success or not.
    pub async fn generate_segments(
        &self,
        session: &Session,
        request: &RunRequest,
        segments: &[Segment],
        reference_url: Option<&str>,
    ) -> Vec<GenerationResult> {
        let futures: Vec<_> = segments
            .iter()
            .map(|segment| {
                let index = segment.index;
                let prompt = segment.prompt.clone();
                async move {
                    match self
                        .generate_one_segment(session, request, index, &prompt, reference_url)
                        .await
                    {
                        Ok(path) => GenerationResult::ok(index, path, prompt),
                        Err(e) => GenerationResult::failed(index, e.to_string(), prompt),
                    }
                }
            })
            .collect();

        let mut results = join_all(futures).await;
        results.sort_by_key(|r| r.index);
        results
    }

    async fn generate_one_segment(
        &self,
        session: &Session,
        request: &RunRequest,
        index: usize,
        prompt: &str,
        reference_url: Option<&str>,
    ) -> PipelineResult<PathBuf> {
        let config = RetryConfig::new(format!("segment {}", index + 1))
            .with_base_delay(Duration::from_millis(3000));

        retry_async(&config, || async {
            let image_url = self
                .image
                .generate(prompt, &request.style_suffix, request.aspect, reference_url)
                .await?;
            download_file(&self.http, &image_url, &session.image_path(index + 1)).await?;

            let video_url = self
                .video
                .generate(
                    prompt,
                    &image_url,
                    DurationPlan::segment_duration_str(),
                    request.aspect,
                )
                .await?;
            let clip = session.video_path(index + 1);
            download_file(&self.http, &video_url, &clip).await?;
            Ok::<_, PipelineError>(clip)
        })
        .await
    }

    async fn generate_narration(
        &self,
        session: &Session,
        request: &RunRequest,
    ) -> PipelineResult<(PathBuf, String)> {
        let config =
            RetryConfig::new("narration").with_base_delay(Duration::from_millis(3000));

        let audio_url = retry_async(&config, || {
            self.tts.synthesize(&request.story, &request.voice_id)
        })
        .await
        .map_err(|e| PipelineError::NarrationFailed(e.to_string()))?;

        let path = session.audio_path();
        download_file(&self.http, &audio_url, &path)
            .await
            .map_err(|e| PipelineError::NarrationFailed(e.to_string()))?;
        Ok((path, audio_url))
    }

    /// Best-effort transcription for caption data. Failures are logged,
    /// never fatal.
    async fn write_transcript(&self, session: &Session, audio_url: &str) {
        match self.speech.transcribe(audio_url).await {
            Ok(transcript) => {
                if let Err(e) = save_transcript(session, &transcript) {
                    warn!("failed to write transcript: {}", e);
                }
            }
            Err(e) => warn!("transcription failed: {}", e),
        }
    }
}

fn save_transcript(session: &Session, transcript: &Transcript) -> std::io::Result<()> {
    let value = serde_json::json!({
        "text": transcript.text,
        "segments": transcript
            .segments
            .iter()
            .map(|s| serde_json::json!({
                "text": s.text,
                "start": s.start,
                "end": s.end,
            }))
            .collect::<Vec<_>>(),
    });
    let path = session.final_video_path().with_file_name("transcript.json");
    std::fs::write(path, serde_json::to_string_pretty(&value)?)
}

/// Split joined results into successes and failures, both in index order.
pub fn partition_results(
    results: Vec<GenerationResult>,
) -> (Vec<GenerationResult>, Vec<GenerationResult>) {
    results.into_iter().partition(|r| r.success)
}
