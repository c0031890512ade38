// SPDX-License-Identifier: GPL-3.0-only

//! Capture screen flows against mock providers

use futures::StreamExt;
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use snapcam::app::effects::{self, Providers};
use snapcam::app::{Action, CaptureScreen, Effect, Notice, ScreenState};
use snapcam::backends::camera::{
    CameraDevice, CameraFrame, CameraProvider, LensFacing, PermissionStatus,
};
use snapcam::backends::media_library::MediaLibraryProvider;
use snapcam::errors::{CameraError, CaptureError, PersistError};
use snapcam::flash::FlashMode;
use snapcam::storage::ImageUri;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

struct MockCamera {
    permission: Mutex<Vec<PermissionStatus>>,
    capture_result: Result<ImageUri, CaptureError>,
    permission_calls: AtomicUsize,
    captures: Mutex<Vec<(LensFacing, FlashMode)>>,
}

impl MockCamera {
    /// Answers permission requests with `answers` in order, then `Granted`
    fn new(answers: Vec<PermissionStatus>, capture_result: Result<ImageUri, CaptureError>) -> Self {
        let mut answers = answers;
        answers.reverse();
        Self {
            permission: Mutex::new(answers),
            capture_result,
            permission_calls: AtomicUsize::new(0),
            captures: Mutex::new(Vec::new()),
        }
    }
}

impl CameraProvider for MockCamera {
    fn request_permission(&self) -> BoxFuture<'static, PermissionStatus> {
        self.permission_calls.fetch_add(1, Ordering::SeqCst);
        let status = self
            .permission
            .lock()
            .unwrap()
            .pop()
            .unwrap_or(PermissionStatus::Granted);
        Box::pin(async move { status })
    }

    fn capture(
        &self,
        lens: LensFacing,
        flash: FlashMode,
    ) -> BoxFuture<'static, Result<ImageUri, CaptureError>> {
        self.captures.lock().unwrap().push((lens, flash));
        let result = self.capture_result.clone();
        Box::pin(async move { result })
    }

    fn preview(&self, _lens: LensFacing) -> BoxStream<'static, Arc<CameraFrame>> {
        futures::stream::empty().boxed()
    }

    fn list_cameras(&self) -> Vec<CameraDevice> {
        Vec::new()
    }
}

struct MockLibrary {
    persist_result: Result<PathBuf, PersistError>,
    permission_calls: Arc<AtomicUsize>,
    persisted: Mutex<Vec<ImageUri>>,
}

impl MockLibrary {
    fn new(persist_result: Result<PathBuf, PersistError>) -> Self {
        Self {
            persist_result,
            permission_calls: Arc::new(AtomicUsize::new(0)),
            persisted: Mutex::new(Vec::new()),
        }
    }
}

impl MediaLibraryProvider for MockLibrary {
    fn request_permission(&self) -> BoxFuture<'static, PermissionStatus> {
        let calls = Arc::clone(&self.permission_calls);
        Box::pin(async move {
            calls.fetch_add(1, Ordering::SeqCst);
            PermissionStatus::Denied
        })
    }

    fn persist(&self, uri: &ImageUri) -> BoxFuture<'static, Result<PathBuf, PersistError>> {
        self.persisted.lock().unwrap().push(uri.clone());
        let result = self.persist_result.clone();
        Box::pin(async move { result })
    }
}

fn captured() -> ImageUri {
    ImageUri::new("file:///tmp/snapcam/captures/capture_a.jpg")
}

fn saved() -> PathBuf {
    PathBuf::from("/home/user/Pictures/snapcam/IMG_20250101_120000.jpg")
}

struct Harness {
    screen: CaptureScreen,
    camera: Arc<MockCamera>,
    library: Arc<MockLibrary>,
    providers: Providers,
}

impl Harness {
    fn new(camera: MockCamera, library: MockLibrary) -> Self {
        let camera = Arc::new(camera);
        let library = Arc::new(library);
        let providers = Providers::new(camera.clone(), library.clone());
        Self {
            screen: CaptureScreen::new(),
            camera,
            library,
            providers,
        }
    }

    fn granted() -> Self {
        Self::new(
            MockCamera::new(vec![], Ok(captured())),
            MockLibrary::new(Ok(saved())),
        )
    }

    async fn run(&mut self, effect: Option<Effect>) {
        if let Some(effect) = effect {
            let outcome = effects::run(effect, self.providers.clone()).await;
            self.screen.complete(outcome);
        }
    }

    async fn mount(&mut self) {
        let effect = self.screen.mount();
        self.run(effect).await;
    }

    async fn act(&mut self, action: Action) {
        let effect = self.screen.dispatch(action);
        self.run(effect).await;
    }
}

#[tokio::test]
async fn test_mount_granted_shows_live_preview() {
    let mut h = Harness::granted();
    h.mount().await;

    assert!(h.screen.permission_granted());
    assert!(h.screen.shows_live_preview());
    assert_eq!(h.screen.captured_image(), None);
    assert_eq!(h.camera.permission_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_library_denial_does_not_block_camera() {
    let mut h = Harness::granted();
    h.mount().await;
    // The library request runs detached; give it a chance to finish
    tokio::task::yield_now().await;
    for _ in 0..10 {
        if h.library.permission_calls.load(Ordering::SeqCst) > 0 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    assert_eq!(h.library.permission_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.screen.state(), &ScreenState::LivePreview);
}

#[tokio::test]
async fn test_denied_then_retry() {
    let mut h = Harness::new(
        MockCamera::new(vec![PermissionStatus::Denied], Ok(captured())),
        MockLibrary::new(Ok(saved())),
    );
    h.mount().await;
    assert!(!h.screen.permission_granted());
    assert!(!h.screen.shows_live_preview());
    assert!(h.screen.is_available(Action::RequestPermission));

    h.act(Action::RequestPermission).await;
    assert!(h.screen.permission_granted());
    assert_eq!(h.camera.permission_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_repeated_denials_keep_retry_available() {
    let mut h = Harness::new(
        MockCamera::new(
            vec![PermissionStatus::Denied; 5],
            Ok(captured()),
        ),
        MockLibrary::new(Ok(saved())),
    );
    h.mount().await;
    for _ in 0..4 {
        assert!(h.screen.is_available(Action::RequestPermission));
        h.act(Action::RequestPermission).await;
    }
    assert!(!h.screen.permission_granted());
    assert_eq!(h.camera.permission_calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_capture_uses_current_lens_and_flash() {
    let mut h = Harness::granted();
    h.mount().await;
    h.act(Action::ToggleLensFacing).await;
    h.act(Action::ToggleFlash).await;
    h.act(Action::Capture).await;

    assert_eq!(
        *h.camera.captures.lock().unwrap(),
        vec![(LensFacing::Front, FlashMode::On)]
    );
    assert_eq!(h.screen.captured_image(), Some(&captured()));
    assert!(!h.screen.shows_live_preview());
}

#[tokio::test]
async fn test_capture_failure_returns_to_live_preview() {
    let mut h = Harness::new(
        MockCamera::new(
            vec![],
            Err(CaptureError::Camera(CameraError::LensUnavailable(
                LensFacing::Front,
            ))),
        ),
        MockLibrary::new(Ok(saved())),
    );
    h.mount().await;
    h.act(Action::ToggleLensFacing).await;
    h.act(Action::Capture).await;

    assert_eq!(h.screen.state(), &ScreenState::LivePreview);
    assert_eq!(h.screen.captured_image(), None);
    assert_eq!(h.screen.notice(), Some(&Notice::CaptureFailed));
}

#[tokio::test]
async fn test_retake_makes_no_provider_call() {
    let mut h = Harness::granted();
    h.mount().await;
    h.act(Action::Capture).await;
    h.act(Action::Retake).await;

    assert_eq!(h.screen.captured_image(), None);
    assert!(h.screen.shows_live_preview());
    assert!(h.library.persisted.lock().unwrap().is_empty());
    assert_eq!(h.camera.captures.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_save_persists_captured_uri() {
    let mut h = Harness::granted();
    h.mount().await;
    h.act(Action::Capture).await;
    h.act(Action::Save).await;

    assert_eq!(*h.library.persisted.lock().unwrap(), vec![captured()]);
    assert_eq!(h.screen.captured_image(), None);
    assert_eq!(h.screen.notice(), Some(&Notice::Saved(saved())));
    assert!(h.screen.shows_live_preview());
}

#[tokio::test]
async fn test_save_failure_keeps_image_for_retry() {
    let mut h = Harness::new(
        MockCamera::new(vec![], Ok(captured())),
        MockLibrary::new(Err(PersistError::PermissionDenied("read-only".into()))),
    );
    h.mount().await;
    h.act(Action::Capture).await;
    h.act(Action::Save).await;

    assert_eq!(h.screen.captured_image(), Some(&captured()));
    assert_eq!(h.screen.notice(), Some(&Notice::SaveFailed));

    h.act(Action::Save).await;
    assert_eq!(h.library.persisted.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_in_flight_duplicates_are_ignored() {
    let mut h = Harness::granted();
    h.mount().await;

    let first = h.screen.dispatch(Action::Capture);
    assert!(first.is_some());
    assert_eq!(h.screen.dispatch(Action::Capture), None);
    h.run(first).await;

    let first = h.screen.dispatch(Action::Save);
    assert!(first.is_some());
    assert_eq!(h.screen.dispatch(Action::Save), None);
    h.run(first).await;

    assert_eq!(h.camera.captures.lock().unwrap().len(), 1);
    assert_eq!(h.library.persisted.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_toggles_ignored_while_reviewing() {
    let mut h = Harness::granted();
    h.mount().await;
    h.act(Action::Capture).await;
    h.act(Action::ToggleLensFacing).await;
    h.act(Action::ToggleFlash).await;

    assert_eq!(h.screen.lens_facing(), LensFacing::Back);
    assert_eq!(h.screen.flash_mode(), FlashMode::Off);
}
