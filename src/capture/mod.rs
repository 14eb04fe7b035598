use base64::{engine::general_purpose, Engine};
use image::codecs::jpeg::JpegEncoder;
use image::RgbaImage;
use std::sync::Arc;

/// JPEG quality for captured frames (the web app used canvas quality 0.8).
const CAPTURE_JPEG_QUALITY: u8 = 80;

#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error("Could not access camera. Please allow permissions.")]
    PermissionDenied,

    #[error("Camera device error: {0}")]
    Device(String),
}

/// Capture mode lifecycle. `Captured` is transient: `capture()` passes through
/// it and lands back on `Idle` before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Requesting,
    Live,
    Captured,
}

/// Trait for camera devices (platform backends, mocks, etc.)
#[async_trait::async_trait]
pub trait CameraBackend: Send + Sync {
    /// Acquire the camera. A failed open must leave no stream behind.
    async fn open(&self) -> Result<Box<dyn CameraStream>, CameraError>;
}

/// A live camera stream. Exclusively owned by the capture session that opened
/// it; `stop` releases the device and is called exactly once.
pub trait CameraStream: Send {
    /// Native resolution of the stream; captures are taken at this size.
    fn resolution(&self) -> (u32, u32);

    /// Snapshot of the current video frame.
    fn read_frame(&mut self) -> Result<RgbaImage, CameraError>;

    fn supports_torch(&self) -> bool;

    fn set_torch(&mut self, on: bool) -> Result<(), CameraError>;

    fn stop(&mut self);
}

/// Single-shot capture session. Owns the camera stream while in `Live` and
/// guarantees it is released on every exit path: capture, cancel, open
/// failure, or drop. No frame queuing, one captured frame per session start.
pub struct CaptureSession {
    backend: Arc<dyn CameraBackend>,
    stream: Option<Box<dyn CameraStream>>,
    state: CaptureState,
    torch_on: bool,
}

impl CaptureSession {
    pub fn new(backend: Arc<dyn CameraBackend>) -> Self {
        Self {
            backend,
            stream: None,
            state: CaptureState::Idle,
            torch_on: false,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn torch_on(&self) -> bool {
        self.torch_on
    }

    /// Idle → Requesting → Live. Permission denial or device error drops the
    /// session back to Idle; the error is surfaced once, no automatic retry.
    pub async fn start(&mut self) -> Result<(), CameraError> {
        if self.state != CaptureState::Idle {
            return Err(CameraError::Device(format!(
                "camera already in use (state {:?})",
                self.state
            )));
        }

        self.state = CaptureState::Requesting;
        log::info!("📷 Requesting camera stream...");

        match self.backend.open().await {
            Ok(stream) => {
                let (w, h) = stream.resolution();
                log::info!("📷 Camera live at {}x{}", w, h);
                self.stream = Some(stream);
                self.state = CaptureState::Live;
                Ok(())
            }
            Err(e) => {
                log::error!("❌ Camera error: {}", e);
                self.state = CaptureState::Idle;
                Err(e)
            }
        }
    }

    /// Attempted only when the active stream reports the capability.
    /// Unsupported devices are a silent no-op: flash state stays unchanged.
    /// Returns the resulting flash state.
    pub fn toggle_torch(&mut self) -> bool {
        let Some(stream) = self.stream.as_mut() else {
            return self.torch_on;
        };

        if !stream.supports_torch() {
            log::debug!("🔦 Torch not supported by this camera, ignoring toggle");
            return self.torch_on;
        }

        let target = !self.torch_on;
        match stream.set_torch(target) {
            Ok(()) => {
                self.torch_on = target;
                log::debug!("🔦 Torch {}", if target { "on" } else { "off" });
            }
            Err(e) => log::warn!("⚠️ Torch toggle failed: {}", e),
        }

        self.torch_on
    }

    /// Snapshot the current frame at native resolution, encode it as JPEG,
    /// and return the base64 payload. The stream is torn down before this
    /// returns, whether the capture succeeded or not.
    pub fn capture(&mut self) -> Result<String, CameraError> {
        let mut stream = self.stream.take().ok_or_else(|| {
            CameraError::Device("capture requested without an active camera stream".to_string())
        })?;

        self.state = CaptureState::Captured;
        let frame = stream.read_frame();

        // Stream must not outlive the capture: battery drain, indicator light.
        stream.stop();
        self.torch_on = false;
        self.state = CaptureState::Idle;

        let frame = frame?;
        log::info!("📸 Captured frame {}x{}", frame.width(), frame.height());
        encode_jpeg_base64(&frame)
    }

    /// User cancel or component teardown. Safe to call in any state.
    pub fn cancel(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            log::info!("📷 Releasing camera stream");
            stream.stop();
        }
        self.torch_on = false;
        self.state = CaptureState::Idle;
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn encode_jpeg_base64(frame: &RgbaImage) -> Result<String, CameraError> {
    // JPEG has no alpha channel.
    let rgb = image::DynamicImage::ImageRgba8(frame.clone()).to_rgb8();

    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, CAPTURE_JPEG_QUALITY)
        .encode(rgb.as_raw(), rgb.width(), rgb.height(), image::ColorType::Rgb8)
        .map_err(|e| CameraError::Device(format!("JPEG encode failed: {}", e)))?;

    log::debug!("📊 Encoded frame: {} bytes JPEG", buf.len());
    Ok(general_purpose::STANDARD.encode(&buf))
}
