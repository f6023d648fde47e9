use crate::error::AppError;
use crate::pipeline::domain::{convert, nearest, Palette};
use crate::pipeline::types::{ClassificationResult, SampledPixel};
use futures::future::BoxFuture;
use std::{
    sync::Arc,
    task::{Context, Poll},
};
use tower::Service;

/// Converts a sampled pixel to L*a*b* and names it against the palette.
#[derive(Debug, Clone)]
pub struct ClassificationService {
    palette: Arc<Palette>,
}

impl ClassificationService {
    pub fn new(palette: Arc<Palette>) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn classify(&self, pixel: SampledPixel) -> ClassificationResult {
        let lab = convert(pixel.rgb);
        let found = nearest(&lab, &self.palette);
        tracing::debug!(
            "Classified {:?} as {} (distance {:.3})",
            pixel.rgb.to_rgb8(),
            found.entry.name(),
            found.distance
        );

        let result = ClassificationResult::new(found.entry.name(), pixel.rgb, found.distance);
        match pixel.frame_id {
            Some(frame_id) => result.with_frame_id(frame_id),
            None => result,
        }
    }
}

impl Service<SampledPixel> for ClassificationService {
    type Response = ClassificationResult;
    type Error = AppError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), AppError>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, pixel: SampledPixel) -> Self::Future {
        let result = self.classify(pixel);
        Box::pin(async move { Ok(result) })
    }
}
