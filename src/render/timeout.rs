use std::{sync::Arc, sync::mpsc, time::Duration};

use crate::{
    render::adapter::{RasterImage, RenderAdapter, RenderError},
    source::SourceItem,
};

/// Bounds the time spent on a single source.
///
/// Each call runs the inner adapter on a helper thread. When the deadline passes the item fails
/// with [`RenderError::Timeout`]; the helper keeps running until the inner render returns and its
/// result is dropped.
pub struct TimeoutRenderer<R> {
    inner: Arc<R>,
    timeout: Duration,
}

impl<R> TimeoutRenderer<R> {
    pub fn new(inner: R, timeout: Duration) -> Self {
        Self::from_shared(Arc::new(inner), timeout)
    }

    pub fn from_shared(inner: Arc<R>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

impl<R: RenderAdapter + 'static> RenderAdapter for TimeoutRenderer<R> {
    fn render(
        &self,
        source: &SourceItem,
        width: u32,
        height: u32,
    ) -> Result<RasterImage, RenderError> {
        let (tx, rx) = mpsc::sync_channel(1);
        let inner = Arc::clone(&self.inner);
        let source = source.clone();

        std::thread::Builder::new()
            .name("svgsheet-render".to_string())
            .spawn(move || {
                let _ = tx.send(inner.render(&source, width, height));
            })
            .map_err(|_| RenderError::Allocation { width, height })?;

        match rx.recv_timeout(self.timeout) {
            Ok(res) => res,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(RenderError::Timeout {
                millis: self.timeout.as_millis(),
            }),
            // The sender only disappears without sending if the inner render panicked.
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(RenderError::Panicked),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/timeout.rs"]
mod tests;
