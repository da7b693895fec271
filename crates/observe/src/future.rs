use {
    futures::future::FusedFuture,
    pin_project_lite::pin_project,
    std::{
        future::Future,
        pin::Pin,
        task::{Context, Poll},
        time::Instant,
    },
};

/// Logs how long a future took from its first poll until it resolved.
pub trait Measure: Sized {
    fn measure(self, label: &str) -> Measurable<Self> {
        Measurable {
            inner: self,
            label: label.to_owned(),
            state: State::NeverPolled,
        }
    }
}

impl<T: Sized> Measure for T {}

pin_project! {
    #[derive(Debug)]
    #[must_use = "futures do nothing unless you `.await` or poll them"]
    pub struct Measurable<T> {
        #[pin]
        inner: T,
        label: String,
        state: State,
    }
}

#[derive(Debug)]
enum State {
    NeverPolled,
    Running(Instant),
    Done,
}

impl<T: Future> Future for Measurable<T> {
    type Output = T::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        if matches!(this.state, State::NeverPolled) {
            *this.state = State::Running(Instant::now());
        }
        let result = this.inner.poll(cx);
        if result.is_ready() {
            if let State::Running(start) = this.state {
                tracing::debug!(label = %this.label, elapsed = ?start.elapsed(), "future resolved");
            }
            *this.state = State::Done;
        }
        result
    }
}

impl<T: FusedFuture> FusedFuture for Measurable<T> {
    fn is_terminated(&self) -> bool {
        matches!(self.state, State::Done)
    }
}
