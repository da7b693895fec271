//! Alloy transport layer that logs every RPC call passing through it
//! together with the label of the component that issued it and the time the
//! node took to answer.
use {
    alloy::{
        rpc::json_rpc::{RequestPacket, ResponsePacket},
        transports::TransportError,
    },
    std::{
        fmt::Debug,
        pin::Pin,
        task::{Context, Poll},
        time::Instant,
    },
    tower::{Layer, Service},
};

pub struct InstrumentationLayer {
    label: String,
}

impl InstrumentationLayer {
    pub fn new(label: impl ToString) -> Self {
        Self {
            label: label.to_string(),
        }
    }
}

impl<S> Layer<S> for InstrumentationLayer {
    type Service = InstrumentedProvider<S>;

    fn layer(&self, inner: S) -> Self::Service {
        InstrumentedProvider {
            inner,
            label: self.label.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InstrumentedProvider<S> {
    inner: S,
    label: String,
}

impl<S> Service<RequestPacket> for InstrumentedProvider<S>
where
    S: Service<RequestPacket, Response = ResponsePacket, Error = TransportError>,
    S::Future: Send + 'static,
    S::Response: Send + 'static + Debug,
    S::Error: Send + 'static + Debug,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: RequestPacket) -> Self::Future {
        let methods: Vec<String> = req
            .requests_mut()
            .iter_mut()
            .map(|r| {
                tracing::trace!(component = %self.label, ?r, "executing request");
                r.method().to_owned()
            })
            .collect();
        if methods.len() > 1 {
            tracing::trace!(len = methods.len(), "executing batch request");
        }

        let label = self.label.clone();
        let start = Instant::now();
        let fut = self.inner.call(req);
        Box::pin(async move {
            let res = fut.await;
            match &res {
                Ok(_) => tracing::debug!(
                    component = %label,
                    ?methods,
                    elapsed = ?start.elapsed(),
                    "rpc request completed"
                ),
                Err(err) => tracing::debug!(
                    component = %label,
                    ?methods,
                    ?err,
                    "rpc request failed"
                ),
            }
            res
        })
    }
}
