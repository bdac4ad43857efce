//! WebSocket transport backed by tokio-tungstenite

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

use super::{BatcherConnection, Frame};
use crate::error::{BatcherClientError, Result};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A live WebSocket link to one batcher endpoint.
///
/// Control frames are absorbed here: pings are answered by the protocol
/// stack, pongs are dropped, and a close frame marks the link closed and
/// surfaces as end-of-stream.
#[derive(Debug)]
pub struct WsConnection {
    sink: SplitSink<WsStream, Message>,
    stream: SplitStream<WsStream>,
    open: bool,
}

impl WsConnection {
    /// Dials `url` (ws:// or wss://) and returns the established link.
    ///
    /// No protocol traffic has happened yet; the version handshake is the
    /// session's job.
    pub async fn connect(url: &str) -> Result<Self> {
        debug!(url, "dialing batcher");
        let (ws, _response) = connect_async(url).await.map_err(|e| {
            BatcherClientError::Connection(format!("failed to connect to {url}: {e}"))
        })?;
        let (sink, stream) = ws.split();
        Ok(Self {
            sink,
            stream,
            open: true,
        })
    }
}

#[async_trait::async_trait]
impl BatcherConnection for WsConnection {
    async fn send(&mut self, payload: Vec<u8>) -> Result<()> {
        if !self.open {
            return Err(BatcherClientError::ConnectionNotReady);
        }
        match self.sink.send(Message::Binary(payload.into())).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.open = false;
                Err(BatcherClientError::Connection(format!("send failed: {e}")))
            }
        }
    }

    async fn next_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            match self.stream.next().await {
                None => {
                    self.open = false;
                    return Ok(None);
                }
                Some(Err(e)) => {
                    self.open = false;
                    return Err(BatcherClientError::Connection(format!(
                        "receive failed: {e}"
                    )));
                }
                Some(Ok(Message::Binary(payload))) => {
                    return Ok(Some(Frame::Binary(payload.to_vec())));
                }
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(Frame::Text(text.as_str().to_owned())));
                }
                Some(Ok(Message::Close(_))) => {
                    self.open = false;
                    return Ok(None);
                }
                // Ping and pong are handled by the protocol stack.
                Some(Ok(_)) => continue,
            }
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }

    async fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        if let Err(e) = self.sink.close().await {
            debug!(error = %e, "websocket close failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    use super::*;

    async fn spawn_server<F, Fut>(handler: F) -> String
    where
        F: FnOnce(WebSocketStream<TcpStream>) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ()> + Send,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let ws = accept_async(stream).await.unwrap();
            handler(ws).await;
        });
        format!("ws://{addr}")
    }

    #[tokio::test]
    async fn test_frames_normalize_and_close_yields_none() {
        let url = spawn_server(|mut ws| async move {
            ws.send(Message::Binary(vec![0, 7].into())).await.unwrap();
            ws.send(Message::Text("hello".into())).await.unwrap();
            ws.close(None).await.unwrap();
        })
        .await;

        let mut conn = WsConnection::connect(&url).await.unwrap();
        assert!(conn.is_open());
        assert_eq!(
            conn.next_frame().await.unwrap(),
            Some(Frame::Binary(vec![0, 7]))
        );
        assert_eq!(
            conn.next_frame().await.unwrap(),
            Some(Frame::Text("hello".to_string()))
        );
        assert_eq!(conn.next_frame().await.unwrap(), None);
        assert!(!conn.is_open());
    }

    #[tokio::test]
    async fn test_send_after_close_is_not_ready() {
        let url = spawn_server(|mut ws| async move {
            while let Some(Ok(_)) = ws.next().await {}
        })
        .await;

        let mut conn = WsConnection::connect(&url).await.unwrap();
        conn.send(vec![1, 2, 3]).await.unwrap();
        conn.close().await;
        conn.close().await; // idempotent

        let err = conn.send(vec![4]).await.unwrap_err();
        assert!(matches!(err, BatcherClientError::ConnectionNotReady));
    }

    #[tokio::test]
    async fn test_connect_refused_is_a_connection_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = WsConnection::connect(&format!("ws://{addr}")).await.unwrap_err();
        assert!(matches!(err, BatcherClientError::Connection(_)));
        assert!(err.is_transient());
    }
}
