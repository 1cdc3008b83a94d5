use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

use crate::codec::StreamCodec;
use crate::error::StreamError;
use crate::frame::StreamEvent;
use crate::framer::FramerConfig;
use crate::message::RemoteCommand;
use crate::params::ReceiverParameters;
use crate::session::Session;

const CONTROL_CHANNEL_CAPACITY: usize = 32;

/// Sending half of the event channel.
pub type EventSender = mpsc::UnboundedSender<StreamEvent>;
/// Receiving half handed to the frame consumer.
pub type EventReceiver = mpsc::UnboundedReceiver<StreamEvent>;

/// Settings that do not change between connections.
#[derive(Debug, Clone, Copy)]
pub struct ReceiverConfig {
    pub connect_timeout: Duration,
    pub framer: FramerConfig,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            framer: FramerConfig::default(),
        }
    }
}

/// Requests from the receiver handle to its connection task.
#[derive(Debug)]
enum Control {
    Remote(RemoteCommand),
    SetUseHeaders(bool),
    UpdateParams(ReceiverParameters),
    Disconnect,
}

/// A live connection: the task owning the socket and its control channel.
#[derive(Debug)]
struct Link {
    control: mpsc::Sender<Control>,
    task: JoinHandle<()>,
}

/// Receives frames from a streaming server.
///
/// One background task owns the socket and the framing session. Events
/// go out on an unbounded channel: a slow consumer makes frames pile up
/// there, the receiver never waits for it.
#[derive(Debug)]
pub struct DataReceiver {
    params: ReceiverParameters,
    config: ReceiverConfig,
    events: EventSender,
    link: Option<Link>,
}

impl DataReceiver {
    pub fn new(params: ReceiverParameters) -> (Self, EventReceiver) {
        Self::with_config(params, ReceiverConfig::default())
    }

    pub fn with_config(params: ReceiverParameters, config: ReceiverConfig) -> (Self, EventReceiver) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let receiver = Self {
            params,
            config,
            events,
            link: None,
        };
        (receiver, events_rx)
    }

    /// Parameters used by the next connection (and, in header mode, the
    /// starting point before the first header arrives).
    pub fn params(&self) -> &ReceiverParameters {
        &self.params
    }

    pub fn is_connected(&self) -> bool {
        self.link.as_ref().is_some_and(|link| !link.task.is_finished())
    }

    /// Replace the parameters. A live connection restarts framing with
    /// a fresh session.
    pub async fn update_params(&mut self, params: ReceiverParameters) -> Result<(), StreamError> {
        self.params = params.clone();
        if self.is_connected() {
            self.control(Control::UpdateParams(params)).await?;
        }
        Ok(())
    }

    pub async fn update_params_and_connect(
        &mut self,
        params: ReceiverParameters,
    ) -> Result<(), StreamError> {
        self.update_params(params).await?;
        self.connect().await
    }

    /// Switch between header-delimited and raw framing.
    pub async fn set_use_headers(&mut self, use_headers: bool) -> Result<(), StreamError> {
        self.params.use_headers = use_headers;
        if self.is_connected() {
            self.control(Control::SetUseHeaders(use_headers)).await?;
        }
        Ok(())
    }

    /// Open the TCP connection and start receiving.
    pub async fn connect(&mut self) -> Result<(), StreamError> {
        if self.is_connected() {
            return Err(StreamError::AlreadyConnected);
        }
        if !self.params.use_headers {
            self.params.validate()?;
        }

        let addr = self.params.address();
        let timeout = self.config.connect_timeout;
        info!(%addr, use_headers = self.params.use_headers, "connecting");

        let stream = tokio::time::timeout(timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| StreamError::Timeout(timeout))??;
        stream.set_nodelay(true)?;

        let session = Session::new(self.params.clone(), self.config.framer);
        let framed = Framed::new(stream, StreamCodec::new(session));
        let (control, control_rx) = mpsc::channel(CONTROL_CHANNEL_CAPACITY);

        info!(%addr, "connected");
        let _ = self.events.send(StreamEvent::ConnectionStateChanged(true));
        let task = tokio::spawn(run_connection(framed, control_rx, self.events.clone()));
        self.link = Some(Link { control, task });
        Ok(())
    }

    /// Close the connection. Does nothing when not connected.
    pub async fn disconnect(&mut self) -> Result<(), StreamError> {
        let Some(link) = self.link.take() else {
            return Ok(());
        };
        // The task may already have stopped on its own.
        let _ = link.control.send(Control::Disconnect).await;
        link.task
            .await
            .map_err(|e| StreamError::Other(format!("connection task failed: {e}")))
    }

    /// Ask the server to start streaming.
    pub async fn remote_start(&self) -> Result<(), StreamError> {
        self.send_command(RemoteCommand::Start).await
    }

    /// Ask the server to stop streaming.
    pub async fn remote_stop(&self) -> Result<(), StreamError> {
        self.send_command(RemoteCommand::Stop).await
    }

    pub async fn send_command(&self, command: RemoteCommand) -> Result<(), StreamError> {
        self.control(Control::Remote(command)).await
    }

    async fn control(&self, message: Control) -> Result<(), StreamError> {
        match &self.link {
            Some(link) if !link.task.is_finished() => Ok(link.control.send(message).await?),
            _ => Err(StreamError::NotConnected),
        }
    }
}

/// Connection task: reads events from the socket and serves control
/// requests until disconnected, then reports the connection as down.
async fn run_connection(
    mut framed: Framed<TcpStream, StreamCodec>,
    mut control: mpsc::Receiver<Control>,
    events: EventSender,
) {
    loop {
        tokio::select! {
            item = framed.next() => match item {
                Some(Ok(event)) => {
                    if events.send(event).is_err() {
                        debug!("event receiver dropped; closing connection");
                        break;
                    }
                }
                Some(Err(e)) => {
                    warn!("network read error: {e}");
                    break;
                }
                None => {
                    info!("server closed the connection");
                    break;
                }
            },
            message = control.recv() => match message {
                Some(Control::Remote(command)) => {
                    debug!(%command, "sending remote command");
                    if let Err(e) = framed.send(command).await {
                        warn!("network write error: {e}");
                        break;
                    }
                }
                Some(Control::SetUseHeaders(use_headers)) => {
                    info!(use_headers, "switching framing mode");
                    framed.read_buffer_mut().clear();
                    let session = framed.codec_mut().session_mut();
                    session.set_use_headers(use_headers);
                    if !use_headers && session.buffer_byte_size() == 0 {
                        warn!("raw mode without frame geometry; no frames until parameters are updated");
                    }
                }
                Some(Control::UpdateParams(params)) => {
                    framed.read_buffer_mut().clear();
                    framed.codec_mut().session_mut().update_params(params);
                }
                Some(Control::Disconnect) | None => break,
            },
        }
    }

    info!("disconnected");
    let _ = events.send(StreamEvent::ConnectionStateChanged(false));
}
