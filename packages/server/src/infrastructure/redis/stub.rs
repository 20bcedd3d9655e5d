//! Minimal RESP2 server for exercising the Redis adapters without Redis.
//!
//! Understands the connection handshake, `INCR`, `SUBSCRIBE` and `PUBLISH`
//! fan-out triggered from the test. Everything else is answered with `+OK`.

use std::{
    collections::{HashMap, HashSet},
    net::SocketAddr,
    sync::Arc,
};

use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
    sync::{mpsc, Mutex},
    task::{JoinHandle, JoinSet},
};

type Outbound = mpsc::UnboundedSender<Vec<u8>>;

#[derive(Default)]
struct StubState {
    counters: HashMap<String, i64>,
    subscribers: Vec<(HashSet<String>, Outbound)>,
}

pub(crate) struct StubRedis {
    addr: SocketAddr,
    state: Arc<Mutex<StubState>>,
    server: JoinHandle<()>,
}

impl StubRedis {
    pub(crate) async fn start() -> Self {
        Self::start_on("127.0.0.1:0".parse().unwrap()).await
    }

    /// Listen on a fixed address, e.g. to come back after [`StubRedis::stop`].
    pub(crate) async fn start_on(addr: SocketAddr) -> Self {
        let listener = TcpListener::bind(addr).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(StubState::default()));

        let accept_state = state.clone();
        let server = tokio::spawn(async move {
            // Dropping the set on abort closes every open connection.
            let mut connections = JoinSet::new();
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                serve_connection(stream, accept_state.clone(), &mut connections);
            }
        });

        Self {
            addr,
            state,
            server,
        }
    }

    pub(crate) fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub(crate) fn url(&self) -> String {
        format!("redis://{}", self.addr)
    }

    /// Shut the listener and every connection, as if Redis went down.
    pub(crate) async fn stop(self) {
        self.server.abort();
        let _ = self.server.await;
    }

    /// Channels some connection currently subscribes to.
    pub(crate) async fn subscribed_channels(&self) -> HashSet<String> {
        let state = self.state.lock().await;
        state
            .subscribers
            .iter()
            .filter(|(_, outbound)| !outbound.is_closed())
            .flat_map(|(channels, _)| channels.iter().cloned())
            .collect()
    }

    /// Push a message to every connection subscribed to `channel`.
    pub(crate) async fn publish(&self, channel: &str, payload: &str) -> usize {
        let state = self.state.lock().await;
        let frame = array(&["message", channel, payload]);
        state
            .subscribers
            .iter()
            .filter(|(channels, _)| channels.contains(channel))
            .filter(|(_, outbound)| outbound.send(frame.clone()).is_ok())
            .count()
    }
}

fn serve_connection(stream: TcpStream, state: Arc<Mutex<StubState>>, set: &mut JoinSet<()>) {
    let (read, mut write) = stream.into_split();
    let (outbound, mut frames) = mpsc::unbounded_channel::<Vec<u8>>();

    set.spawn(async move {
        while let Some(frame) = frames.recv().await {
            if write.write_all(&frame).await.is_err() {
                break;
            }
        }
    });

    set.spawn(async move {
        let mut reader = BufReader::new(read);
        let mut subscription: Option<usize> = None;
        while let Some(command) = read_command(&mut reader).await {
            let reply = {
                let mut state = state.lock().await;
                respond(&command, &mut state, &outbound, &mut subscription)
            };
            if outbound.send(reply).is_err() {
                break;
            }
        }
    });
}

fn respond(
    command: &[String],
    state: &mut StubState,
    outbound: &Outbound,
    subscription: &mut Option<usize>,
) -> Vec<u8> {
    let name = command.first().map(|c| c.to_ascii_uppercase()).unwrap_or_default();
    match name.as_str() {
        "PING" => b"+PONG\r\n".to_vec(),
        "CLIENT" if command.get(1).is_some_and(|sub| sub.eq_ignore_ascii_case("ID")) => {
            b":1\r\n".to_vec()
        }
        "INFO" => bulk("redis_version:7.2.0\r\n"),
        "INCR" => {
            let value = state.counters.entry(command[1].clone()).or_insert(0);
            *value += 1;
            format!(":{}\r\n", value).into_bytes()
        }
        "SUBSCRIBE" => {
            let index = *subscription.get_or_insert_with(|| {
                state.subscribers.push((HashSet::new(), outbound.clone()));
                state.subscribers.len() - 1
            });
            let channels = &mut state.subscribers[index].0;
            let mut reply = Vec::new();
            for channel in &command[1..] {
                channels.insert(channel.clone());
                reply.extend(b"*3\r\n");
                reply.extend(bulk("subscribe"));
                reply.extend(bulk(channel));
                reply.extend(format!(":{}\r\n", channels.len()).into_bytes());
            }
            reply
        }
        _ => b"+OK\r\n".to_vec(),
    }
}

/// Read one command sent as an array of bulk strings.
async fn read_command<R>(reader: &mut BufReader<R>) -> Option<Vec<String>>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let header = read_line(reader).await?;
    let len: usize = header.strip_prefix('*')?.parse().ok()?;

    let mut parts = Vec::with_capacity(len);
    for _ in 0..len {
        let size: usize = read_line(reader).await?.strip_prefix('$')?.parse().ok()?;
        let mut data = vec![0; size + 2];
        reader.read_exact(&mut data).await.ok()?;
        data.truncate(size);
        parts.push(String::from_utf8(data).ok()?);
    }
    Some(parts)
}

async fn read_line<R>(reader: &mut BufReader<R>) -> Option<String>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut line = String::new();
    match reader.read_line(&mut line).await {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end().to_string()),
    }
}

fn bulk(value: &str) -> Vec<u8> {
    format!("${}\r\n{}\r\n", value.len(), value).into_bytes()
}

fn array(values: &[&str]) -> Vec<u8> {
    let mut frame = format!("*{}\r\n", values.len()).into_bytes();
    for value in values {
        frame.extend(bulk(value));
    }
    frame
}
