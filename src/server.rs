use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

use crate::error::ServerError;
use crate::responder::Responder;
use crate::wire::{decode_request, encode_reply, format_error, MAX_DATAGRAM};

/// UDP front end for a [`Responder`].
///
/// Every datagram is handled on its own task, so a delayed answer never
/// holds up other queries.
#[derive(Debug)]
pub struct Server {
	socket: Arc<UdpSocket>,
	responder: Arc<Responder>,
}

impl Server {
	/// Bind the UDP socket on the configured listen address.
	pub async fn bind(responder: Responder) -> Result<Self, ServerError> {
		let addr = responder.config().listen_addr();
		let socket = UdpSocket::bind(&addr).await
			.map_err(|source| ServerError::Bind { addr, source })?;

		Ok(Server {
			socket: Arc::new(socket),
			responder: Arc::new(responder),
		})
	}

	pub fn local_addr(&self) -> io::Result<SocketAddr> {
		self.socket.local_addr()
	}

	/// Receive and answer datagrams until the socket fails.
	pub async fn serve(self) -> Result<(), ServerError> {
		if let Ok(addr) = self.local_addr() {
			info!(listen = %addr, "Starting DNS responder");
		}

		let mut buf = vec![0u8; MAX_DATAGRAM];
		loop {
			let (len, src) = match self.socket.recv_from(&mut buf).await {
				Ok(received) => received,
				// ICMP errors from earlier sends surface here; they are not fatal
				Err(e) if matches!(
					e.kind(),
					io::ErrorKind::ConnectionReset | io::ErrorKind::Interrupted,
				) => {
					debug!(error = %e, "Transient receive error");
					continue;
				}
				Err(e) => return Err(ServerError::Receive(e)),
			};

			let packet = buf[..len].to_vec();
			let socket = self.socket.clone();
			let responder = self.responder.clone();
			tokio::spawn(async move {
				handle_datagram(&responder, &socket, &packet, src).await;
			});
		}
	}

	/// Serve until `shutdown` resolves.
	pub async fn serve_until<F>(self, shutdown: F) -> Result<(), ServerError>
	where
		F: Future<Output = ()>,
	{
		tokio::select! {
			result = self.serve() => result,
			_ = shutdown => {
				info!("Shutting down");
				Ok(())
			}
		}
	}
}

async fn handle_datagram(responder: &Responder, socket: &UdpSocket, packet: &[u8], src: SocketAddr) {
	let reply = match decode_request(packet) {
		Ok(request) => responder.respond(&request).await,
		Err(e) => match format_error(packet) {
			Some(reply) => {
				debug!(client = %src, id = reply.id(), error = %e, "Answering malformed query with FORMERR");
				reply
			}
			None => {
				debug!(client = %src, error = %e, "Dropping datagram");
				return;
			}
		},
	};

	let bytes = match encode_reply(&reply) {
		Ok(bytes) => bytes,
		Err(e) => {
			warn!(client = %src, id = reply.id(), error = %e, "Failed to encode reply");
			return;
		}
	};

	if let Err(e) = socket.send_to(&bytes, src).await {
		warn!(client = %src, error = %e, "Failed to send reply");
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::{AnswerSets, Delays, ResponderConfig};
	use crate::wire::build_query;
	use hickory_proto::op::{Message, ResponseCode};
	use hickory_proto::rr::RecordType;
	use std::time::Duration;

	fn loopback_config() -> ResponderConfig {
		ResponderConfig {
			listen_host: "127.0.0.1".to_string(),
			port: 0,
			answers: AnswerSets {
				a: vec!["192.0.2.1".to_string()],
				aaaa: vec!["2001:db8::1".to_string()],
				..Default::default()
			},
			..Default::default()
		}
	}

	async fn start(config: ResponderConfig) -> SocketAddr {
		let server = Server::bind(Responder::new(config)).await.unwrap();
		let addr = server.local_addr().unwrap();
		tokio::spawn(server.serve());
		addr
	}

	async fn client() -> UdpSocket {
		UdpSocket::bind("127.0.0.1:0").await.unwrap()
	}

	async fn recv(socket: &UdpSocket) -> Message {
		let mut buf = vec![0u8; MAX_DATAGRAM];
		let (len, _src) = tokio::time::timeout(Duration::from_secs(2), socket.recv_from(&mut buf))
			.await
			.expect("timed out waiting for reply")
			.unwrap();
		Message::from_vec(&buf[..len]).unwrap()
	}

	#[tokio::test]
	async fn test_answers_over_udp() {
		let mut config = loopback_config();
		config.authority = Some("ns.example.net".to_string());
		let addr = start(config).await;
		let socket = client().await;

		let txid: u16 = rand::random();
		let query = build_query("cname.example.com.", RecordType::A, txid).unwrap();
		socket.send_to(&query, addr).await.unwrap();

		let reply = recv(&socket).await;
		assert_eq!(reply.id(), txid);
		assert!(reply.authoritative());
		assert_eq!(reply.answers().len(), 2);
		assert_eq!(reply.answers()[0].record_type(), RecordType::CNAME);
		assert_eq!(reply.answers()[1].record_type(), RecordType::A);
		assert_eq!(reply.name_servers().len(), 1);
	}

	#[tokio::test]
	async fn test_delayed_query_does_not_block_others() {
		let mut config = loopback_config();
		config.delays = Delays {
			a: Duration::from_millis(300),
			aaaa: Duration::ZERO,
		};
		let addr = start(config).await;
		let socket = client().await;

		let a_query = build_query("race.example.", RecordType::A, 1).unwrap();
		let aaaa_query = build_query("race.example.", RecordType::AAAA, 2).unwrap();
		socket.send_to(&a_query, addr).await.unwrap();
		socket.send_to(&aaaa_query, addr).await.unwrap();

		let first = recv(&socket).await;
		let second = recv(&socket).await;
		assert_eq!(first.id(), 2, "AAAA reply should arrive first");
		assert_eq!(second.id(), 1);
	}

	#[tokio::test]
	async fn test_garbage_is_dropped_and_server_keeps_serving() {
		let addr = start(loopback_config()).await;
		let socket = client().await;

		socket.send_to(&[0xde, 0xad, 0xbe], addr).await.unwrap();

		let query = build_query("example.com.", RecordType::AAAA, 99).unwrap();
		socket.send_to(&query, addr).await.unwrap();
		let reply = recv(&socket).await;
		assert_eq!(reply.id(), 99);
		assert_eq!(reply.answers().len(), 1);
	}

	#[tokio::test]
	async fn test_malformed_body_gets_formerr() {
		let addr = start(loopback_config()).await;
		let socket = client().await;

		// Valid header claiming one question, followed by a cut-off name
		let packet = [0xBE, 0xEF, 0x01, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0, 0x07, b'e', b'x'];
		socket.send_to(&packet, addr).await.unwrap();

		let reply = recv(&socket).await;
		assert_eq!(reply.id(), 0xBEEF);
		assert_eq!(reply.response_code(), ResponseCode::FormErr);
		assert!(reply.answers().is_empty());
	}

	#[tokio::test]
	async fn test_bind_failure_is_reported() {
		let taken = UdpSocket::bind("127.0.0.1:0").await.unwrap();
		let mut config = loopback_config();
		config.port = taken.local_addr().unwrap().port();

		let err = Server::bind(Responder::new(config)).await.unwrap_err();
		assert!(matches!(err, ServerError::Bind { .. }));
	}

	#[tokio::test]
	async fn test_serve_until_stops_on_shutdown() {
		let server = Server::bind(Responder::new(loopback_config())).await.unwrap();
		let result = tokio::time::timeout(
			Duration::from_secs(2),
			server.serve_until(async {}),
		).await;
		assert!(matches!(result, Ok(Ok(()))));
	}
}
