//! hickory-server request handler bridging the wire transport to the
//! resolution engine. Transaction-ID echo, TSIG and truncation are transport
//! concerns handled by hickory; the engine only sees a decoded query plus
//! the transport kind.

use crate::dns::engine::ResolutionEngine;
use crate::dns::metrics::QueryMetrics;
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::xfer::Protocol;
use hickory_server::authority::MessageResponseBuilder;
use hickory_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo};
use relay_dns_domain::DnsProtocol;
use std::sync::Arc;
use tracing::{debug, error};

pub struct DnsRequestHandler {
    engine: Arc<ResolutionEngine>,
    metrics: Arc<QueryMetrics>,
}

impl DnsRequestHandler {
    pub fn new(engine: Arc<ResolutionEngine>, metrics: Arc<QueryMetrics>) -> Self {
        Self { engine, metrics }
    }
}

#[async_trait::async_trait]
impl RequestHandler for DnsRequestHandler {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
    ) -> ResponseInfo {
        self.metrics.record_query();

        let request_info = match request.request_info() {
            Ok(info) => info,
            Err(e) => {
                error!(error = %e, "Failed to parse request info");
                return send_error_response(request, &mut response_handle, ResponseCode::FormErr)
                    .await;
            }
        };

        let query = request_info.query.original().clone();
        let protocol = match request.protocol() {
            Protocol::Udp => DnsProtocol::Udp,
            _ => DnsProtocol::Tcp,
        };

        debug!(
            protocol = %protocol,
            name = %query.name(),
            rtype = ?query.query_type(),
            class = ?query.query_class(),
            client = %request.src(),
            "DNS query received"
        );

        let mut engine_request = Message::new(request.id(), MessageType::Query, OpCode::Query);
        engine_request.set_recursion_desired(request.header().recursion_desired());
        engine_request.add_query(query.clone());

        let answer = match self.engine.resolve(protocol, &engine_request).await {
            Ok(answer) => answer,
            Err(e) => {
                error!(
                    name = %query.name(),
                    rtype = ?query.query_type(),
                    client = %request.src(),
                    error = %e,
                    "Query resolution failed"
                );
                return send_error_response(request, &mut response_handle, ResponseCode::ServFail)
                    .await;
            }
        };

        let builder = MessageResponseBuilder::from_message_request(request);
        let mut header = *request.header();
        header.set_response_code(answer.response_code());
        header.set_authoritative(answer.authoritative());
        header.set_recursion_available(true);
        let response = builder.build(
            header,
            answer.answers().iter(),
            answer.name_servers().iter(),
            &[],
            &[],
        );

        match response_handle.send_response(response).await {
            Ok(info) => info,
            Err(e) => {
                error!(error = %e, "Failed to send response");
                ResponseInfo::from(*request.header())
            }
        }
    }
}

async fn send_error_response<R: ResponseHandler>(
    request: &Request,
    response_handle: &mut R,
    code: ResponseCode,
) -> ResponseInfo {
    debug!(code = ?code, "Sending error response");
    let builder = MessageResponseBuilder::from_message_request(request);
    let mut header = *request.header();
    header.set_response_code(code);
    header.set_recursion_available(true);
    let response = builder.build(header, &[], &[], &[], &[]);

    match response_handle.send_response(response).await {
        Ok(info) => info,
        Err(e) => {
            error!(error = %e, "Failed to send error response");
            ResponseInfo::from(*request.header())
        }
    }
}
