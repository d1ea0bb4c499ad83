use posts_gateway::gateway::GraphQLBody;
use posts_gateway::{Args, GatewayConfig, HttpPostsApi, PostsGateway, logging};

use std::convert::Infallible;
use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use bytes::Bytes;
use clap::Parser;
use http_body_util::{BodyExt, Full, combinators::BoxBody};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

// Create a response body from a string
fn full<T: Into<Bytes>>(value: T) -> BoxBody<Bytes, hyper::Error> {
    Full::new(value.into())
        .map_err(|never| match never {})
        .boxed()
}

async fn handle_request(
    req: Request<Incoming>,
    gateway: Arc<PostsGateway>,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, Infallible> {
    let result = match (req.method(), req.uri().path()) {
        (&Method::POST, "/graphql") => {
            let body_bytes = match req.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(e) => {
                    warn!(error = %e, "failed to read request body");
                    return Ok(plain(StatusCode::BAD_REQUEST, "Failed to read request body"));
                }
            };

            match serde_json::from_slice::<GraphQLBody>(&body_bytes) {
                Ok(body) => {
                    let response = gateway.process_body(body).await;
                    match serde_json::to_string(&response) {
                        Ok(json) => Response::builder()
                            .header("Content-Type", "application/json")
                            .header("Access-Control-Allow-Origin", "*")
                            .body(full(json))
                            .unwrap_or_else(|_| internal_server_error()),
                        Err(e) => {
                            error!(error = %e, "failed to serialize response");
                            internal_server_error()
                        }
                    }
                }
                Err(e) => plain(
                    StatusCode::BAD_REQUEST,
                    format!("Invalid GraphQL request: {}", e),
                ),
            }
        }

        (&Method::GET, "/graphiql") => Response::builder()
            .header("Content-Type", "text/html")
            .header("Access-Control-Allow-Origin", "*")
            .body(full(GraphiQLSource::build().endpoint("/graphql").finish()))
            .unwrap_or_else(|_| internal_server_error()),

        (&Method::GET, "/") => Response::builder()
            .status(StatusCode::FOUND)
            .header("Location", "/graphiql")
            .header("Access-Control-Allow-Origin", "*")
            .body(full(""))
            .unwrap_or_else(|_| internal_server_error()),

        (&Method::OPTIONS, _) => Response::builder()
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(full(""))
            .unwrap_or_else(|_| internal_server_error()),

        _ => plain(StatusCode::NOT_FOUND, "Not Found"),
    };

    Ok(result)
}

fn plain<T: Into<Bytes>>(status: StatusCode, body: T) -> Response<BoxBody<Bytes, hyper::Error>> {
    Response::builder()
        .status(status)
        .header("Access-Control-Allow-Origin", "*")
        .body(full(body))
        .unwrap_or_else(|_| internal_server_error())
}

fn internal_server_error() -> Response<BoxBody<Bytes, hyper::Error>> {
    let mut response = Response::new(full("Internal Server Error"));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}

#[derive(Clone)]
// An Executor that uses the tokio runtime.
pub struct TokioExecutor;

impl<F> hyper::rt::Executor<F> for TokioExecutor
where
    F: std::future::Future + Send + 'static,
    F::Output: Send + 'static,
{
    fn execute(&self, fut: F) {
        tokio::task::spawn(fut);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    logging::init(&args.log_level);

    let config = GatewayConfig::load(&args)?;
    let api = HttpPostsApi::new(&config.upstream)?;
    let gateway = Arc::new(PostsGateway::new(Arc::new(api)));

    if args.print_schema {
        println!("{}", gateway.sdl());
        return Ok(());
    }

    let listener = TcpListener::bind(config.listen).await?;
    info!(
        listen = %config.listen,
        upstream = %config.upstream.base_url,
        "posts gateway starting"
    );
    info!("GraphiQL UI available at http://{}/graphiql", config.listen);

    loop {
        let (stream, peer) = listener.accept().await?;
        let io = TokioIo::new(stream);

        let gateway_clone = Arc::clone(&gateway);

        let executor = TokioExecutor;

        tokio::task::spawn(async move {
            let service = service_fn(move |req| {
                let gateway = gateway_clone.clone();
                handle_request(req, gateway)
            });

            match hyper_util::server::conn::auto::Builder::new(executor)
                .serve_connection(io, service)
                .await
            {
                Ok(_) => debug!(%peer, "connection closed"),
                Err(e) => warn!(%peer, error = %e, "error processing connection"),
            }
        });
    }
}
